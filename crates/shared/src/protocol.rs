use serde::{Deserialize, Serialize};

/// Outbound payload posted to the estimation webhook.
///
/// A pure projection of the form: categorical fields are flattened to their
/// wire labels (empty string when unselected), and the self-hosted/GPU pair
/// is always emitted in its disabled shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateRequest {
    pub calls_per_day: u32,
    pub avg_call_duration: u32,
    pub estimated_users: u32,
    pub llm_provider: String,
    pub stt_provider: String,
    pub tts_provider: String,
    pub knowledge_base_size: String,
    pub self_hosted: bool,
    pub gpu_instance_type: String,
}

/// A `{min, max, avg}` cost band in USD per month.
///
/// The webhook guarantees `0 <= min <= avg <= max`; the client trusts the
/// ordering and only checks shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeTriple {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

impl RangeTriple {
    pub fn is_well_ordered(&self) -> bool {
        0.0 <= self.min && self.min <= self.avg && self.avg <= self.max
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostSummary {
    pub total_monthly_cost: RangeTriple,
    pub llm_cost: RangeTriple,
    pub knowledge_base_token_cost: RangeTriple,
    pub stt_cost: RangeTriple,
    pub tts_cost: RangeTriple,
    pub voice_carrier_cost: RangeTriple,
    pub server_cost: RangeTriple,
    pub cost_per_user: RangeTriple,
    pub cost_per_call: RangeTriple,
}

/// Per-service line item for the LLM/STT/TTS rows, which name a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelServiceDetail {
    pub provider: String,
    pub model: String,
    pub description: String,
    pub cost: RangeTriple,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarrierServiceDetail {
    pub provider: String,
    pub cost: RangeTriple,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerServiceDetail {
    pub provider: String,
    pub instance_type: String,
    pub cost: RangeTriple,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDetails {
    pub llm: ModelServiceDetail,
    pub stt: ModelServiceDetail,
    pub tts: ModelServiceDetail,
    pub voice_carrier: CarrierServiceDetail,
    pub server: ServerServiceDetail,
}

/// Advisory picks the webhook may attach; absence is a legal state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    pub best_value_llm: String,
    pub best_quality_llm: String,
    pub best_balanced_llm: String,
    pub best_stt: String,
    pub best_tts: String,
}

/// Fully-typed estimate as returned by the webhook, replaced wholesale on
/// each successful submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostEstimate {
    pub cost_summary: CostSummary,
    pub service_details: ServiceDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Recommendations>,
}
