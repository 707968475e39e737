use serde_json::Value;
use shared::{error::EstimateError, protocol::CostEstimate};

/// Coerce the webhook's decoded reply into a canonical estimate record.
///
/// The webhook answers either with a bare estimate object or with a
/// one-element array wrapping it; both decode to the same result. Anything
/// else, and any record missing required keys, fails with
/// `MalformedResponse`. No partial recovery, no default-filling: range
/// ordering inside the triples is trusted, only shape is checked.
pub fn normalize_estimate(document: Value) -> Result<CostEstimate, EstimateError> {
    let record = match document {
        Value::Array(mut items) => {
            if items.is_empty() {
                return Err(EstimateError::malformed("webhook returned an empty array"));
            }
            if items.len() > 1 {
                tracing::debug!(
                    extra = items.len() - 1,
                    "webhook returned multiple records, using the first"
                );
            }
            items.swap_remove(0)
        }
        record @ Value::Object(_) => record,
        other => {
            return Err(EstimateError::malformed(format!(
                "webhook returned a non-record document ({})",
                json_kind(&other)
            )));
        }
    };

    serde_json::from_value(record).map_err(|err| EstimateError::malformed(err.to_string()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared::error::ErrorKind;

    fn band(min: f64, avg: f64, max: f64) -> Value {
        json!({"min": min, "avg": avg, "max": max})
    }

    fn estimate_doc() -> Value {
        json!({
            "costSummary": {
                "totalMonthlyCost": band(120.0, 185.5, 260.0),
                "llmCost": band(40.0, 62.0, 90.0),
                "knowledgeBaseTokenCost": band(4.0, 6.5, 9.0),
                "sttCost": band(18.0, 27.0, 36.0),
                "ttsCost": band(22.0, 31.0, 44.0),
                "voiceCarrierCost": band(20.0, 35.0, 50.0),
                "serverCost": band(16.0, 24.0, 31.0),
                "costPerUser": band(12.0, 18.55, 26.0),
                "costPerCall": band(0.08, 0.12, 0.17),
            },
            "serviceDetails": {
                "llm": {
                    "provider": "OpenAI",
                    "model": "gpt-4o-mini",
                    "description": "cost-efficient reasoning for call flows",
                    "cost": band(40.0, 62.0, 90.0),
                },
                "stt": {
                    "provider": "Deepgram",
                    "model": "nova-2",
                    "description": "streaming transcription",
                    "cost": band(18.0, 27.0, 36.0),
                },
                "tts": {
                    "provider": "ElevenLabs",
                    "model": "eleven_turbo_v2",
                    "description": "low latency synthesis",
                    "cost": band(22.0, 31.0, 44.0),
                },
                "voiceCarrier": {
                    "provider": "Twilio",
                    "cost": band(20.0, 35.0, 50.0),
                },
                "server": {
                    "provider": "AWS",
                    "instanceType": "t3.medium",
                    "cost": band(16.0, 24.0, 31.0),
                },
            },
            "recommendations": {
                "bestValueLlm": "gpt-4o-mini",
                "bestQualityLlm": "claude-sonnet",
                "bestBalancedLlm": "gemini-flash",
                "bestStt": "nova-2",
                "bestTts": "eleven_turbo_v2",
            },
        })
    }

    #[test]
    fn accepts_bare_object() {
        let estimate = normalize_estimate(estimate_doc()).expect("normalize");
        assert_eq!(estimate.service_details.llm.provider, "OpenAI");
        assert_eq!(estimate.cost_summary.total_monthly_cost.avg, 185.5);
        assert!(estimate.recommendations.is_some());
    }

    #[test]
    fn object_and_single_element_array_are_equivalent() {
        let from_object = normalize_estimate(estimate_doc()).expect("object");
        let from_array = normalize_estimate(json!([estimate_doc()])).expect("array");
        assert_eq!(from_object, from_array);
    }

    #[test]
    fn empty_array_is_malformed() {
        let err = normalize_estimate(json!([])).expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }

    #[test]
    fn scalars_and_null_are_malformed() {
        for document in [json!(null), json!(42), json!("ok"), json!(true)] {
            let err = normalize_estimate(document).expect_err("must fail");
            assert_eq!(err.kind(), ErrorKind::MalformedResponse);
        }
    }

    #[test]
    fn missing_summary_key_is_malformed() {
        let mut document = estimate_doc();
        document["costSummary"]
            .as_object_mut()
            .expect("summary")
            .remove("voiceCarrierCost");
        let err = normalize_estimate(document).expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }

    #[test]
    fn missing_service_key_is_malformed() {
        let mut document = estimate_doc();
        document["serviceDetails"]
            .as_object_mut()
            .expect("details")
            .remove("server");
        assert!(normalize_estimate(document).is_err());
    }

    #[test]
    fn mistyped_triple_is_malformed() {
        let mut document = estimate_doc();
        document["costSummary"]["llmCost"] = json!("forty dollars");
        assert!(normalize_estimate(document).is_err());
    }

    #[test]
    fn missing_triple_field_is_malformed() {
        let mut document = estimate_doc();
        document["costSummary"]["llmCost"] = json!({"min": 40.0, "max": 90.0});
        assert!(normalize_estimate(document).is_err());
    }

    #[test]
    fn recommendations_are_optional() {
        let mut document = estimate_doc();
        document
            .as_object_mut()
            .expect("document")
            .remove("recommendations");
        let estimate = normalize_estimate(document).expect("normalize");
        assert!(estimate.recommendations.is_none());
    }

    #[test]
    fn range_ordering_is_not_enforced_here() {
        let mut document = estimate_doc();
        document["costSummary"]["llmCost"] = json!({"min": 90.0, "avg": 62.0, "max": 40.0});
        let estimate = normalize_estimate(document).expect("shape is still valid");
        assert!(!estimate.cost_summary.llm_cost.is_well_ordered());
    }

    #[test]
    fn multi_element_array_takes_the_first_record() {
        let mut second = estimate_doc();
        second["serviceDetails"]["llm"]["provider"] = json!("Anthropic");
        let estimate = normalize_estimate(json!([estimate_doc(), second])).expect("normalize");
        assert_eq!(estimate.service_details.llm.provider, "OpenAI");
    }
}
