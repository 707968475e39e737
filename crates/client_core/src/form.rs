use shared::{
    domain::{KnowledgeBaseSize, LlmProvider, SttProvider, TtsProvider},
    protocol::EstimateRequest,
};

/// Input parameters for one estimation session.
///
/// Snapshots are immutable: [`FormData::apply`] returns a new value and
/// leaves the receiver untouched, so concurrent readers in the presentation
/// layer never observe a half-edited form.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormData {
    pub calls_per_day: u32,
    pub avg_call_duration: u32,
    pub estimated_users: u32,
    pub llm_provider: Option<LlmProvider>,
    pub stt_provider: Option<SttProvider>,
    pub tts_provider: Option<TtsProvider>,
    pub knowledge_base_size: Option<KnowledgeBaseSize>,
    /// Retained in the model shape but forced off at payload derivation.
    pub self_hosted: bool,
    /// Retained in the model shape but forced empty at payload derivation.
    pub gpu_instance_type: Option<String>,
    /// Free-form fallback, never emitted into the payload.
    pub custom_llm_provider: Option<String>,
    /// Free-form fallback, never emitted into the payload.
    pub custom_stt_provider: Option<String>,
    /// Free-form fallback, never emitted into the payload.
    pub custom_tts_provider: Option<String>,
}

/// Single-field edit applied against a form snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum FormUpdate {
    CallsPerDay(u32),
    AvgCallDuration(u32),
    EstimatedUsers(u32),
    LlmProvider(Option<LlmProvider>),
    SttProvider(Option<SttProvider>),
    TtsProvider(Option<TtsProvider>),
    KnowledgeBaseSize(Option<KnowledgeBaseSize>),
    SelfHosted(bool),
    GpuInstanceType(Option<String>),
    CustomLlmProvider(Option<String>),
    CustomSttProvider(Option<String>),
    CustomTtsProvider(Option<String>),
}

impl FormData {
    /// Returns a new snapshot with exactly one field replaced.
    pub fn apply(&self, update: FormUpdate) -> FormData {
        let mut next = self.clone();
        match update {
            FormUpdate::CallsPerDay(value) => next.calls_per_day = value,
            FormUpdate::AvgCallDuration(value) => next.avg_call_duration = value,
            FormUpdate::EstimatedUsers(value) => next.estimated_users = value,
            FormUpdate::LlmProvider(value) => next.llm_provider = value,
            FormUpdate::SttProvider(value) => next.stt_provider = value,
            FormUpdate::TtsProvider(value) => next.tts_provider = value,
            FormUpdate::KnowledgeBaseSize(value) => next.knowledge_base_size = value,
            FormUpdate::SelfHosted(value) => next.self_hosted = value,
            FormUpdate::GpuInstanceType(value) => next.gpu_instance_type = value,
            FormUpdate::CustomLlmProvider(value) => next.custom_llm_provider = value,
            FormUpdate::CustomSttProvider(value) => next.custom_stt_provider = value,
            FormUpdate::CustomTtsProvider(value) => next.custom_tts_provider = value,
        }
        next
    }

    /// Wire names of the fields that still block submission.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.calls_per_day == 0 {
            missing.push("callsPerDay");
        }
        if self.avg_call_duration == 0 {
            missing.push("avgCallDuration");
        }
        if self.estimated_users == 0 {
            missing.push("estimatedUsers");
        }
        if self.llm_provider.is_none() {
            missing.push("llmProvider");
        }
        if self.stt_provider.is_none() {
            missing.push("sttProvider");
        }
        if self.tts_provider.is_none() {
            missing.push("ttsProvider");
        }
        if self.knowledge_base_size.is_none() {
            missing.push("knowledgeBaseSize");
        }
        missing
    }

    /// True iff every numeric field is positive and every categorical field
    /// is selected. There is no partial validity.
    pub fn validate(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Derive the outbound payload.
    ///
    /// The self-hosted/GPU pair is always emitted disabled and the
    /// custom-provider fallbacks are always dropped, whatever the stored
    /// values; the hosted estimator only prices the managed path.
    pub fn to_request(&self) -> EstimateRequest {
        EstimateRequest {
            calls_per_day: self.calls_per_day,
            avg_call_duration: self.avg_call_duration,
            estimated_users: self.estimated_users,
            llm_provider: self
                .llm_provider
                .map(|p| p.as_str().to_owned())
                .unwrap_or_default(),
            stt_provider: self
                .stt_provider
                .map(|p| p.as_str().to_owned())
                .unwrap_or_default(),
            tts_provider: self
                .tts_provider
                .map(|p| p.as_str().to_owned())
                .unwrap_or_default(),
            knowledge_base_size: self
                .knowledge_base_size
                .map(|b| b.as_str().to_owned())
                .unwrap_or_default(),
            self_hosted: false,
            gpu_instance_type: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_form() -> FormData {
        FormData::default()
            .apply(FormUpdate::CallsPerDay(50))
            .apply(FormUpdate::AvgCallDuration(5))
            .apply(FormUpdate::EstimatedUsers(10))
            .apply(FormUpdate::LlmProvider(Some(LlmProvider::OpenAi)))
            .apply(FormUpdate::SttProvider(Some(SttProvider::Deepgram)))
            .apply(FormUpdate::TtsProvider(Some(TtsProvider::ElevenLabs)))
            .apply(FormUpdate::KnowledgeBaseSize(Some(KnowledgeBaseSize::Medium)))
    }

    #[test]
    fn default_form_is_invalid_and_names_every_field() {
        let form = FormData::default();
        assert!(!form.validate());
        assert_eq!(
            form.missing_fields(),
            vec![
                "callsPerDay",
                "avgCallDuration",
                "estimatedUsers",
                "llmProvider",
                "sttProvider",
                "ttsProvider",
                "knowledgeBaseSize",
            ]
        );
    }

    #[test]
    fn complete_form_validates() {
        assert!(complete_form().validate());
    }

    #[test]
    fn any_single_missing_field_invalidates() {
        let form = complete_form();
        assert!(!form.apply(FormUpdate::CallsPerDay(0)).validate());
        assert!(!form.apply(FormUpdate::AvgCallDuration(0)).validate());
        assert!(!form.apply(FormUpdate::EstimatedUsers(0)).validate());
        assert!(!form.apply(FormUpdate::LlmProvider(None)).validate());
        assert!(!form.apply(FormUpdate::SttProvider(None)).validate());
        assert!(!form.apply(FormUpdate::TtsProvider(None)).validate());
        assert!(!form.apply(FormUpdate::KnowledgeBaseSize(None)).validate());
    }

    #[test]
    fn validity_is_order_independent() {
        let forward = complete_form();
        let reversed = FormData::default()
            .apply(FormUpdate::KnowledgeBaseSize(Some(KnowledgeBaseSize::Medium)))
            .apply(FormUpdate::TtsProvider(Some(TtsProvider::ElevenLabs)))
            .apply(FormUpdate::SttProvider(Some(SttProvider::Deepgram)))
            .apply(FormUpdate::LlmProvider(Some(LlmProvider::OpenAi)))
            .apply(FormUpdate::EstimatedUsers(10))
            .apply(FormUpdate::AvgCallDuration(5))
            .apply(FormUpdate::CallsPerDay(50));
        assert_eq!(forward, reversed);
        assert!(reversed.validate());
    }

    #[test]
    fn apply_leaves_prior_snapshot_untouched() {
        let before = complete_form();
        let after = before.apply(FormUpdate::CallsPerDay(900));
        assert_eq!(before.calls_per_day, 50);
        assert_eq!(after.calls_per_day, 900);
    }

    #[test]
    fn payload_matches_expected_projection() {
        let request = complete_form().to_request();
        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({
                "callsPerDay": 50,
                "avgCallDuration": 5,
                "estimatedUsers": 10,
                "llmProvider": "OpenAI",
                "sttProvider": "Deepgram",
                "ttsProvider": "ElevenLabs",
                "knowledgeBaseSize": "Medium (1-10MB)",
                "selfHosted": false,
                "gpuInstanceType": "",
            })
        );
    }

    #[test]
    fn payload_forces_disabled_fields_and_drops_custom_providers() {
        let form = complete_form()
            .apply(FormUpdate::SelfHosted(true))
            .apply(FormUpdate::GpuInstanceType(Some("a100-80gb".into())))
            .apply(FormUpdate::CustomLlmProvider(Some("my-local-llm".into())))
            .apply(FormUpdate::CustomSttProvider(Some("my-local-stt".into())))
            .apply(FormUpdate::CustomTtsProvider(Some("my-local-tts".into())));

        let request = form.to_request();
        assert!(!request.self_hosted);
        assert_eq!(request.gpu_instance_type, "");

        let value = serde_json::to_value(&request).expect("serialize");
        let keys: Vec<&str> = value
            .as_object()
            .expect("object")
            .keys()
            .map(String::as_str)
            .collect();
        assert!(!keys.iter().any(|k| k.to_ascii_lowercase().contains("custom")));
    }

    #[test]
    fn unselected_categories_serialize_as_empty_strings() {
        let request = FormData::default().to_request();
        assert_eq!(request.llm_provider, "");
        assert_eq!(request.knowledge_base_size, "");
    }
}
