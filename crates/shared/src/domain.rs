use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::UnknownChoiceError;

macro_rules! choice_enum {
    ($name:ident, $category:literal, { $($variant:ident => $label:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownChoiceError;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                $(
                    if raw.eq_ignore_ascii_case($label) {
                        return Ok($name::$variant);
                    }
                )+
                Err(UnknownChoiceError::new($category, raw, &[$($label),+]))
            }
        }
    };
}

choice_enum!(LlmProvider, "llm provider", {
    OpenAi => "OpenAI",
    Anthropic => "Anthropic",
    GoogleGemini => "Google Gemini",
    Groq => "Groq",
    AzureOpenAi => "Azure OpenAI",
});

choice_enum!(SttProvider, "stt provider", {
    Deepgram => "Deepgram",
    AssemblyAi => "AssemblyAI",
    OpenAiWhisper => "OpenAI Whisper",
    GoogleSpeech => "Google Speech-to-Text",
    AzureSpeech => "Azure Speech",
});

choice_enum!(TtsProvider, "tts provider", {
    ElevenLabs => "ElevenLabs",
    OpenAi => "OpenAI",
    PlayHt => "PlayHT",
    GoogleTts => "Google Text-to-Speech",
    AzureTts => "Azure Speech",
});

choice_enum!(KnowledgeBaseSize, "knowledge base size", {
    Small => "Small (<1MB)",
    Medium => "Medium (1-10MB)",
    Large => "Large (10-100MB)",
    ExtraLarge => "Extra Large (>100MB)",
});

impl KnowledgeBaseSize {
    /// Position in the ordered bucket scale, smallest first.
    pub fn rank(&self) -> u8 {
        match self {
            KnowledgeBaseSize::Small => 0,
            KnowledgeBaseSize::Medium => 1,
            KnowledgeBaseSize::Large => 2,
            KnowledgeBaseSize::ExtraLarge => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_labels_case_insensitively() {
        assert_eq!("openai".parse::<LlmProvider>().unwrap(), LlmProvider::OpenAi);
        assert_eq!(
            "medium (1-10mb)".parse::<KnowledgeBaseSize>().unwrap(),
            KnowledgeBaseSize::Medium
        );
    }

    #[test]
    fn rejects_unknown_label_and_names_choices() {
        let err = "CarrierPigeon".parse::<SttProvider>().expect_err("must fail");
        let text = err.to_string();
        assert!(text.contains("CarrierPigeon"));
        assert!(text.contains("Deepgram"));
    }

    #[test]
    fn serializes_as_wire_label() {
        let json = serde_json::to_string(&TtsProvider::ElevenLabs).unwrap();
        assert_eq!(json, "\"ElevenLabs\"");
    }

    #[test]
    fn knowledge_base_buckets_are_ordered() {
        let ranks: Vec<u8> = KnowledgeBaseSize::ALL.iter().map(|b| b.rank()).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3]);
    }
}
