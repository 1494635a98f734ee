//! Generation and moderation parameters sent with every chat request.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Generation and moderation controls for one chat request.
///
/// `seed` and `stop_sequences` are genuinely optional: they are omitted from
/// the serialized payload when unset, so "unset" never collides with a zero
/// or empty value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterSet {
    pub temperature: f64,
    pub max_tokens: u32,
    pub top_p: f64,
    pub top_k: u32,
    pub frequency_penalty: f64,
    pub presence_penalty: f64,
    pub repetition_penalty: f64,
    pub min_p: f64,
    pub top_a: f64,
    pub harm_sensitivity: f64,
    pub context_awareness: f64,
    pub crisis_mode: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 2048,
            top_p: 0.9,
            top_k: 40,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            repetition_penalty: 1.0,
            min_p: 0.0,
            top_a: 0.0,
            harm_sensitivity: 0.5,
            context_awareness: 0.7,
            crisis_mode: false,
            seed: None,
            stop_sequences: None,
        }
    }
}

/// Payload key of a single parameter control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKey {
    Temperature,
    MaxTokens,
    TopP,
    TopK,
    FrequencyPenalty,
    PresencePenalty,
    RepetitionPenalty,
    MinP,
    TopA,
    HarmSensitivity,
    ContextAwareness,
    CrisisMode,
    Seed,
    StopSequences,
}

impl ParameterKey {
    /// Every key, in display order.
    pub const ALL: [ParameterKey; 14] = [
        ParameterKey::Temperature,
        ParameterKey::MaxTokens,
        ParameterKey::TopP,
        ParameterKey::TopK,
        ParameterKey::FrequencyPenalty,
        ParameterKey::PresencePenalty,
        ParameterKey::RepetitionPenalty,
        ParameterKey::MinP,
        ParameterKey::TopA,
        ParameterKey::HarmSensitivity,
        ParameterKey::ContextAwareness,
        ParameterKey::CrisisMode,
        ParameterKey::Seed,
        ParameterKey::StopSequences,
    ];

    /// The JSON key used in the request payload.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterKey::Temperature => "temperature",
            ParameterKey::MaxTokens => "max_tokens",
            ParameterKey::TopP => "top_p",
            ParameterKey::TopK => "top_k",
            ParameterKey::FrequencyPenalty => "frequency_penalty",
            ParameterKey::PresencePenalty => "presence_penalty",
            ParameterKey::RepetitionPenalty => "repetition_penalty",
            ParameterKey::MinP => "min_p",
            ParameterKey::TopA => "top_a",
            ParameterKey::HarmSensitivity => "harm_sensitivity",
            ParameterKey::ContextAwareness => "context_awareness",
            ParameterKey::CrisisMode => "crisis_mode",
            ParameterKey::Seed => "seed",
            ParameterKey::StopSequences => "stop_sequences",
        }
    }

    /// Whether the key belongs to the moderation group rather than generation.
    pub fn is_moderation(&self) -> bool {
        matches!(
            self,
            ParameterKey::HarmSensitivity | ParameterKey::ContextAwareness | ParameterKey::CrisisMode
        )
    }
}

impl fmt::Display for ParameterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParameterKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        ParameterKey::ALL
            .into_iter()
            .find(|key| key.as_str() == normalized)
            .ok_or_else(|| format!("unknown parameter: '{}'", s.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_optional_fields_absent_from_payload() {
        let value = serde_json::to_value(ParameterSet::default()).unwrap();
        let obj = value.as_object().unwrap();
        assert!(!obj.contains_key("seed"));
        assert!(!obj.contains_key("stop_sequences"));
        assert_eq!(obj["crisis_mode"], json!(false));
        assert_eq!(obj.len(), 12);
    }

    #[test]
    fn test_optional_fields_present_when_set() {
        let params = ParameterSet {
            seed: Some(0),
            stop_sequences: Some(vec!["END".to_string()]),
            ..ParameterSet::default()
        };
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["seed"], json!(0));
        assert_eq!(value["stop_sequences"], json!(["END"]));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let params: ParameterSet = toml::from_str("temperature = 1.2\nseed = 7").unwrap();
        assert!((params.temperature - 1.2).abs() < f64::EPSILON);
        assert_eq!(params.seed, Some(7));
        assert_eq!(params.max_tokens, 2048);
        assert!(params.stop_sequences.is_none());
    }

    #[test]
    fn test_parameter_key_parse() {
        assert_eq!("top-p".parse::<ParameterKey>().unwrap(), ParameterKey::TopP);
        assert_eq!(" SEED ".parse::<ParameterKey>().unwrap(), ParameterKey::Seed);
        assert!("top_z".parse::<ParameterKey>().is_err());
    }

    #[test]
    fn test_parameter_key_groups() {
        let moderation: Vec<_> = ParameterKey::ALL
            .into_iter()
            .filter(ParameterKey::is_moderation)
            .collect();
        assert_eq!(moderation.len(), 3);
    }
}
