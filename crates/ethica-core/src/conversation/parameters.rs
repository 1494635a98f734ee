//! Parameter model: control values and request payload construction.
//!
//! `ParameterControls` holds the raw text of every generation and moderation
//! control, the way an input surface would. Range checking belongs to the
//! input surface; here values are only coerced to their types, and text
//! that does not coerce falls back to the baseline value.

use std::str::FromStr;

use ethica_types::error::ParameterError;
use ethica_types::parameters::{ParameterKey, ParameterSet};

/// Shown for optional controls that are unset.
const UNSET_DISPLAY: &str = "\u{2014}";

/// Current values of the parameter controls.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterControls {
    baseline: ParameterSet,
    temperature: String,
    max_tokens: String,
    top_p: String,
    top_k: String,
    frequency_penalty: String,
    presence_penalty: String,
    repetition_penalty: String,
    min_p: String,
    top_a: String,
    harm_sensitivity: String,
    context_awareness: String,
    crisis_mode: bool,
    seed: String,
    stop_sequences: String,
}

impl Default for ParameterControls {
    fn default() -> Self {
        Self::from_parameters(ParameterSet::default())
    }
}

impl ParameterControls {
    /// Controls initialised from (and falling back to) `baseline`.
    pub fn from_parameters(baseline: ParameterSet) -> Self {
        let mut controls = Self {
            baseline,
            temperature: String::new(),
            max_tokens: String::new(),
            top_p: String::new(),
            top_k: String::new(),
            frequency_penalty: String::new(),
            presence_penalty: String::new(),
            repetition_penalty: String::new(),
            min_p: String::new(),
            top_a: String::new(),
            harm_sensitivity: String::new(),
            context_awareness: String::new(),
            crisis_mode: false,
            seed: String::new(),
            stop_sequences: String::new(),
        };
        for key in ParameterKey::ALL {
            controls.restore(key);
        }
        controls
    }

    /// Read the controls into a request payload.
    ///
    /// Never fails: unparseable text yields the baseline value, and the
    /// optional fields are included only when they carry a value.
    pub fn build_request_parameters(&self) -> ParameterSet {
        let base = &self.baseline;
        ParameterSet {
            temperature: coerce(&self.temperature, base.temperature),
            max_tokens: coerce_count(&self.max_tokens, base.max_tokens),
            top_p: coerce(&self.top_p, base.top_p),
            top_k: coerce_count(&self.top_k, base.top_k),
            frequency_penalty: coerce(&self.frequency_penalty, base.frequency_penalty),
            presence_penalty: coerce(&self.presence_penalty, base.presence_penalty),
            repetition_penalty: coerce(&self.repetition_penalty, base.repetition_penalty),
            min_p: coerce(&self.min_p, base.min_p),
            top_a: coerce(&self.top_a, base.top_a),
            harm_sensitivity: coerce(&self.harm_sensitivity, base.harm_sensitivity),
            context_awareness: coerce(&self.context_awareness, base.context_awareness),
            crisis_mode: self.crisis_mode,
            // Whole-text integers only; "12abc" is not a seed.
            seed: self.seed.trim().parse::<i64>().ok(),
            stop_sequences: split_stop_sequences(&self.stop_sequences),
        }
    }

    /// Set one control from user text. The key accepts `-` or `_` separators.
    pub fn set(&mut self, key: &str, value: &str) -> Result<ParameterKey, ParameterError> {
        let key = parse_key(key)?;
        match key {
            ParameterKey::CrisisMode => self.crisis_mode = parse_flag(value),
            _ => {
                if let Some(text) = self.text_mut(key) {
                    *text = value.trim().to_string();
                }
            }
        }
        Ok(key)
    }

    /// Return one control to its baseline value (optional controls become unset).
    pub fn unset(&mut self, key: &str) -> Result<ParameterKey, ParameterError> {
        let key = parse_key(key)?;
        self.restore(key);
        Ok(key)
    }

    pub fn crisis_mode(&self) -> bool {
        self.crisis_mode
    }

    /// `(key, shown value)` pairs in display order.
    pub fn display_rows(&self) -> Vec<(ParameterKey, String)> {
        ParameterKey::ALL
            .into_iter()
            .map(|key| {
                let shown = match key {
                    ParameterKey::CrisisMode => {
                        if self.crisis_mode { "on" } else { "off" }.to_string()
                    }
                    _ => {
                        let text = self.text(key).unwrap_or_default();
                        if text.is_empty() {
                            UNSET_DISPLAY.to_string()
                        } else {
                            text.to_string()
                        }
                    }
                };
                (key, shown)
            })
            .collect()
    }

    fn restore(&mut self, key: ParameterKey) {
        let base = self.baseline.clone();
        let text = match key {
            ParameterKey::Temperature => base.temperature.to_string(),
            ParameterKey::MaxTokens => base.max_tokens.to_string(),
            ParameterKey::TopP => base.top_p.to_string(),
            ParameterKey::TopK => base.top_k.to_string(),
            ParameterKey::FrequencyPenalty => base.frequency_penalty.to_string(),
            ParameterKey::PresencePenalty => base.presence_penalty.to_string(),
            ParameterKey::RepetitionPenalty => base.repetition_penalty.to_string(),
            ParameterKey::MinP => base.min_p.to_string(),
            ParameterKey::TopA => base.top_a.to_string(),
            ParameterKey::HarmSensitivity => base.harm_sensitivity.to_string(),
            ParameterKey::ContextAwareness => base.context_awareness.to_string(),
            ParameterKey::CrisisMode => {
                self.crisis_mode = base.crisis_mode;
                return;
            }
            ParameterKey::Seed => base.seed.map(|seed| seed.to_string()).unwrap_or_default(),
            ParameterKey::StopSequences => base
                .stop_sequences
                .map(|stops| stops.join(", "))
                .unwrap_or_default(),
        };
        if let Some(slot) = self.text_mut(key) {
            *slot = text;
        }
    }

    fn text(&self, key: ParameterKey) -> Option<&str> {
        let text = match key {
            ParameterKey::Temperature => &self.temperature,
            ParameterKey::MaxTokens => &self.max_tokens,
            ParameterKey::TopP => &self.top_p,
            ParameterKey::TopK => &self.top_k,
            ParameterKey::FrequencyPenalty => &self.frequency_penalty,
            ParameterKey::PresencePenalty => &self.presence_penalty,
            ParameterKey::RepetitionPenalty => &self.repetition_penalty,
            ParameterKey::MinP => &self.min_p,
            ParameterKey::TopA => &self.top_a,
            ParameterKey::HarmSensitivity => &self.harm_sensitivity,
            ParameterKey::ContextAwareness => &self.context_awareness,
            ParameterKey::Seed => &self.seed,
            ParameterKey::StopSequences => &self.stop_sequences,
            ParameterKey::CrisisMode => return None,
        };
        Some(text.as_str())
    }

    fn text_mut(&mut self, key: ParameterKey) -> Option<&mut String> {
        match key {
            ParameterKey::Temperature => Some(&mut self.temperature),
            ParameterKey::MaxTokens => Some(&mut self.max_tokens),
            ParameterKey::TopP => Some(&mut self.top_p),
            ParameterKey::TopK => Some(&mut self.top_k),
            ParameterKey::FrequencyPenalty => Some(&mut self.frequency_penalty),
            ParameterKey::PresencePenalty => Some(&mut self.presence_penalty),
            ParameterKey::RepetitionPenalty => Some(&mut self.repetition_penalty),
            ParameterKey::MinP => Some(&mut self.min_p),
            ParameterKey::TopA => Some(&mut self.top_a),
            ParameterKey::HarmSensitivity => Some(&mut self.harm_sensitivity),
            ParameterKey::ContextAwareness => Some(&mut self.context_awareness),
            ParameterKey::Seed => Some(&mut self.seed),
            ParameterKey::StopSequences => Some(&mut self.stop_sequences),
            ParameterKey::CrisisMode => None,
        }
    }
}

fn parse_key(key: &str) -> Result<ParameterKey, ParameterError> {
    key.parse::<ParameterKey>()
        .map_err(|_| ParameterError::UnknownParameter(key.trim().to_string()))
}

fn coerce<T: FromStr>(raw: &str, fallback: T) -> T {
    raw.trim().parse().unwrap_or(fallback)
}

/// Integer controls accept decimal text and truncate it.
fn coerce_count(raw: &str, fallback: u32) -> u32 {
    let raw = raw.trim();
    if let Ok(value) = raw.parse::<u32>() {
        return value;
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 && value <= f64::from(u32::MAX) => {
            value.trunc() as u32
        }
        _ => fallback,
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "on" | "yes" | "1"
    )
}

fn split_stop_sequences(raw: &str) -> Option<Vec<String>> {
    let stops: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect();
    if stops.is_empty() { None } else { Some(stops) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_build_valid_payload_without_optionals() {
        let params = ParameterControls::default().build_request_parameters();
        assert_eq!(params, ParameterSet::default());
        assert!(params.seed.is_none());
        assert!(params.stop_sequences.is_none());
    }

    #[test]
    fn test_set_coerces_values() {
        let mut controls = ParameterControls::default();
        controls.set("temperature", "1.3").unwrap();
        controls.set("max-tokens", "512").unwrap();
        controls.set("top_k", "12.9").unwrap();
        controls.set("crisis_mode", "on").unwrap();

        let params = controls.build_request_parameters();
        assert!((params.temperature - 1.3).abs() < f64::EPSILON);
        assert_eq!(params.max_tokens, 512);
        assert_eq!(params.top_k, 12);
        assert!(params.crisis_mode);
    }

    #[test]
    fn test_malformed_text_falls_back_to_baseline() {
        let mut controls = ParameterControls::default();
        controls.set("top_p", "lots").unwrap();
        controls.set("max_tokens", "-5").unwrap();

        let params = controls.build_request_parameters();
        assert!((params.top_p - 0.9).abs() < f64::EPSILON);
        assert_eq!(params.max_tokens, 2048);
    }

    #[test]
    fn test_out_of_range_values_are_not_rejected() {
        let mut controls = ParameterControls::default();
        controls.set("temperature", "9.5").unwrap();
        let params = controls.build_request_parameters();
        assert!((params.temperature - 9.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_seed_included_only_when_integer() {
        let mut controls = ParameterControls::default();
        controls.set("seed", "abc").unwrap();
        assert!(controls.build_request_parameters().seed.is_none());

        controls.set("seed", " 0 ").unwrap();
        assert_eq!(controls.build_request_parameters().seed, Some(0));

        // No prefix parsing: partially numeric text leaves the seed unset.
        for partial in ["12abc", "3.7"] {
            controls.set("seed", partial).unwrap();
            assert!(controls.build_request_parameters().seed.is_none(), "{partial}");
        }
    }

    #[test]
    fn test_stop_sequences_split_and_trimmed() {
        let mut controls = ParameterControls::default();
        controls.set("stop_sequences", " END ,, ### ").unwrap();
        assert_eq!(
            controls.build_request_parameters().stop_sequences,
            Some(vec!["END".to_string(), "###".to_string()])
        );

        controls.set("stop_sequences", " , ").unwrap();
        assert!(controls.build_request_parameters().stop_sequences.is_none());
    }

    #[test]
    fn test_unset_restores_baseline() {
        let baseline = ParameterSet {
            temperature: 0.2,
            seed: Some(11),
            ..ParameterSet::default()
        };
        let mut controls = ParameterControls::from_parameters(baseline.clone());
        controls.set("temperature", "1.0").unwrap();
        controls.set("seed", "99").unwrap();

        controls.unset("temperature").unwrap();
        controls.unset("seed").unwrap();
        assert_eq!(controls.build_request_parameters(), baseline);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let mut controls = ParameterControls::default();
        let err = controls.set("top_z", "1").unwrap_err();
        assert_eq!(err, ParameterError::UnknownParameter("top_z".to_string()));
        assert_eq!(controls, ParameterControls::default());
    }

    #[test]
    fn test_display_rows_mark_unset_optionals() {
        let rows = ParameterControls::default().display_rows();
        assert_eq!(rows.len(), ParameterKey::ALL.len());

        let shown = |key: ParameterKey| {
            rows.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.clone())
                .unwrap()
        };
        assert_eq!(shown(ParameterKey::Seed), "\u{2014}");
        assert_eq!(shown(ParameterKey::Temperature), "0.7");
        assert_eq!(shown(ParameterKey::CrisisMode), "off");
    }
}
