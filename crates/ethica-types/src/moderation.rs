//! One-line summary of the backend's moderation metadata.
//!
//! The metadata attached to assistant turns is otherwise opaque; only two
//! booleans are read from it.

use serde_json::Value;

use std::fmt;

/// Pass/fail view of the ethical checks attached to an assistant turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModerationSummary {
    /// `ethical_checks.harm_detection.has_harmful_intent` was `true`.
    pub harm_flagged: bool,
    /// `ethical_checks.system_integrity.is_safe` was `true`.
    pub integrity_passed: bool,
}

impl ModerationSummary {
    /// Read the summary from an assistant turn's metadata.
    ///
    /// Missing fields count as "not flagged" for harm and "not passed" for
    /// integrity.
    pub fn from_metadata(metadata: &Value) -> Self {
        let flag = |pointer: &str| {
            metadata
                .pointer(pointer)
                .and_then(Value::as_bool)
                .unwrap_or(false)
        };

        Self {
            harm_flagged: flag("/ethical_checks/harm_detection/has_harmful_intent"),
            integrity_passed: flag("/ethical_checks/system_integrity/is_safe"),
        }
    }
}

impl fmt::Display for ModerationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ethical Checks: Harm={}, Integrity={}",
            if self.harm_flagged { "Flagged" } else { "Passed" },
            if self.integrity_passed { "Passed" } else { "Failed" },
        )
    }
}
