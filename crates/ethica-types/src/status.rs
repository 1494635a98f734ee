//! Backend status report (`GET /status`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Status report returned by the backend.
///
/// Only `status` is guaranteed; everything else the backend reports is kept
/// in `extra` for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStatus {
    #[serde(default = "unknown_status")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitoring: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn unknown_status() -> String {
    "unknown".to_string()
}

impl ServiceStatus {
    /// Whether the backend reports itself as operational.
    pub fn is_operational(&self) -> bool {
        self.status.eq_ignore_ascii_case("operational")
    }
}
