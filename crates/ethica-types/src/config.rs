//! Client configuration types for Ethica.
//!
//! `ClientConfig` represents `config.toml` in the data directory: where the
//! backend lives and the starting values of the parameter controls.

use serde::{Deserialize, Serialize};

use crate::parameters::ParameterSet;

/// Base URL used when neither the config file nor the command line set one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Top-level configuration for the Ethica client.
///
/// Loaded from `~/.ethica/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base path of the backend API (e.g. `http://localhost:5000/api`).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Starting values for the parameter controls.
    #[serde(default)]
    pub parameters: ParameterSet,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            parameters: ParameterSet::default(),
        }
    }
}
