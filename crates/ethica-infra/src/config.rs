//! Client configuration loader for Ethica.
//!
//! Reads `config.toml` from the data directory (`~/.ethica/` in production)
//! and deserializes it into [`ClientConfig`]. Falls back to defaults when the
//! file is missing or malformed.

use std::path::{Path, PathBuf};

use ethica_types::config::ClientConfig;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "ETHICA_DATA_DIR";

/// Resolve the data directory: `$ETHICA_DATA_DIR`, else `~/.ethica`, else `./.ethica`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::home_dir()
        .map(|home| home.join(".ethica"))
        .unwrap_or_else(|| PathBuf::from(".ethica"))
}

/// Path of the config file inside `data_dir`.
pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config.toml")
}

/// Load client configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`ClientConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_client_config(data_dir: &Path) -> ClientConfig {
    let config_path = config_path(data_dir);

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ClientConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ClientConfig::default();
        }
    };

    match toml::from_str::<ClientConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ClientConfig::default()
        }
    }
}

/// Pick the backend base URL: an explicit override wins over the config file.
pub fn resolve_base_url(config: &ClientConfig, override_url: Option<&str>) -> String {
    override_url
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .unwrap_or(&config.base_url)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethica_types::config::DEFAULT_BASE_URL;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_client_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_client_config(tmp.path()).await;
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!((config.parameters.temperature - 0.7).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn load_client_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            config_path(tmp.path()),
            r#"
base_url = "http://ethics.internal:8080/api"

[parameters]
temperature = 0.3
max_tokens = 512
crisis_mode = true
stop_sequences = ["END"]
"#,
        )
        .await
        .unwrap();

        let config = load_client_config(tmp.path()).await;
        assert_eq!(config.base_url, "http://ethics.internal:8080/api");
        assert_eq!(config.parameters.max_tokens, 512);
        assert!(config.parameters.crisis_mode);
        assert_eq!(config.parameters.stop_sequences, Some(vec!["END".to_string()]));
        assert_eq!(config.parameters.top_k, 40);
    }

    #[tokio::test]
    async fn load_client_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(config_path(tmp.path()), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_client_config(tmp.path()).await;
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn resolve_base_url_prefers_override() {
        let config = ClientConfig::default();
        assert_eq!(
            resolve_base_url(&config, Some("http://other:9000/api")),
            "http://other:9000/api"
        );
        assert_eq!(resolve_base_url(&config, Some("  ")), DEFAULT_BASE_URL);
        assert_eq!(resolve_base_url(&config, None), DEFAULT_BASE_URL);
    }
}
