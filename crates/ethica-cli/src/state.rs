//! Application state wiring configuration and the backend gateway together.
//!
//! AppState pins the core's generic `ChatController` to the concrete
//! `HttpGateway` from ethica-infra.

use std::path::PathBuf;
use std::sync::Arc;

use ethica_core::conversation::ChatController;
use ethica_infra::HttpGateway;
use ethica_infra::config::{load_client_config, resolve_base_url, resolve_data_dir};
use ethica_types::config::ClientConfig;

/// Controller type pinned to the HTTP gateway.
pub type ConcreteChatController = ChatController<HttpGateway>;

/// Shared application state for every command.
#[derive(Clone)]
pub struct AppState {
    pub config: ClientConfig,
    pub data_dir: PathBuf,
    pub base_url: String,
    pub gateway: Arc<HttpGateway>,
}

impl AppState {
    /// Load configuration and build the gateway.
    ///
    /// `base_url_override` comes from `--base-url` / `ETHICA_BASE_URL` and
    /// wins over the config file.
    pub async fn init(base_url_override: Option<&str>) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        let config = load_client_config(&data_dir).await;
        let base_url = resolve_base_url(&config, base_url_override);

        tracing::debug!(data_dir = %data_dir.display(), base_url = %base_url, "application state initialized");

        let gateway = Arc::new(HttpGateway::new(base_url.clone()));
        Ok(Self {
            config,
            data_dir,
            base_url,
            gateway,
        })
    }

    /// A fresh controller with an empty session and the configured parameters.
    pub fn controller(&self) -> ConcreteChatController {
        ChatController::new(Arc::clone(&self.gateway), self.config.parameters.clone())
    }
}
