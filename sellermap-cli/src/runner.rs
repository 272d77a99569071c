//! Shared setup for commands that talk to the backend.

use std::future::Future;

use sellermap::api::{ApiClient, ApiConfig};
use sellermap::config::ConfigFile;
use sellermap::logging::{init_logging, LoggingGuard};
use tokio::runtime::Runtime;
use tracing::info;

use crate::error::CliError;

/// Loads config, installs logging, and owns the Tokio runtime.
pub struct CliRunner {
    config: ConfigFile,
    runtime: Runtime,
    logging: LoggingGuard,
}

impl CliRunner {
    pub fn new(verbose: bool) -> Result<Self, CliError> {
        let config = ConfigFile::load()?;
        let logging = init_logging(&config.logging.file, verbose)?;
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("sellermap")
            .build()
            .map_err(|e| CliError::RuntimeCreation(e.to_string()))?;

        Ok(Self {
            config,
            runtime,
            logging,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    pub fn log_startup(&self, command: &str) {
        info!(
            version = env!("CARGO_PKG_VERSION"),
            command,
            log_file = %self.logging.log_file().display(),
            "SellerMap starting"
        );
    }

    /// Build the API client, with `base_url` overriding the configured one.
    pub fn api_client(&self, base_url: Option<String>) -> Result<ApiClient, CliError> {
        let mut api_config = self.config.api_config();
        if let Some(url) = base_url {
            api_config = ApiConfig {
                base_url: url,
                ..api_config
            };
        }
        Ok(ApiClient::new(&api_config)?)
    }

    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}
