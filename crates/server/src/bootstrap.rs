use std::sync::Arc;

use clerky_agent::llm::HttpCompletionClient;
use clerky_agent::runtime::AgentRuntime;
use clerky_core::catalog::Catalog;
use clerky_core::config::{AppConfig, ConfigError, LoadOptions};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub catalog: Arc<Catalog>,
    pub runtime: Arc<AgentRuntime>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("completion client initialization failed: {0}")]
    ClientInit(anyhow::Error),
    #[error("agent runtime initialization failed: {0}")]
    RuntimeInit(anyhow::Error),
}

pub fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config)
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let catalog = Arc::new(Catalog::seed());
    info!(
        event_name = "system.bootstrap.catalog_loaded",
        correlation_id = "bootstrap",
        products = catalog.products().len(),
        orders = catalog.orders().len(),
        "static catalog loaded"
    );

    let client =
        HttpCompletionClient::from_config(&config.llm).map_err(BootstrapError::ClientInit)?;
    let runtime = AgentRuntime::new(catalog.clone(), Arc::new(client))
        .map_err(BootstrapError::RuntimeInit)?;
    info!(
        event_name = "system.bootstrap.runtime_ready",
        correlation_id = "bootstrap",
        provider = ?config.llm.provider,
        "agent runtime initialized"
    );

    Ok(Application { config, catalog, runtime: Arc::new(runtime) })
}
