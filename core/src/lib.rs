//! algoscope core
//!
//! Client-side orchestration for running and comparing algorithms on a
//! remote execution service: the algorithm catalog, validation of user
//! input, request construction and reconciliation of responses into a view
//! model that presentation layers render.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod algorithm;
pub mod backend;
pub mod config;
pub mod error;
pub mod execution;

pub use algorithm::{AlgorithmCatalog, AlgorithmDescriptor, AlgorithmKey, SelectionList, SelectionMode};
pub use backend::{Backend, HttpBackend};
pub use config::ClientConfig;
pub use error::{ClientError, ConfigError, FetchError, GenerationError, ValidationError};
pub use execution::{
    ComparisonView, ExecutionOutcome, ExecutionRequest, InputResolver, Metrics, Reconciled,
    ResultReconciler, RunMode,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
pub fn init() -> Result<ClientConfig, ConfigError> {
    init_with_config(None)
}

/// Initialize logging and settle the configuration.
///
/// Without an explicit configuration the defaults are read with environment
/// overrides applied. Initializing the logger twice is not an error.
pub fn init_with_config(config: Option<ClientConfig>) -> Result<ClientConfig, ConfigError> {
    if let Err(e) = env_logger::try_init() {
        log::debug!("Logger already initialized: {}", e);
    }
    let config = match config {
        Some(config) => {
            config.validate()?;
            config
        }
        None => ClientConfig::from_env()?,
    };
    log::info!("algoscope {} initialized against {}", VERSION, config.base_url);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_repeatable() {
        let config = ClientConfig::default();
        assert!(init_with_config(Some(config.clone())).is_ok());
        assert_eq!(init_with_config(Some(config.clone())).unwrap(), config);
    }

    #[test]
    fn init_rejects_invalid_config() {
        let config = ClientConfig { timeout_secs: 0, ..Default::default() };
        assert!(init_with_config(Some(config)).is_err());
    }
}
