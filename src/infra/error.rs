use thiserror::Error;

use crate::{cache::CacheStoreError, infra::elastic::SearchError};

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
    #[error("configuration error: {message}")]
    Configuration { message: String },
    #[error("search engine error: {0}")]
    SearchEngine(#[from] SearchError),
    #[error("cache store error: {0}")]
    CacheStore(#[from] CacheStoreError),
}

impl InfraError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn telemetry(message: impl Into<String>) -> Self {
        Self::Telemetry(message.into())
    }
}
