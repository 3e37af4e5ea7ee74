use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::application::repos::SearchHit;

#[derive(Debug, Clone, Error)]
pub enum SearchError {
    #[error("index `{index}` does not exist")]
    IndexNotFound { index: String },
    #[error("search engine unreachable: {0}")]
    Unavailable(String),
    #[error("search engine responded with {status}: {body}")]
    Response { status: u16, body: String },
    #[error("unexpected search engine payload: {0}")]
    Decode(String),
}

/// Operations the catalogue needs from the document search engine.
#[async_trait]
pub trait SearchEngine: Send + Sync {
    async fn ping(&self) -> Result<(), SearchError>;

    async fn index_exists(&self, index: &str) -> Result<bool, SearchError>;

    async fn create_index(&self, index: &str, schema: &Value) -> Result<(), SearchError>;

    /// Fetch one document by id. A missing document is `Ok(None)`; a missing index
    /// is [`SearchError::IndexNotFound`].
    async fn get_document(&self, index: &str, id: &str) -> Result<Option<SearchHit>, SearchError>;

    /// Run a query document and return the hits in engine order.
    async fn search(&self, index: &str, body: &Value) -> Result<Vec<SearchHit>, SearchError>;
}
