//! Elasticsearch adapter: REST client, repositories and index bootstrap.

mod client;
mod engine;
mod repos;
mod schema;

pub use client::ElasticClient;
pub use engine::{SearchEngine, SearchError};
pub use repos::ElasticRepositories;
pub use schema::{Index, ensure_indices};
