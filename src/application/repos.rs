//! Repository traits describing search-engine adapters.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::application::{
    pagination::PaginationParams,
    params::{FilmListParams, SearchParams},
};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("search engine unavailable: {0}")]
    Unavailable(String),
    #[error("search engine error: {0}")]
    Engine(String),
    #[error("malformed search engine response: {0}")]
    Decode(String),
}

impl RepoError {
    pub fn from_engine(err: impl std::fmt::Display) -> Self {
        Self::Engine(err.to_string())
    }
}

/// One document returned by the search engine, before entity mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
    #[serde(rename = "_source", default)]
    pub source: Value,
}

#[async_trait]
pub trait FilmsRepo: Send + Sync {
    async fn list_films(&self, params: &FilmListParams) -> Result<Vec<SearchHit>, RepoError>;

    async fn search_films(&self, params: &SearchParams) -> Result<Vec<SearchHit>, RepoError>;

    async fn find_film(&self, id: Uuid) -> Result<Option<SearchHit>, RepoError>;
}

#[async_trait]
pub trait GenresRepo: Send + Sync {
    async fn list_genres(&self, page: PaginationParams) -> Result<Vec<SearchHit>, RepoError>;

    async fn find_genre(&self, id: Uuid) -> Result<Option<SearchHit>, RepoError>;

    /// Films carrying the genre in engine order, windowed by `page`.
    async fn list_films_by_genre(
        &self,
        genre_id: Uuid,
        page: PaginationParams,
    ) -> Result<Vec<SearchHit>, RepoError>;
}

#[async_trait]
pub trait PersonsRepo: Send + Sync {
    async fn list_persons(&self, page: PaginationParams) -> Result<Vec<SearchHit>, RepoError>;

    async fn search_persons(&self, params: &SearchParams) -> Result<Vec<SearchHit>, RepoError>;

    async fn find_person(&self, id: Uuid) -> Result<Option<SearchHit>, RepoError>;

    /// Films where the person appears in any role; each film at most once.
    async fn list_films_by_person(
        &self,
        person_id: Uuid,
        page: PaginationParams,
    ) -> Result<Vec<SearchHit>, RepoError>;
}
