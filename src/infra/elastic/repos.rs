use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use super::engine::{SearchEngine, SearchError};
use crate::{
    application::{
        pagination::PaginationParams,
        params::{FilmListParams, SearchParams},
        repos::{FilmsRepo, GenresRepo, PersonsRepo, RepoError, SearchHit},
    },
    query::{self, FILMS_INDEX, GENRES_INDEX, PERSONS_INDEX},
};

/// Repository implementation for every catalogue entity over one search engine.
#[derive(Clone)]
pub struct ElasticRepositories {
    engine: Arc<dyn SearchEngine>,
}

impl ElasticRepositories {
    pub fn new(engine: Arc<dyn SearchEngine>) -> Self {
        Self { engine }
    }

    async fn search(&self, index: &'static str, body: Value) -> Result<Vec<SearchHit>, RepoError> {
        match self.engine.search(index, &body).await {
            Ok(hits) => Ok(hits),
            Err(SearchError::IndexNotFound { .. }) => {
                debug!(target: "kinoteka::elastic", index, "index missing; returning no hits");
                Ok(Vec::new())
            }
            Err(err) => Err(map_search_error(err)),
        }
    }

    async fn get(&self, index: &'static str, id: Uuid) -> Result<Option<SearchHit>, RepoError> {
        match self.engine.get_document(index, &id.to_string()).await {
            Ok(hit) => Ok(hit),
            Err(SearchError::IndexNotFound { .. }) => {
                debug!(target: "kinoteka::elastic", index, "index missing; document absent");
                Ok(None)
            }
            Err(err) => Err(map_search_error(err)),
        }
    }
}

fn map_search_error(err: SearchError) -> RepoError {
    match err {
        SearchError::Unavailable(reason) => RepoError::Unavailable(reason),
        SearchError::Decode(reason) => RepoError::Decode(reason),
        other => RepoError::from_engine(other),
    }
}

#[async_trait]
impl FilmsRepo for ElasticRepositories {
    async fn list_films(&self, params: &FilmListParams) -> Result<Vec<SearchHit>, RepoError> {
        self.search(FILMS_INDEX, query::films::list_query(params))
            .await
    }

    async fn search_films(&self, params: &SearchParams) -> Result<Vec<SearchHit>, RepoError> {
        self.search(FILMS_INDEX, query::films::search_query(params))
            .await
    }

    async fn find_film(&self, id: Uuid) -> Result<Option<SearchHit>, RepoError> {
        self.get(FILMS_INDEX, id).await
    }
}

#[async_trait]
impl GenresRepo for ElasticRepositories {
    async fn list_genres(&self, page: PaginationParams) -> Result<Vec<SearchHit>, RepoError> {
        self.search(GENRES_INDEX, query::genres::all_query(page))
            .await
    }

    async fn find_genre(&self, id: Uuid) -> Result<Option<SearchHit>, RepoError> {
        self.get(GENRES_INDEX, id).await
    }

    async fn list_films_by_genre(
        &self,
        genre_id: Uuid,
        page: PaginationParams,
    ) -> Result<Vec<SearchHit>, RepoError> {
        self.search(FILMS_INDEX, query::genres::films_query(genre_id, page))
            .await
    }
}

#[async_trait]
impl PersonsRepo for ElasticRepositories {
    async fn list_persons(&self, page: PaginationParams) -> Result<Vec<SearchHit>, RepoError> {
        self.search(PERSONS_INDEX, query::persons::all_query(page))
            .await
    }

    async fn search_persons(&self, params: &SearchParams) -> Result<Vec<SearchHit>, RepoError> {
        self.search(PERSONS_INDEX, query::persons::search_query(params))
            .await
    }

    async fn find_person(&self, id: Uuid) -> Result<Option<SearchHit>, RepoError> {
        self.get(PERSONS_INDEX, id).await
    }

    async fn list_films_by_person(
        &self,
        person_id: Uuid,
        page: PaginationParams,
    ) -> Result<Vec<SearchHit>, RepoError> {
        self.search(FILMS_INDEX, query::persons::films_query(person_id, page))
            .await
    }
}
