use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::{
    application::{
        documents::{decode_hit, decode_hits},
        error::ServiceError,
        params::{FilmListParams, SearchParams},
        repos::FilmsRepo,
    },
    domain::entities::Film,
};

const ENTITY: &str = "film";

#[derive(Clone)]
pub struct FilmService {
    films: Arc<dyn FilmsRepo>,
}

impl FilmService {
    pub fn new(films: Arc<dyn FilmsRepo>) -> Self {
        Self { films }
    }

    #[instrument(skip(self))]
    pub async fn all(&self, params: &FilmListParams) -> Result<Vec<Film>, ServiceError> {
        let hits = self.films.list_films(params).await?;
        decode_hits(ENTITY, hits)
    }

    #[instrument(skip(self))]
    pub async fn search(&self, params: &SearchParams) -> Result<Vec<Film>, ServiceError> {
        let hits = self.films.search_films(params).await?;
        decode_hits(ENTITY, hits)
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Film>, ServiceError> {
        self.films
            .find_film(id)
            .await?
            .map(|hit| decode_hit(ENTITY, hit))
            .transpose()
    }
}
