use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::{
    application::{
        documents::{decode_hit, decode_hits},
        error::ServiceError,
        pagination::PaginationParams,
        params::SearchParams,
        repos::PersonsRepo,
    },
    domain::entities::{FilmSummary, Person},
};

const ENTITY: &str = "person";

#[derive(Clone)]
pub struct PersonService {
    persons: Arc<dyn PersonsRepo>,
}

impl PersonService {
    pub fn new(persons: Arc<dyn PersonsRepo>) -> Self {
        Self { persons }
    }

    #[instrument(skip(self))]
    pub async fn all(&self, page: PaginationParams) -> Result<Vec<Person>, ServiceError> {
        let hits = self.persons.list_persons(page).await?;
        decode_hits(ENTITY, hits)
    }

    #[instrument(skip(self))]
    pub async fn search(&self, params: &SearchParams) -> Result<Vec<Person>, ServiceError> {
        let hits = self.persons.search_persons(params).await?;
        decode_hits(ENTITY, hits)
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Person>, ServiceError> {
        self.persons
            .find_person(id)
            .await?
            .map(|hit| decode_hit(ENTITY, hit))
            .transpose()
    }

    #[instrument(skip(self))]
    pub async fn films_by_person(
        &self,
        person_id: Uuid,
        page: PaginationParams,
    ) -> Result<Vec<FilmSummary>, ServiceError> {
        if self.get_by_id(person_id).await?.is_none() {
            return Err(ServiceError::ParentNotFound { entity: ENTITY });
        }

        let hits = self.persons.list_films_by_person(person_id, page).await?;
        decode_hits("film", hits)
    }
}
