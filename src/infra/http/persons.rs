use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
};
use uuid::Uuid;

use super::{
    AppState,
    params::{PageQuery, SearchQuery, path_id, query},
};
use crate::{
    application::{
        error::{AppError, ServiceError},
        params::SearchParams,
    },
    cache::{RequestIdentity, prefixes},
    domain::entities::{FilmSummary, Person},
};

pub async fn list_persons(
    State(state): State<AppState>,
    identity: RequestIdentity,
    extracted: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<Vec<Person>>, AppError> {
    let page = query(extracted)?.pagination()?;

    let persons = state
        .cache
        .wrap_many(prefixes::PERSONS_ALL, &identity, || async {
            state.persons.all(page).await.map_err(AppError::from)
        })
        .await?;

    Ok(Json(persons))
}

pub async fn search_persons(
    State(state): State<AppState>,
    identity: RequestIdentity,
    extracted: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Vec<Person>>, AppError> {
    let raw = query(extracted)?;
    let params = SearchParams::new(raw.query.clone(), raw.pagination()?);

    let persons = state
        .cache
        .wrap_many(prefixes::PERSONS_SEARCH, &identity, || async {
            state.persons.search(&params).await.map_err(AppError::from)
        })
        .await?;

    Ok(Json(persons))
}

pub async fn person_details(
    State(state): State<AppState>,
    identity: RequestIdentity,
    extracted: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Person>, AppError> {
    let person_id = path_id(extracted)?;

    let person = state
        .cache
        .wrap_one(prefixes::PERSON, &identity, || async {
            state
                .persons
                .get_by_id(person_id)
                .await
                .and_then(|found| found.ok_or(ServiceError::NotFound { entity: "person" }))
                .map_err(AppError::from)
        })
        .await?;

    Ok(Json(person))
}

pub async fn person_films(
    State(state): State<AppState>,
    identity: RequestIdentity,
    id: Result<Path<Uuid>, PathRejection>,
    extracted: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<Vec<FilmSummary>>, AppError> {
    let person_id = path_id(id)?;
    let page = query(extracted)?.pagination()?;

    let films = state
        .cache
        .wrap_many(prefixes::FILMS_BY_PERSON, &identity, || async {
            state
                .persons
                .films_by_person(person_id, page)
                .await
                .map_err(AppError::from)
        })
        .await?;

    Ok(Json(films))
}
