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
    params::{FilmListQuery, SearchQuery, path_id, query},
};
use crate::{
    application::{
        error::{AppError, ServiceError},
        params::{FilmListParams, SearchParams},
    },
    cache::{RequestIdentity, prefixes},
    domain::entities::Film,
};

pub async fn list_films(
    State(state): State<AppState>,
    identity: RequestIdentity,
    extracted: Result<Query<FilmListQuery>, QueryRejection>,
) -> Result<Json<Vec<Film>>, AppError> {
    let raw = query(extracted)?;
    let params = FilmListParams::parse(raw.genre, raw.pagination()?, raw.sort.as_deref())?;

    let films = state
        .cache
        .wrap_many(prefixes::FILMS_ALL, &identity, || async {
            state.films.all(&params).await.map_err(AppError::from)
        })
        .await?;

    Ok(Json(films))
}

pub async fn search_films(
    State(state): State<AppState>,
    identity: RequestIdentity,
    extracted: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Vec<Film>>, AppError> {
    let raw = query(extracted)?;
    let params = SearchParams::new(raw.query.clone(), raw.pagination()?);

    let films = state
        .cache
        .wrap_many(prefixes::FILMS_SEARCH, &identity, || async {
            state.films.search(&params).await.map_err(AppError::from)
        })
        .await?;

    Ok(Json(films))
}

pub async fn film_details(
    State(state): State<AppState>,
    identity: RequestIdentity,
    extracted: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Film>, AppError> {
    let film_id = path_id(extracted)?;

    let film = state
        .cache
        .wrap_one(prefixes::FILM, &identity, || async {
            state
                .films
                .get_by_id(film_id)
                .await
                .and_then(|found| found.ok_or(ServiceError::NotFound { entity: "film" }))
                .map_err(AppError::from)
        })
        .await?;

    Ok(Json(film))
}
