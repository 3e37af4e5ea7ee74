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
    params::{PageQuery, path_id, query},
};
use crate::{
    application::error::{AppError, ServiceError},
    cache::{RequestIdentity, prefixes},
    domain::entities::{FilmSummary, Genre},
};

pub async fn list_genres(
    State(state): State<AppState>,
    identity: RequestIdentity,
    extracted: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<Vec<Genre>>, AppError> {
    let page = query(extracted)?.pagination()?;

    let genres = state
        .cache
        .wrap_many(prefixes::GENRES_ALL, &identity, || async {
            state.genres.all(page).await.map_err(AppError::from)
        })
        .await?;

    Ok(Json(genres))
}

pub async fn genre_details(
    State(state): State<AppState>,
    identity: RequestIdentity,
    extracted: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Genre>, AppError> {
    let genre_id = path_id(extracted)?;

    let genre = state
        .cache
        .wrap_one(prefixes::GENRE, &identity, || async {
            state
                .genres
                .get_by_id(genre_id)
                .await
                .and_then(|found| found.ok_or(ServiceError::NotFound { entity: "genre" }))
                .map_err(AppError::from)
        })
        .await?;

    Ok(Json(genre))
}

pub async fn genre_films(
    State(state): State<AppState>,
    identity: RequestIdentity,
    id: Result<Path<Uuid>, PathRejection>,
    extracted: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<Vec<FilmSummary>>, AppError> {
    let genre_id = path_id(id)?;
    let page = query(extracted)?.pagination()?;

    let films = state
        .cache
        .wrap_many(prefixes::FILMS_BY_GENRE, &identity, || async {
            state
                .genres
                .films_by_genre(genre_id, page)
                .await
                .map_err(AppError::from)
        })
        .await?;

    Ok(Json(films))
}
