//! Public HTTP surface of the catalogue.

pub mod error;
mod films;
mod genres;
mod identity;
mod middleware;
mod params;
mod persons;
mod state;

pub use middleware::RequestContext;
pub use state::AppState;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware as axum_middleware,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::application::error::ErrorReport;
use error::{ApiErrorBody, ApiErrorMessage, codes};
use middleware::{log_responses, set_request_context};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/films", get(films::list_films))
        .route("/api/v1/films/search", get(films::search_films))
        .route("/api/v1/films/{film_id}", get(films::film_details))
        .route("/api/v1/genres", get(genres::list_genres))
        .route("/api/v1/genres/{genre_id}", get(genres::genre_details))
        .route("/api/v1/genres/{genre_id}/films", get(genres::genre_films))
        .route("/api/v1/persons", get(persons::list_persons))
        .route("/api/v1/persons/search", get(persons::search_persons))
        .route("/api/v1/persons/{person_id}", get(persons::person_details))
        .route("/api/v1/persons/{person_id}/films", get(persons::person_films))
        .route("/_health", get(health))
        .fallback(fallback)
        .with_state(state)
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
}

async fn health(State(state): State<AppState>) -> Response {
    match state.engine.ping().await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_error(
                "infra::http::health",
                StatusCode::SERVICE_UNAVAILABLE,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}

async fn fallback() -> Response {
    let body = ApiErrorBody {
        error: ApiErrorMessage {
            code: codes::NOT_FOUND.to_string(),
            message: "Route not found".to_string(),
            hint: None,
        },
    };
    let mut response = (StatusCode::NOT_FOUND, Json(body)).into_response();
    ErrorReport::from_message(
        "infra::http::fallback",
        StatusCode::NOT_FOUND,
        "no route matched",
    )
    .attach(&mut response);
    response
}
