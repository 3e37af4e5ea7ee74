use std::error::Error as StdError;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{
    application::{params::ParamsError, repos::RepoError},
    cache::CacheError,
    infra::{
        error::InfraError,
        http::error::{ApiErrorBody, ApiErrorMessage, codes},
    },
};

#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub status: StatusCode,
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(source: &'static str, status: StatusCode, error: &dyn StdError) -> Self {
        let mut messages = vec![error.to_string()];
        let mut current = error.source();
        while let Some(inner) = current {
            messages.push(inner.to_string());
            current = inner.source();
        }
        Self {
            source,
            status,
            messages,
        }
    }

    pub fn from_message(
        source: &'static str,
        status: StatusCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source,
            status,
            messages: vec![message.into()],
        }
    }

    pub fn attach(self, response: &mut Response) {
        response.extensions_mut().insert(self);
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str },
    #[error("{entity} not found")]
    ParentNotFound { entity: &'static str },
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error("stored {entity} document could not be decoded: {source}")]
    Decode {
        entity: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Params(#[from] ParamsError),
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Service(ServiceError::NotFound { .. })
            | AppError::Service(ServiceError::ParentNotFound { .. }) => StatusCode::NOT_FOUND,
            AppError::Params(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Service(ServiceError::Repo(RepoError::Unavailable(_)))
            | AppError::Infra(InfraError::SearchEngine(_)) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Service(_)
            | AppError::Cache(_)
            | AppError::Infra(_)
            | AppError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Service(ServiceError::NotFound { .. })
            | AppError::Service(ServiceError::ParentNotFound { .. }) => codes::NOT_FOUND,
            AppError::Params(ParamsError::InvalidSortField { .. }) => codes::INVALID_SORT_FIELD,
            AppError::Params(_) | AppError::Validation(_) => codes::BAD_REQUEST,
            AppError::Service(ServiceError::Repo(RepoError::Unavailable(_)))
            | AppError::Infra(InfraError::SearchEngine(_)) => codes::SEARCH_UNAVAILABLE,
            AppError::Cache(_) => codes::CACHE,
            AppError::Service(_) | AppError::Infra(_) | AppError::Unexpected(_) => codes::INTERNAL,
        }
    }

    fn presentation_message(&self) -> String {
        match self {
            AppError::Service(ServiceError::NotFound { entity })
            | AppError::Service(ServiceError::ParentNotFound { entity }) => {
                format!("{entity} not found")
            }
            AppError::Params(ParamsError::InvalidSortField { field, .. }) => {
                format!("Cannot sort by `{field}`")
            }
            AppError::Params(ParamsError::InvalidPagination(err)) => err.to_string(),
            AppError::Validation(message) => message.clone(),
            AppError::Service(ServiceError::Repo(RepoError::Unavailable(_)))
            | AppError::Infra(InfraError::SearchEngine(_)) => {
                "Search service temporarily unavailable".to_string()
            }
            AppError::Cache(_) => "Response cache failure".to_string(),
            AppError::Service(_) | AppError::Infra(_) | AppError::Unexpected(_) => {
                "Unexpected error occurred".to_string()
            }
        }
    }

    fn hint(&self) -> Option<String> {
        match self {
            AppError::Params(ParamsError::InvalidSortField { allowed, .. }) => Some(format!(
                "Sortable fields: {}; prefix with `-` for descending order",
                allowed.join(", ")
            )),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ApiErrorBody {
            error: ApiErrorMessage {
                code: self.code().to_string(),
                message: self.presentation_message(),
                hint: self.hint(),
            },
        };
        let report = ErrorReport::from_error("application::error::AppError", status, &self);
        let mut response = (status, Json(body)).into_response();
        report.attach(&mut response);
        response
    }
}
