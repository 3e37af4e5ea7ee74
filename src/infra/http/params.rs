//! Query-string and path binding.

use axum::extract::{
    Path, Query,
    rejection::{PathRejection, QueryRejection},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::application::{error::AppError, pagination::PaginationParams, params::ParamsError};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PageQuery {
    pub page_size: Option<i64>,
    pub page_number: Option<i64>,
}

impl PageQuery {
    pub fn pagination(&self) -> Result<PaginationParams, ParamsError> {
        Ok(PaginationParams::from_page(self.page_size, self.page_number)?)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FilmListQuery {
    pub page_size: Option<i64>,
    pub page_number: Option<i64>,
    pub sort: Option<String>,
    pub genre: Option<Uuid>,
}

impl FilmListQuery {
    pub fn pagination(&self) -> Result<PaginationParams, ParamsError> {
        Ok(PaginationParams::from_page(self.page_size, self.page_number)?)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    pub query: Option<String>,
    pub page_size: Option<i64>,
    pub page_number: Option<i64>,
}

impl SearchQuery {
    pub fn pagination(&self) -> Result<PaginationParams, ParamsError> {
        Ok(PaginationParams::from_page(self.page_size, self.page_number)?)
    }
}

pub fn query<T>(extracted: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    extracted
        .map(|Query(value)| value)
        .map_err(|rejection| AppError::validation(rejection.body_text()))
}

pub fn path_id(extracted: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, AppError> {
    extracted
        .map(|Path(id)| id)
        .map_err(|rejection| AppError::validation(rejection.body_text()))
}
