//! Application services: parameter validation, repository seams and entity mapping.

pub mod documents;
pub mod error;
pub mod films;
pub mod genres;
pub mod pagination;
pub mod params;
pub mod persons;
pub mod repos;
