//! Catalogue entities as stored in the search engine documents.

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Genre reference denormalised onto a film document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreRef {
    pub id: Uuid,
    pub name: String,
}

/// Person reference denormalised onto a film document, one list per role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRef {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Film {
    pub id: Uuid,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub imdb_rating: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<GenreRef>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub actors: Vec<PersonRef>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub writers: Vec<PersonRef>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub directors: Vec<PersonRef>,
}

/// Reduced film projection returned by genre and person film listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilmSummary {
    pub id: Uuid,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub imdb_rating: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: Uuid,
    pub name: String,
}

/// The ingestion pipeline writes `null` for empty optional columns.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
