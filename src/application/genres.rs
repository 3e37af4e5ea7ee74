use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::{
    application::{
        documents::{decode_hit, decode_hits},
        error::ServiceError,
        pagination::PaginationParams,
        repos::GenresRepo,
    },
    domain::entities::{FilmSummary, Genre},
};

const ENTITY: &str = "genre";

#[derive(Clone)]
pub struct GenreService {
    genres: Arc<dyn GenresRepo>,
}

impl GenreService {
    pub fn new(genres: Arc<dyn GenresRepo>) -> Self {
        Self { genres }
    }

    #[instrument(skip(self))]
    pub async fn all(&self, page: PaginationParams) -> Result<Vec<Genre>, ServiceError> {
        let hits = self.genres.list_genres(page).await?;
        decode_hits(ENTITY, hits)
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Genre>, ServiceError> {
        self.genres
            .find_genre(id)
            .await?
            .map(|hit| decode_hit(ENTITY, hit))
            .transpose()
    }

    /// Films tagged with the genre. An unknown genre is an error, a known one with
    /// no films is an empty list.
    #[instrument(skip(self))]
    pub async fn films_by_genre(
        &self,
        genre_id: Uuid,
        page: PaginationParams,
    ) -> Result<Vec<FilmSummary>, ServiceError> {
        if self.get_by_id(genre_id).await?.is_none() {
            return Err(ServiceError::ParentNotFound { entity: ENTITY });
        }

        let hits = self.genres.list_films_by_genre(genre_id, page).await?;
        decode_hits("film", hits)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::application::repos::{RepoError, SearchHit};

    struct StubGenres {
        genre: Option<Uuid>,
        films: Vec<SearchHit>,
        film_calls: AtomicUsize,
    }

    #[async_trait]
    impl GenresRepo for StubGenres {
        async fn list_genres(&self, _page: PaginationParams) -> Result<Vec<SearchHit>, RepoError> {
            Ok(Vec::new())
        }

        async fn find_genre(&self, id: Uuid) -> Result<Option<SearchHit>, RepoError> {
            Ok(self.genre.filter(|known| *known == id).map(|id| SearchHit {
                id: id.to_string(),
                score: None,
                source: json!({"id": id, "name": "Sci-Fi"}),
            }))
        }

        async fn list_films_by_genre(
            &self,
            _genre_id: Uuid,
            _page: PaginationParams,
        ) -> Result<Vec<SearchHit>, RepoError> {
            self.film_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.films.clone())
        }
    }

    #[tokio::test]
    async fn unknown_genre_is_parent_not_found() {
        let repo = Arc::new(StubGenres {
            genre: None,
            films: Vec::new(),
            film_calls: AtomicUsize::new(0),
        });
        let service = GenreService::new(repo.clone());

        let err = service
            .films_by_genre(Uuid::new_v4(), PaginationParams::default())
            .await
            .expect_err("genre is absent");

        assert!(matches!(err, ServiceError::ParentNotFound { entity: "genre" }));
        assert_eq!(repo.film_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn known_genre_without_films_is_empty() {
        let genre_id = Uuid::new_v4();
        let service = GenreService::new(Arc::new(StubGenres {
            genre: Some(genre_id),
            films: Vec::new(),
            film_calls: AtomicUsize::new(0),
        }));

        let films = service
            .films_by_genre(genre_id, PaginationParams::default())
            .await
            .expect("genre exists");

        assert!(films.is_empty());
    }

    #[tokio::test]
    async fn films_are_mapped_to_summaries() {
        let genre_id = Uuid::new_v4();
        let film_id = Uuid::new_v4();
        let service = GenreService::new(Arc::new(StubGenres {
            genre: Some(genre_id),
            films: vec![SearchHit {
                id: film_id.to_string(),
                score: None,
                source: json!({
                    "id": film_id,
                    "title": "Solaris",
                    "imdb_rating": 8.1,
                    "genres": [{"id": genre_id, "name": "Sci-Fi"}],
                }),
            }],
            film_calls: AtomicUsize::new(0),
        }));

        let films = service
            .films_by_genre(genre_id, PaginationParams::default())
            .await
            .expect("genre exists");

        assert_eq!(
            films,
            vec![FilmSummary {
                id: film_id,
                title: "Solaris".to_string(),
                imdb_rating: 8.1,
            }]
        );
    }
}
