use std::sync::Arc;

use crate::{
    application::{films::FilmService, genres::GenreService, persons::PersonService},
    cache::CacheManager,
    infra::elastic::{ElasticRepositories, SearchEngine},
};

/// Long-lived handles shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub films: FilmService,
    pub genres: GenreService,
    pub persons: PersonService,
    pub cache: CacheManager,
    pub engine: Arc<dyn SearchEngine>,
}

impl AppState {
    pub fn new(engine: Arc<dyn SearchEngine>, cache: CacheManager) -> Self {
        let repositories = Arc::new(ElasticRepositories::new(engine.clone()));
        Self {
            films: FilmService::new(repositories.clone()),
            genres: GenreService::new(repositories.clone()),
            persons: PersonService::new(repositories),
            cache,
            engine,
        }
    }
}
