use std::sync::Arc;

use crate::{
    backend::{Backend, HttpBackend},
    config::AppConfig,
    error::AppResult,
};

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn Backend>,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        Ok(Self::with_backend(Arc::new(HttpBackend::new(config)?)))
    }

    pub fn with_backend(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }
}
