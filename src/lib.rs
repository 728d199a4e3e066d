// src/lib.rs
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod services;

use crate::config::AppConfig;
use crate::services::{
    GenerationOrchestrator, ImageBackend, ImageCodec, SessionStore, SuggestionEngine,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<GenerationOrchestrator>,
    pub suggestion_engine: Arc<SuggestionEngine>,
    pub image_codec: Arc<ImageCodec>,
    pub session_store: Arc<SessionStore>,
}

impl AppState {
    pub fn new(backend: Arc<dyn ImageBackend>, config: &AppConfig) -> Self {
        Self {
            orchestrator: Arc::new(GenerationOrchestrator::new(
                backend.clone(),
                config.image_model.clone(),
            )),
            suggestion_engine: Arc::new(SuggestionEngine::new(backend, config.text_model.clone())),
            image_codec: Arc::new(ImageCodec::new(config.max_upload_dim)),
            session_store: Arc::new(SessionStore::new(config.session_ttl)),
        }
    }
}
