// src/services/mod.rs
pub mod backend;
pub mod gemini_client;
pub mod image_codec;
pub mod orchestrator;
pub mod response_normalizer;
pub mod session_store;
pub mod suggestion_engine;

pub use backend::ImageBackend;
pub use gemini_client::GeminiClient;
pub use image_codec::ImageCodec;
pub use orchestrator::GenerationOrchestrator;
pub use session_store::SessionStore;
pub use suggestion_engine::SuggestionEngine;
