// src/errors.rs
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;
use uuid::Uuid;

/// Shown when the backend answers without any image and without any text.
pub const NO_IMAGE_FALLBACK: &str = "Không tìm thấy ảnh trong phản hồi từ AI.";

#[derive(Error, Debug)]
pub enum StudioError {
    /// A mode's required input is missing. Raised before any backend call.
    #[error("{0}")]
    ComposerPrecondition(String),

    #[error("Tạo ảnh thất bại: {0}")]
    GenerationEmpty(String),

    #[error("Backend error: {0}")]
    BackendTransport(String),

    /// Only ever built and logged inside the suggestion engine.
    #[error("Suggestion error: {0}")]
    Suggestion(String),

    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("A generation is already running for this session")]
    Busy,
}

impl StudioError {
    /// Backend answered, but without a single image part.
    pub fn generation_empty(explanation: Option<&str>) -> Self {
        let text = explanation
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .unwrap_or(NO_IMAGE_FALLBACK);
        StudioError::GenerationEmpty(text.to_string())
    }

    fn label(&self) -> &'static str {
        match self {
            StudioError::ComposerPrecondition(_) => "Missing input",
            StudioError::GenerationEmpty(_) => "Generation failed",
            StudioError::BackendTransport(_) => "AI service error",
            StudioError::Suggestion(_) => "Suggestion error",
            StudioError::ImageProcessing(_) => "Image processing error",
            StudioError::Validation(_) => "Validation error",
            StudioError::SessionNotFound(_) => "Session not found",
            StudioError::Busy => "Generation in progress",
        }
    }
}

impl ResponseError for StudioError {
    fn status_code(&self) -> StatusCode {
        match self {
            StudioError::ComposerPrecondition(_)
            | StudioError::ImageProcessing(_)
            | StudioError::Validation(_) => StatusCode::BAD_REQUEST,
            StudioError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            StudioError::Busy => StatusCode::CONFLICT,
            StudioError::GenerationEmpty(_) => StatusCode::BAD_GATEWAY,
            StudioError::BackendTransport(_) => StatusCode::SERVICE_UNAVAILABLE,
            StudioError::Suggestion(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.label(),
            "message": self.to_string()
        }))
    }
}
