// src/services/suggestion_engine.rs
use crate::errors::StudioError;
use crate::models::{ActiveMode, ImageValue, Mode, SuggestionList};
use crate::services::backend::{GenerateContentRequest, ImageBackend};
use log::{debug, error};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

const MAX_SUGGESTIONS: usize = 3;

const SYSTEM_INSTRUCTION: &str = "You are an expert in architectural and interior design visualization. Analyze the user's image and provide three creative, actionable suggestions in Vietnamese as a JSON array of strings. The suggestions should be concise (around 15-20 words each).";

#[derive(Debug, Deserialize)]
struct SuggestionPayload {
    #[serde(default)]
    suggestions: Vec<String>,
}

fn analysis_prompt(mode: Mode) -> &'static str {
    match mode {
        Mode::Exterior => "Analyze this exterior architectural image. Suggest three different creative ways to re-imagine it (e.g., different architectural styles, materials, or environments).",
        Mode::Interior => "Analyze this interior image. Provide three specific and creative suggestions for how our AI tool could transform it. Frame each suggestion as a clear instruction. For example: 'Biến căn phòng thành phong cách Japandi với gỗ sồi sáng và vải lanh màu be.' or 'Thêm hệ thống đèn LED âm trần và dưới kệ tủ để tạo không khí ấm cúng vào ban đêm.' Focus on actionable changes related to style, materials, and lighting that our AI can execute.",
        Mode::Planning => "Analyze this building. Suggest three concepts for developing the surrounding area into a larger, cohesive urban plan.",
        Mode::SketchColorize => "This is a sketch or 3D model. Suggest three distinct artistic styles to transform it into a professional architectural illustration (e.g., watercolor, black and white sketch, lineless art).",
        Mode::PlanTo3d => "This is a 2D floor plan. Suggest three different interior design themes or concepts that could be applied when converting it to 3D.",
        Mode::PlanToPerspective => "This is a 2D floor plan. Suggest three different moodboard concepts or interior styles (e.g., 'Japandi style with light oak and neutral fabrics', 'Industrial loft with exposed brick and black metal') that could be applied to it.",
    }
}

fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "suggestions": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            }
        }
    })
}

/// Models sometimes wrap JSON in a markdown fence even when a schema is set.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}

pub struct SuggestionEngine {
    backend: Arc<dyn ImageBackend>,
    text_model: String,
}

impl SuggestionEngine {
    pub fn new(backend: Arc<dyn ImageBackend>, text_model: impl Into<String>) -> Self {
        Self {
            backend,
            text_model: text_model.into(),
        }
    }

    /// Never fails: any error is logged and yields an empty list.
    pub async fn suggest(&self, image: &ImageValue, mode: ActiveMode) -> SuggestionList {
        let mode = match mode {
            ActiveMode::Generate(mode) => mode,
            ActiveMode::Gallery => return Vec::new(),
        };

        match self.fetch(image, mode).await {
            Ok(mut suggestions) => {
                suggestions.truncate(MAX_SUGGESTIONS);
                debug!("Fetched {} suggestion(s) for {}", suggestions.len(), mode);
                suggestions
            }
            Err(e) => {
                error!("Error generating AI suggestions for {}: {}", mode, e);
                Vec::new()
            }
        }
    }

    async fn fetch(&self, image: &ImageValue, mode: Mode) -> Result<SuggestionList, StudioError> {
        let request = GenerateContentRequest::structured(
            image,
            analysis_prompt(mode),
            SYSTEM_INSTRUCTION,
            response_schema(),
        );
        let response = self
            .backend
            .generate_content(&self.text_model, &request)
            .await
            .map_err(|e| StudioError::Suggestion(e.to_string()))?;

        let text = response.text();
        if text.trim().is_empty() {
            return Err(StudioError::Suggestion("empty response".to_string()));
        }
        let payload: SuggestionPayload = serde_json::from_str(strip_code_fence(&text))
            .map_err(|e| StudioError::Suggestion(format!("unparseable response: {}", e)))?;

        Ok(payload
            .suggestions
            .into_iter()
            .map(|suggestion| suggestion.trim().to_string())
            .filter(|suggestion| !suggestion.is_empty())
            .collect())
    }
}
