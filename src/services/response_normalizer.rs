// src/services/response_normalizer.rs
use crate::errors::StudioError;
use crate::models::ImageValue;
use crate::services::backend::GenerateContentResponse;
use log::warn;

/// Turns a backend response into image values, or a `GenerationEmpty` failure.
pub fn normalize(response: &GenerateContentResponse) -> Result<Vec<ImageValue>, StudioError> {
    normalize_at(response, chrono::Utc::now().timestamp_millis())
}

pub(crate) fn normalize_at(
    response: &GenerateContentResponse,
    stamp_millis: i64,
) -> Result<Vec<ImageValue>, StudioError> {
    let parts = response.first_parts();
    let images: Vec<ImageValue> = parts
        .iter()
        .filter_map(|part| part.inline_data.as_ref())
        .filter(|inline| !inline.data.is_empty())
        .enumerate()
        .map(|(index, inline)| {
            ImageValue::new(
                inline.data.clone(),
                inline.mime_type.clone(),
                format!("generated-{}-{}.png", stamp_millis, index),
            )
        })
        .collect();

    if images.is_empty() {
        let explanation = parts.iter().find_map(|part| {
            part.text
                .as_deref()
                .map(str::trim)
                .filter(|text| !text.is_empty())
        });
        warn!(
            "Backend returned no image parts{}",
            explanation
                .map(|text| format!(": {}", text))
                .unwrap_or_default()
        );
        return Err(StudioError::generation_empty(explanation));
    }

    Ok(images)
}

/// Single-image variant used where exactly one result is consumed.
pub fn normalize_single(response: &GenerateContentResponse) -> Result<ImageValue, StudioError> {
    normalize(response)?
        .into_iter()
        .next()
        .ok_or_else(|| StudioError::generation_empty(None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::NO_IMAGE_FALLBACK;
    use crate::services::backend::{InlineData, Part};

    fn image_part(data: &str, mime: &str) -> Part {
        Part {
            inline_data: Some(InlineData {
                mime_type: mime.to_string(),
                data: data.to_string(),
            }),
            text: None,
        }
    }

    #[test]
    fn one_image_and_one_text_yields_one_image() {
        let response = GenerateContentResponse::from_parts(vec![
            Part::text("Here is your render"),
            image_part("AAAA", "image/jpeg"),
        ]);
        let images = normalize_at(&response, 1700000000000).unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].data, "AAAA");
        assert_eq!(images[0].mime_type, "image/jpeg");
        assert_eq!(images[0].name, "generated-1700000000000-0.png");
    }

    #[test]
    fn ordinals_follow_image_order() {
        let response = GenerateContentResponse::from_parts(vec![
            image_part("A", "image/png"),
            Part::text("between"),
            image_part("B", "image/png"),
        ]);
        let names: Vec<String> = normalize_at(&response, 7)
            .unwrap()
            .into_iter()
            .map(|image| image.name)
            .collect();
        assert_eq!(names, vec!["generated-7-0.png", "generated-7-1.png"]);
    }

    #[test]
    fn text_only_response_surfaces_backend_explanation() {
        let response = GenerateContentResponse::from_parts(vec![Part::text("quota exceeded")]);
        let err = normalize(&response).unwrap_err();
        assert!(matches!(err, StudioError::GenerationEmpty(_)));
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[test]
    fn empty_response_uses_generic_message() {
        let err = normalize(&GenerateContentResponse::default()).unwrap_err();
        assert!(matches!(err, StudioError::GenerationEmpty(_)));
        assert!(err.to_string().contains(NO_IMAGE_FALLBACK));
    }

    #[test]
    fn single_returns_first_image() {
        let response = GenerateContentResponse::from_parts(vec![
            image_part("FIRST", "image/png"),
            image_part("SECOND", "image/png"),
        ]);
        assert_eq!(normalize_single(&response).unwrap().data, "FIRST");
    }
}
