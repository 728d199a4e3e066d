// src/handlers.rs
use crate::{AppState, errors::StudioError, models::*};
use actix_multipart::Multipart;
use actix_web::{Error, HttpResponse, web};
use bytes::BytesMut;
use futures_util::TryStreamExt;
use log::info;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub mode: Mode,
    #[serde(default)]
    pub settings: RenderSettings,
}

#[derive(Debug, Deserialize)]
pub struct RefineRequest {
    pub index: usize,
    pub instruction: String,
}

/// `"original"` for the active image, or an index into the current results.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum InpaintTarget {
    Result(usize),
    Named(String),
}

#[derive(Debug, Deserialize)]
pub struct InpaintRequest {
    pub target: InpaintTarget,
    /// Canvas export, `data:image/png;base64,...`.
    pub mask: String,
    pub instruction: String,
    #[serde(default)]
    pub reference: Option<ImageValue>,
}

#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    pub image: ImageValue,
}

#[derive(Debug, Deserialize)]
pub struct SuggestionQuery {
    pub mode: Option<String>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/sessions", web::post().to(create_session))
            .route("/sessions/{id}", web::get().to(get_session))
            .route("/sessions/{id}", web::delete().to(delete_session))
            .route("/sessions/{id}/generate", web::post().to(generate))
            .route("/sessions/{id}/refine", web::post().to(refine))
            .route("/sessions/{id}/inpaint", web::post().to(inpaint))
            .route("/sessions/{id}/active", web::post().to(set_active))
            .route("/sessions/{id}/gallery", web::get().to(gallery))
            .route("/sessions/{id}/suggestions", web::get().to(suggestions)),
    )
    .route("/health", web::get().to(health_check));
}

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "archviz",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn create_session(
    mut payload: Multipart,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let mut upload = None;

    while let Some(mut field) = payload.try_next().await? {
        let filename = match field.content_disposition().get_filename() {
            Some(name) => name.to_string(),
            None => continue,
        };
        let content_type = field.content_type().map(|ct| ct.to_string());

        let mut image_data = BytesMut::new();
        while let Some(chunk) = field.try_next().await? {
            image_data.extend_from_slice(&chunk);
        }

        upload = Some((filename, content_type, image_data.freeze()));
        break;
    }

    let (filename, content_type, image_data) =
        upload.ok_or_else(|| StudioError::Validation("No image file provided".to_string()))?;

    let image = data
        .image_codec
        .encode_upload(&image_data, content_type.as_deref(), &filename)?;
    let session = data.session_store.create(image).await;
    info!("Created session {} for {}", session.id, filename);

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "session_id": session.id,
        "image": session.active_image
    })))
}

pub async fn get_session(
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let session = data.session_store.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(session.snapshot()))
}

pub async fn delete_session(
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let session_id = path.into_inner();
    data.session_store.remove(session_id).await?;
    info!("Deleted session {}", session_id);
    Ok(HttpResponse::NoContent().finish())
}

pub async fn generate(
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
    body: web::Json<GenerateRequest>,
) -> Result<HttpResponse, Error> {
    let session_id = path.into_inner();
    let request = body.into_inner();

    // The guard clears the in-flight flag even if this request is dropped mid-call.
    let (session, guard) = data.session_store.start_generation(session_id).await?;
    let outcome = data
        .orchestrator
        .generate(request.mode, &session.active_image, &request.settings)
        .await;

    guard.finish(outcome.as_ref().ok().cloned()).await?;
    let images = outcome?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "images": images })))
}

pub async fn refine(
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
    body: web::Json<RefineRequest>,
) -> Result<HttpResponse, Error> {
    let session_id = path.into_inner();
    let session = data.session_store.get(session_id).await?;
    let original = session.result(body.index)?.clone();

    let refined = data.orchestrator.refine(&original, &body.instruction).await?;
    data.session_store
        .replace_image(session_id, &original, refined.clone())
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "image": refined })))
}

pub async fn inpaint(
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
    body: web::Json<InpaintRequest>,
) -> Result<HttpResponse, Error> {
    let session_id = path.into_inner();
    let request = body.into_inner();
    let session = data.session_store.get(session_id).await?;

    let mask = ImageValue::from_data_url(&request.mask, "mask.png")?;
    data.image_codec.check(&mask)?;
    if let Some(reference) = request.reference.as_ref() {
        data.image_codec.check(reference)?;
    }

    let (target, is_original) = match &request.target {
        InpaintTarget::Named(name) if name == "original" => (session.active_image.clone(), true),
        InpaintTarget::Named(name) => {
            return Err(StudioError::Validation(format!("Unknown inpaint target: {}", name)).into());
        }
        InpaintTarget::Result(index) => (session.result(*index)?.clone(), false),
    };

    let edited = data
        .orchestrator
        .inpaint(&target, &mask, &request.instruction, request.reference.as_ref())
        .await?;

    if is_original {
        data.session_store
            .prepend_result(session_id, edited.clone())
            .await?;
    } else {
        data.session_store
            .replace_image(session_id, &target, edited.clone())
            .await?;
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({ "image": edited })))
}

pub async fn set_active(
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
    body: web::Json<SetActiveRequest>,
) -> Result<HttpResponse, Error> {
    data.session_store
        .set_active(path.into_inner(), body.into_inner().image)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn gallery(
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let images = data.session_store.gallery(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "images": images })))
}

/// Always 200 for a known session; an unknown or gallery mode yields no suggestions.
pub async fn suggestions(
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
    query: web::Query<SuggestionQuery>,
) -> Result<HttpResponse, Error> {
    let session = data.session_store.get(path.into_inner()).await?;
    let mode = query
        .mode
        .as_deref()
        .and_then(|mode| mode.parse::<ActiveMode>().ok());

    let suggestions = match mode {
        Some(mode) => {
            data.suggestion_engine
                .suggest(&session.active_image, mode)
                .await
        }
        None => Vec::new(),
    };

    Ok(HttpResponse::Ok().json(serde_json::json!({ "suggestions": suggestions })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::services::backend::testing::{Behavior, RecordingBackend};
    use crate::services::backend::{GenerateContentResponse, Part};
    use actix_web::{App, http::StatusCode, http::header, test};
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use image::{DynamicImage, ImageFormat, RgbImage};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::time::Duration;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::new(width, height))
            .write_to(&mut std::io::Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    fn state(backend: Arc<RecordingBackend>) -> AppState {
        let config = AppConfig::from_lookup(|key| {
            (key == "GEMINI_API_KEY").then(|| "test-key".to_string())
        })
        .unwrap();
        AppState::new(backend, &config)
    }

    async fn seeded(state: &AppState) -> Uuid {
        let source = ImageValue::new(STANDARD.encode(png(4, 4)), "image/png", "house.png");
        state.session_store.create(source).await.id
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state.clone()))
                    .configure(configure),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn health_reports_healthy() {
        let state = state(Arc::new(RecordingBackend::echo()));
        let app = app!(state);
        let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn multipart_upload_creates_session() {
        let state = state(Arc::new(RecordingBackend::echo()));
        let app = app!(state);

        let boundary = "archvizboundary";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"house.png\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(&png(8, 6));
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        let req = test::TestRequest::post()
            .uri("/api/v1/sessions")
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            ))
            .set_payload(body)
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(created["image"]["name"], "house.png");
        assert_eq!(created["image"]["mimeType"], "image/png");

        let id = created["session_id"].as_str().unwrap().to_string();
        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/sessions/{}", id))
            .to_request();
        let snapshot: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(snapshot["active_image"], "house.png");
        assert_eq!(snapshot["gallery_size"], 0);
    }

    #[actix_web::test]
    async fn exterior_generation_fills_results_and_gallery() {
        let backend = Arc::new(RecordingBackend::echo());
        let state = state(backend.clone());
        let id = seeded(&state).await;
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/sessions/{}/generate", id))
            .set_json(json!({ "mode": "exterior", "settings": { "facadeType": "villa" } }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["images"].as_array().unwrap().len(), 4);
        assert_eq!(body["images"][0]["data"], "result-0");

        let session = state.session_store.get(id).await.unwrap();
        assert!(!session.in_flight);
        assert_eq!(session.gallery.len(), 4);
        assert_eq!(backend.calls().len(), 4);
    }

    #[actix_web::test]
    async fn failed_generation_clears_in_flight_flag() {
        let state = state(Arc::new(RecordingBackend::new(Behavior::Error("quota".into()))));
        let id = seeded(&state).await;
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/sessions/{}/generate", id))
            .set_json(json!({ "mode": "planning" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let session = state.session_store.get(id).await.unwrap();
        assert!(!session.in_flight);
        assert!(session.gallery.is_empty());
    }

    #[actix_web::test]
    async fn empty_backend_answer_is_a_bad_gateway() {
        let state = state(Arc::new(RecordingBackend::new(Behavior::Respond(
            GenerateContentResponse::from_parts(vec![Part::text("blocked by safety")]),
        ))));
        let id = seeded(&state).await;
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/sessions/{}/generate", id))
            .set_json(json!({ "mode": "interior" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Tạo ảnh thất bại: blocked by safety");
    }

    #[actix_web::test]
    async fn cancelled_generation_releases_the_session() {
        let state = state(Arc::new(RecordingBackend::new(Behavior::Hang)));
        let id = seeded(&state).await;
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/sessions/{}/generate", id))
            .set_json(json!({ "mode": "planning" }))
            .to_request();
        let attempt =
            tokio::time::timeout(Duration::from_millis(50), test::call_service(&app, req)).await;
        assert!(attempt.is_err(), "the backend never answers");

        tokio::time::sleep(Duration::from_millis(20)).await;
        let session = state.session_store.get(id).await.unwrap();
        assert!(!session.in_flight);
        assert!(state.session_store.begin_generation(id).await.is_ok());
    }

    #[actix_web::test]
    async fn deleted_session_is_not_found() {
        let state = state(Arc::new(RecordingBackend::echo()));
        let id = seeded(&state).await;
        let app = app!(state);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/v1/sessions/{}", id))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/sessions/{}", id))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn concurrent_generate_is_rejected() {
        let state = state(Arc::new(RecordingBackend::echo()));
        let id = seeded(&state).await;
        state.session_store.begin_generation(id).await.unwrap();
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/sessions/{}/generate", id))
            .set_json(json!({ "mode": "planning" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        assert!(state.session_store.get(id).await.unwrap().in_flight);
    }

    #[actix_web::test]
    async fn perspective_without_moodboard_is_bad_request() {
        let backend = Arc::new(RecordingBackend::echo());
        let state = state(backend.clone());
        let id = seeded(&state).await;
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/sessions/{}/generate", id))
            .set_json(json!({ "mode": "plan_to_perspective" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(backend.calls().is_empty());
    }

    #[actix_web::test]
    async fn refine_replaces_result_in_place() {
        let backend = Arc::new(RecordingBackend::echo());
        let state = state(backend.clone());
        let id = seeded(&state).await;
        state.session_store.begin_generation(id).await.unwrap();
        state
            .session_store
            .finish_generation(
                id,
                Some(vec![
                    ImageValue::new("A", "image/png", "a.png"),
                    ImageValue::new("B", "image/png", "b.png"),
                ]),
            )
            .await
            .unwrap();
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/sessions/{}/refine", id))
            .set_json(json!({ "index": 1, "instruction": "warmer light" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["image"]["data"], "result-0");

        let session = state.session_store.get(id).await.unwrap();
        assert_eq!(session.results[1].data, "result-0");
        assert_eq!(session.gallery[1].data, "result-0");
        assert_eq!(backend.calls()[0].request.attachments()[0].data, "B");
    }

    #[actix_web::test]
    async fn refine_with_bad_index_is_bad_request() {
        let state = state(Arc::new(RecordingBackend::echo()));
        let id = seeded(&state).await;
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/sessions/{}/refine", id))
            .set_json(json!({ "index": 3, "instruction": "x" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn inpainting_original_prepends_result() {
        let backend = Arc::new(RecordingBackend::echo());
        let state = state(backend.clone());
        let id = seeded(&state).await;
        let app = app!(state);

        let mask = format!("data:image/png;base64,{}", STANDARD.encode(png(4, 4)));
        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/sessions/{}/inpaint", id))
            .set_json(json!({ "target": "original", "mask": mask, "instruction": "add a balcony" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let session = state.session_store.get(id).await.unwrap();
        assert_eq!(session.results[0].data, "result-0");
        assert_eq!(session.gallery[0].data, "result-0");
        assert_eq!(backend.calls()[0].request.attachments().len(), 2);
    }

    #[actix_web::test]
    async fn inpaint_rejects_unknown_target_and_bad_mask() {
        let state = state(Arc::new(RecordingBackend::echo()));
        let id = seeded(&state).await;
        let app = app!(state);

        let mask = format!("data:image/png;base64,{}", STANDARD.encode(png(4, 4)));
        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/sessions/{}/inpaint", id))
            .set_json(json!({ "target": "roof", "mask": mask, "instruction": "x" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/sessions/{}/inpaint", id))
            .set_json(json!({ "target": "original", "mask": "not-a-data-url", "instruction": "x" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn set_active_returns_no_content() {
        let state = state(Arc::new(RecordingBackend::echo()));
        let id = seeded(&state).await;
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/sessions/{}/active", id))
            .set_json(json!({ "image": { "data": "NEXT", "mimeType": "image/png", "name": "next.png" } }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            state.session_store.get(id).await.unwrap().active_image.data,
            "NEXT"
        );
    }

    #[actix_web::test]
    async fn suggestions_never_fail_for_known_session() {
        let backend = Arc::new(RecordingBackend::new(Behavior::Respond(
            GenerateContentResponse::from_parts(vec![Part::text(
                r#"{"suggestions": ["Mái ngói đỏ"]}"#,
            )]),
        )));
        let state = state(backend.clone());
        let id = seeded(&state).await;
        let app = app!(state);

        for (mode, expected) in [("gallery", 0), ("cubism", 0), ("exterior", 1)] {
            let req = test::TestRequest::get()
                .uri(&format!("/api/v1/sessions/{}/suggestions?mode={}", id, mode))
                .to_request();
            let body: Value = test::call_and_read_body_json(&app, req).await;
            assert_eq!(body["suggestions"].as_array().unwrap().len(), expected, "{}", mode);
        }
        assert_eq!(backend.calls().len(), 1);
    }

    #[actix_web::test]
    async fn unknown_session_is_not_found() {
        let state = state(Arc::new(RecordingBackend::echo()));
        let app = app!(state);
        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/sessions/{}/gallery", Uuid::new_v4()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
