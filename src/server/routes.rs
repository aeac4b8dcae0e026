use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, StatusCode},
    middleware::map_response,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::limit::RequestBodyLimitLayer;
use vision::service::VisionService;

use super::service::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub service: VisionService,
}

pub fn router(service: VisionService, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/ping", get(|| async { "pong" }))
        .route("/health", get(|| async { "healthy" }))
        .route("/extract-text", post(extract_text))
        .route("/detect-landmark", post(detect_landmark))
        .route("/detect-label", post(detect_label))
        .route("/extract-pdf-text", post(extract_pdf_text))
        .route("/detect-face", post(detect_face))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
        .layer(map_response(payload_too_large_as_json))
        .with_state(AppState { service })
}

/// The body limit layer rejects oversized requests with a plain-text 413 before any handler runs.
async fn payload_too_large_as_json(response: Response) -> Response {
    let is_json = response.headers()
        .get(header::CONTENT_TYPE)
        .is_some_and(|value| value.as_bytes().starts_with(b"application/json"));
    if response.status() != StatusCode::PAYLOAD_TOO_LARGE || is_json {
        return response;
    }
    ApiError::new(StatusCode::PAYLOAD_TOO_LARGE, "Upload exceeds the maximum request size").into_response()
}

/// Takes the first multipart field carrying a file (a file name, or the field name `file`).
async fn read_upload(mut multipart: Multipart) -> Result<Vec<u8>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::new(e.status(), format!("Invalid multipart data: {}", e.body_text())))?
    {
        if field.file_name().is_none() && field.name() != Some("file") {
            log::debug!("Skipping multipart field {:?}", field.name());
            continue;
        }

        let file_name = field.file_name().unwrap_or("<unnamed>").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::new(e.status(), format!("Failed to read upload {}: {}", file_name, e.body_text())))?;
        log::info!("Received upload {} ({} bytes)", file_name, data.len());
        return Ok(data.to_vec());
    }

    Err(ApiError::bad_request("No file provided in multipart request"))
}

async fn extract_text(State(state): State<AppState>, multipart: Multipart) -> Result<String, ApiError> {
    let file = read_upload(multipart).await?;
    Ok(state.service.extract_text_from_image(file).await?)
}

async fn detect_landmark(State(state): State<AppState>, multipart: Multipart) -> Result<String, ApiError> {
    let file = read_upload(multipart).await?;
    Ok(state.service.get_landmark_from_image(file).await?)
}

async fn detect_label(State(state): State<AppState>, multipart: Multipart) -> Result<String, ApiError> {
    let file = read_upload(multipart).await?;
    Ok(state.service.detect_label_from_image(file).await?)
}

async fn extract_pdf_text(State(state): State<AppState>, multipart: Multipart) -> Result<Json<Vec<String>>, ApiError> {
    let file = read_upload(multipart).await?;
    Ok(Json(state.service.extract_text_from_pdf(file).await?))
}

async fn detect_face(State(state): State<AppState>, multipart: Multipart) -> Result<Response, ApiError> {
    let file = read_upload(multipart).await?;
    let rendered = state.service.detect_face_from_image(file).await?;
    Ok(([(header::CONTENT_TYPE, rendered.mime_type())], rendered.bytes).into_response())
}
