use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::sync::Arc;
use tower::ServiceExt;
use vision::annotate::{
    AnnotationResult, BoundingPoly, EntityAnnotation, FaceAnnotation, TextAnnotation, Vertex,
    VisionProvider,
};
use vision::common::{AnnotationRequest, FeatureType, VisionError, VisionResult};
use vision::service::VisionService;
use vision_ocr::server::routes::router;

const BOUNDARY: &str = "vision-ocr-test-boundary";

struct CannedProvider {
    fail_with: Option<String>,
}

#[async_trait]
impl VisionProvider for CannedProvider {
    async fn annotate(&self, request: &AnnotationRequest) -> VisionResult<AnnotationResult> {
        if let Some(message) = &self.fail_with {
            return Err(VisionError::ExternalService(message.clone()));
        }
        Ok(match request.feature {
            FeatureType::Text => AnnotationResult::Text(TextAnnotation {
                text: "STOP\n".to_string(),
                ..Default::default()
            }),
            FeatureType::DocumentText => AnnotationResult::Text(TextAnnotation::default()),
            FeatureType::Landmark => AnnotationResult::Landmarks(vec![EntityAnnotation {
                mid: "/m/0k3p".to_string(),
                description: "Gyeongbokgung".to_string(),
                score: 0.75,
                ..Default::default()
            }]),
            FeatureType::Face => AnnotationResult::Faces(vec![FaceAnnotation {
                fd_bounding_poly: Some(BoundingPoly {
                    vertices: vec![Vertex::new(10, 10), Vertex::new(30, 10), Vertex::new(30, 30), Vertex::new(10, 30)],
                }),
                ..Default::default()
            }]),
        })
    }

    async fn annotate_pdf(&self, _pdf: &[u8]) -> VisionResult<Vec<TextAnnotation>> {
        Ok(vec![
            TextAnnotation { text: "first page".to_string(), ..Default::default() },
            TextAnnotation { text: "second page".to_string(), ..Default::default() },
        ])
    }
}

fn app(fail_with: Option<&str>) -> Router {
    let provider = CannedProvider { fail_with: fail_with.map(str::to_string) };
    router(VisionService::new(Arc::new(provider)), 1024 * 1024)
}

fn png(width: u32, height: u32) -> Vec<u8> {
    let mut buffer = Vec::new();
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([255, 255, 255])))
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .unwrap();
    buffer
}

fn multipart_request(uri: &str, field_name: &str, file_name: Option<&str>, data: &[u8]) -> Request<Body> {
    let disposition = match file_name {
        Some(file_name) => format!("form-data; name=\"{}\"; filename=\"{}\"", field_name, file_name),
        None => format!("form-data; name=\"{}\"", field_name),
    };
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(format!("Content-Disposition: {}\r\n", disposition).as_bytes());
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", BOUNDARY))
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

#[cfg(test)]
mod route_tests {
    use super::*;

    #[tokio::test]
    async fn test_ping_and_health() {
        let response = app(None)
            .oneshot(Request::builder().uri("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, b"pong");

        let response = app(None)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_bytes(response).await, b"healthy");
    }

    #[tokio::test]
    async fn test_extract_text() {
        let request = multipart_request("/extract-text", "file", Some("sign.png"), &png(8, 8));
        let response = app(None).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, b"STOP\n");
    }

    #[tokio::test]
    async fn test_detect_label_with_no_text_is_empty() {
        let request = multipart_request("/detect-label", "upload", Some("blank.png"), &png(8, 8));
        let response = app(None).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_bytes(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_detect_landmark() {
        let request = multipart_request("/detect-landmark", "file", None, &png(8, 8));
        let response = app(None).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = String::from_utf8(body_bytes(response).await).unwrap();
        assert_eq!(body, "[{description: \"Gyeongbokgung\", mid: \"/m/0k3p\", score: 0.75, locations: []}]");
    }

    #[tokio::test]
    async fn test_extract_pdf_text() {
        let request = multipart_request("/extract-pdf-text", "file", Some("doc.pdf"), b"%PDF-1.4");
        let response = app(None).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let pages: Vec<String> = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(pages, vec!["first page", "second page"]);
    }

    #[tokio::test]
    async fn test_detect_face_returns_annotated_image() {
        let request = multipart_request("/detect-face", "file", Some("face.png"), &png(40, 40));
        let response = app(None).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
        let output = image::load_from_memory(&body_bytes(response).await).unwrap().to_rgb8();
        assert_eq!(output.dimensions(), (40, 40));
        assert_eq!(*output.get_pixel(20, 10), Rgb([255, 255, 0]));
        assert_eq!(*output.get_pixel(20, 20), Rgb([255, 255, 255]));
    }

    #[tokio::test]
    async fn test_detect_face_with_bad_image_is_bad_request() {
        let request = multipart_request("/detect-face", "file", Some("face.png"), b"garbage");
        let response = app(None).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_upstream_error_is_bad_gateway_with_message() {
        let request = multipart_request("/extract-text", "file", Some("sign.png"), &png(8, 8));
        let response = app(Some("Quota exceeded")).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert!(body["message"].as_str().unwrap().contains("Quota exceeded"));
    }

    #[tokio::test]
    async fn test_missing_file_field() {
        let request = multipart_request("/extract-text", "comment", None, b"hello");
        let response = app(None).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_over_limit_is_json_payload_too_large() {
        let provider = CannedProvider { fail_with: None };
        let app = router(VisionService::new(Arc::new(provider)), 64);
        let request = multipart_request("/extract-text", "file", Some("big.png"), &png(32, 32));
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().contains("maximum request size"));
    }

    #[tokio::test]
    async fn test_streamed_upload_over_limit_is_json_error() {
        let provider = CannedProvider { fail_with: None };
        let app = router(VisionService::new(Arc::new(provider)), 64);
        let mut request = multipart_request("/extract-text", "file", Some("big.png"), &png(32, 32));
        request.headers_mut().remove(header::CONTENT_LENGTH);
        let response = app.oneshot(request).await.unwrap();

        assert!(response.status().is_client_error());
        let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body["success"], false);
    }
}

#[cfg(test)]
mod logger_tests {
    use log::{Level, Log, Metadata};
    use vision_ocr::common::logger_builder;

    fn enabled(logger: &env_logger::Logger, target: &str, level: Level) -> bool {
        logger.enabled(&Metadata::builder().target(target).level(level).build())
    }

    #[test]
    fn test_defaults_without_rust_log() {
        let logger = logger_builder("vision-ocr-server", None).build();

        assert!(enabled(&logger, "vision_ocr_server", Level::Trace));
        assert!(enabled(&logger, "vision::annotate::vision_api_call", Level::Info));
        assert!(!enabled(&logger, "vision::format::utils", Level::Debug));
    }

    #[test]
    fn test_rust_log_overrides_library_default() {
        let logger = logger_builder("vision-ocr-server", Some("vision=debug")).build();
        assert!(enabled(&logger, "vision::format::utils", Level::Debug));

        let logger = logger_builder("vision-ocr-server", Some("vision=warn")).build();
        assert!(!enabled(&logger, "vision::annotate::vision_api_call", Level::Info));
    }
}

#[cfg(test)]
mod config_tests {
    use std::collections::HashMap;
    use vision_ocr::server::config::{ServerConfig, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PORT};

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert!(config.vision.api_key.is_none());
    }

    #[test]
    fn test_reads_vision_settings() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("VISION_API_KEY", "secret"),
            ("VISION_API_URL", "http://localhost:9000"),
            ("VISION_API_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.vision.api_key.as_deref(), Some("secret"));
        assert_eq!(config.vision.url.as_deref(), Some("http://localhost:9000"));
        assert_eq!(config.vision.timeout_secs, Some(30));
    }

    #[test]
    fn test_invalid_port() {
        assert!(ServerConfig::from_lookup(lookup(&[("PORT", "not-a-port")])).is_err());
    }
}
