use std::path::Path;
use std::sync::Arc;

use crate::annotate::{AnnotationResult, EntityAnnotation, FaceAnnotation, TextAnnotation, VisionProvider};
use crate::common::{AnnotationRequest, FeatureType, VisionError, VisionResult};
use crate::format::{format_document_text, format_landmarks, format_pdf_pages, format_text};
use crate::overlay::{FaceDescriptor, FaceOverlayRenderer, RenderedImage};

/// The upload operations: one provider call each, reshaped for the caller.
#[derive(Clone)]
pub struct VisionService {
    provider: Arc<dyn VisionProvider>,
    renderer: FaceOverlayRenderer,
}

impl VisionService {
    pub fn new(provider: Arc<dyn VisionProvider>) -> Self {
        Self::with_renderer(provider, FaceOverlayRenderer::default())
    }

    pub fn with_renderer(provider: Arc<dyn VisionProvider>, renderer: FaceOverlayRenderer) -> Self {
        Self { provider, renderer }
    }

    pub async fn extract_text_from_image(&self, image: Vec<u8>) -> VisionResult<String> {
        let annotation = self.annotate_text(image, FeatureType::Text).await?;
        Ok(format_text(&annotation))
    }

    pub async fn get_landmark_from_image(&self, image: Vec<u8>) -> VisionResult<String> {
        let result = self.provider.annotate(&AnnotationRequest::new(image, FeatureType::Landmark)).await?;
        let landmarks: Vec<EntityAnnotation> = match result {
            AnnotationResult::Landmarks(landmarks) => landmarks,
            other => return Err(unexpected_result(FeatureType::Landmark, &other)),
        };
        log::info!("Detected {} landmarks", landmarks.len());
        Ok(format_landmarks(&landmarks))
    }

    /// Runs document text detection; the block structure is only logged.
    pub async fn detect_label_from_image(&self, image: Vec<u8>) -> VisionResult<String> {
        let annotation = self.annotate_text(image, FeatureType::DocumentText).await?;
        Ok(format_document_text(&annotation))
    }

    pub async fn extract_text_from_pdf(&self, pdf: Vec<u8>) -> VisionResult<Vec<String>> {
        let pages = self.provider.annotate_pdf(&pdf).await?;
        log::info!("Extracted text from {} PDF pages", pages.len());
        Ok(format_pdf_pages(&pages))
    }

    pub async fn detect_face_from_image(&self, image: Vec<u8>) -> VisionResult<RenderedImage> {
        let result = self.provider.annotate(&AnnotationRequest::new(image.clone(), FeatureType::Face)).await?;
        let faces: Vec<FaceAnnotation> = match result {
            AnnotationResult::Faces(faces) => faces,
            other => return Err(unexpected_result(FeatureType::Face, &other)),
        };
        log::info!("Detected {} faces", faces.len());

        let descriptors = FaceDescriptor::from_annotations(&faces);
        self.renderer.render(&image, &descriptors)
    }

    /// Same as `detect_face_from_image`, and also writes the annotated image to `output`.
    pub async fn detect_face_to_file(&self, image: Vec<u8>, output: &Path) -> VisionResult<RenderedImage> {
        let rendered = self.detect_face_from_image(image).await?;
        tokio::fs::write(output, &rendered.bytes).await?;
        log::info!("Saved annotated image to {}", output.display());
        Ok(rendered)
    }

    async fn annotate_text(&self, image: Vec<u8>, feature: FeatureType) -> VisionResult<TextAnnotation> {
        match self.provider.annotate(&AnnotationRequest::new(image, feature)).await? {
            AnnotationResult::Text(annotation) => Ok(annotation),
            other => Err(unexpected_result(feature, &other)),
        }
    }
}

fn unexpected_result(feature: FeatureType, result: &AnnotationResult) -> VisionError {
    VisionError::ExternalService(format!(
        "{} request answered with {} result",
        feature.as_api_str(),
        result.kind()
    ))
}
