//! Cloud Vision REST payloads. Only the fields this crate reads or forwards are modelled;
//! everything is `#[serde(default)]` since the API omits empty and zero-valued fields.
use serde::{Deserialize, Serialize};

use crate::common::FeatureType;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BatchAnnotateImagesRequest {
    pub requests: Vec<AnnotateImageRequest>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnnotateImageRequest {
    pub image: ImageContent,
    pub features: Vec<Feature>,
}

#[derive(Serialize)]
pub(crate) struct ImageContent {
    pub content: String,
}

#[derive(Serialize)]
pub(crate) struct Feature {
    #[serde(rename = "type")]
    pub feature_type: FeatureType,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BatchAnnotateFilesRequest {
    pub requests: Vec<AnnotateFileRequest>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnnotateFileRequest {
    pub input_config: InputConfig,
    pub features: Vec<Feature>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<Vec<u32>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InputConfig {
    pub content: String,
    pub mime_type: String,
}

#[derive(Deserialize, Default)]
pub(crate) struct BatchAnnotateImagesResponse {
    #[serde(default)]
    pub responses: Vec<AnnotateImageResponse>,
}

#[derive(Deserialize, Default)]
pub(crate) struct BatchAnnotateFilesResponse {
    #[serde(default)]
    pub responses: Vec<AnnotateFileResponse>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnnotateFileResponse {
    pub responses: Vec<AnnotateImageResponse>,
    pub total_pages: u32,
    pub error: Option<Status>,
}

/// Result of one image (or one PDF page) annotation.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnnotateImageResponse {
    pub face_annotations: Vec<FaceAnnotation>,
    pub landmark_annotations: Vec<EntityAnnotation>,
    pub text_annotations: Vec<EntityAnnotation>,
    pub full_text_annotation: Option<TextAnnotation>,
    pub error: Option<Status>,
    pub context: Option<ImageAnnotationContext>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageAnnotationContext {
    pub uri: String,
    pub page_number: u32,
}

/// Error status embedded in a response body.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Status {
    pub code: i32,
    pub message: String,
}

/// Structured OCR output: page -> block -> paragraph -> word -> symbol, plus the flattened text.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct TextAnnotation {
    pub pages: Vec<Page>,
    pub text: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Page {
    pub width: u32,
    pub height: u32,
    pub blocks: Vec<Block>,
    pub confidence: f32,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Block {
    pub paragraphs: Vec<Paragraph>,
    pub block_type: String,
    pub bounding_box: Option<BoundingPoly>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Paragraph {
    pub words: Vec<Word>,
    pub bounding_box: Option<BoundingPoly>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Word {
    pub symbols: Vec<Symbol>,
    pub bounding_box: Option<BoundingPoly>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Symbol {
    pub text: String,
}

/// Generic detection result; used for landmarks and per-word text annotations.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntityAnnotation {
    pub mid: String,
    pub locale: String,
    pub description: String,
    pub score: f32,
    pub bounding_poly: Option<BoundingPoly>,
    pub locations: Vec<LocationInfo>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocationInfo {
    pub lat_lng: Option<LatLng>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FaceAnnotation {
    /// Loose polygon around the whole head.
    pub bounding_poly: Option<BoundingPoly>,
    /// Tighter polygon around the skin area of the face. This is the one drawn.
    pub fd_bounding_poly: Option<BoundingPoly>,
    pub roll_angle: f32,
    pub pan_angle: f32,
    pub tilt_angle: f32,
    pub detection_confidence: f32,
    pub landmarking_confidence: f32,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct BoundingPoly {
    pub vertices: Vec<Vertex>,
}

/// Pixel coordinates. The API drops zero coordinates from the JSON.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Vertex {
    pub x: i32,
    pub y: i32,
}

impl Vertex {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}
