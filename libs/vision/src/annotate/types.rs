use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::common::{VisionError, VisionResult};

use super::response::{EntityAnnotation, FaceAnnotation, TextAnnotation};

pub const DEFAULT_VISION_URL: &str = "https://vision.googleapis.com";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VisionConfig {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl VisionConfig {
    pub fn new(url: Option<String>, api_key: Option<String>, timeout_secs: Option<u64>) -> Self {
        Self {
            url,
            api_key,
            timeout_secs,
        }
    }

    /// Returns `(url, api_key, timeout)`; the URL falls back to the public endpoint.
    pub fn unpack(&self) -> VisionResult<(&str, &str, Option<Duration>)> {
        let url = self.url.as_deref().unwrap_or(DEFAULT_VISION_URL);
        let api_key = self.api_key.as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| VisionError::Config("API key is required for vision processing".to_string()))?;
        let timeout = self.timeout_secs.map(Duration::from_secs);

        Ok((url.trim_end_matches('/'), api_key, timeout))
    }
}

/// What a provider hands back for one `AnnotationRequest`.
#[derive(Clone, Debug)]
pub enum AnnotationResult {
    /// TEXT and DOCUMENT_TEXT. An image without text yields an empty annotation.
    Text(TextAnnotation),
    Landmarks(Vec<EntityAnnotation>),
    Faces(Vec<FaceAnnotation>),
}

impl AnnotationResult {
    pub fn kind(&self) -> &'static str {
        match self {
            AnnotationResult::Text(_) => "text",
            AnnotationResult::Landmarks(_) => "landmarks",
            AnnotationResult::Faces(_) => "faces",
        }
    }
}
