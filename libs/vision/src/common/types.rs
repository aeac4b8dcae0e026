use serde::{Deserialize, Serialize};

/// Detection task requested from the vision API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureType {
    #[serde(rename = "TEXT_DETECTION")]
    Text,
    #[serde(rename = "DOCUMENT_TEXT_DETECTION")]
    DocumentText,
    #[serde(rename = "LANDMARK_DETECTION")]
    Landmark,
    #[serde(rename = "FACE_DETECTION")]
    Face,
}

impl FeatureType {
    pub fn as_api_str(&self) -> &'static str {
        match self {
            FeatureType::Text => "TEXT_DETECTION",
            FeatureType::DocumentText => "DOCUMENT_TEXT_DETECTION",
            FeatureType::Landmark => "LANDMARK_DETECTION",
            FeatureType::Face => "FACE_DETECTION",
        }
    }
}

impl std::fmt::Display for FeatureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureType::Text => write!(f, "Text"),
            FeatureType::DocumentText => write!(f, "DocumentText"),
            FeatureType::Landmark => write!(f, "Landmark"),
            FeatureType::Face => write!(f, "Face"),
        }
    }
}

impl TryFrom<&str> for FeatureType {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "text" | "text-detection" => Ok(FeatureType::Text),
            "document-text" | "document-text-detection" => Ok(FeatureType::DocumentText),
            "landmark" | "landmark-detection" => Ok(FeatureType::Landmark),
            "face" | "face-detection" => Ok(FeatureType::Face),
            other => Err(format!("Unsupported feature type: {}", other)),
        }
    }
}

/// One image plus the feature to run on it. Lives for a single provider call.
#[derive(Clone, Debug)]
pub struct AnnotationRequest {
    pub image: Vec<u8>,
    pub feature: FeatureType,
}

impl AnnotationRequest {
    pub fn new(image: Vec<u8>, feature: FeatureType) -> Self {
        Self { image, feature }
    }
}
