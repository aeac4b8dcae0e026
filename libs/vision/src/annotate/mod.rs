mod provider;
mod response;
mod types;
mod vision_api_call;

pub use provider::VisionProvider;
pub use response::{
    AnnotateFileResponse, AnnotateImageResponse, Block, BoundingPoly, EntityAnnotation,
    FaceAnnotation, ImageAnnotationContext, LatLng, LocationInfo, Page, Paragraph, Status,
    Symbol, TextAnnotation, Vertex, Word,
};
pub use types::{AnnotationResult, VisionConfig, DEFAULT_VISION_URL};
pub use vision_api_call::{CloudVisionProvider, PDF_PAGES_PER_REQUEST};
