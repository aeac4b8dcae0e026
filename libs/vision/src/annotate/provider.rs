use async_trait::async_trait;

use crate::common::{AnnotationRequest, VisionResult};

use super::response::TextAnnotation;
use super::types::AnnotationResult;

/// Access to a remote vision annotation service.
///
/// Implementations make exactly one logical call per method: no retries, no caching.
/// Any upstream failure is reported as `VisionError::ExternalService`.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    async fn annotate(&self, request: &AnnotationRequest) -> VisionResult<AnnotationResult>;

    /// Document text detection over every page of a PDF, one annotation per page in page order.
    async fn annotate_pdf(&self, pdf: &[u8]) -> VisionResult<Vec<TextAnnotation>>;
}
