use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::common::{bytes_to_base64, AnnotationRequest, FeatureType, VisionError, VisionResult};

use super::provider::VisionProvider;
use super::response::{
    AnnotateFileRequest, AnnotateImageRequest, BatchAnnotateFilesRequest,
    BatchAnnotateFilesResponse, BatchAnnotateImagesRequest, BatchAnnotateImagesResponse,
    Feature, ImageContent, InputConfig, Status, TextAnnotation,
};
use super::types::{AnnotationResult, VisionConfig};

/// `files:annotate` handles at most this many pages per call.
pub const PDF_PAGES_PER_REQUEST: u32 = 5;
const PDF_MIME_TYPE: &str = "application/pdf";

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: Status,
}

/// Google Cloud Vision over its REST interface, authenticated with an API key.
pub struct CloudVisionProvider {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl CloudVisionProvider {
    pub fn new(config: &VisionConfig) -> VisionResult<Self> {
        let (url, api_key, timeout) = config.unpack()?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| VisionError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.to_string(),
            api_key: api_key.to_string(),
        })
    }

    async fn call<Req, Resp>(&self, method: &str, body: &Req) -> VisionResult<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = format!("{}/v1/{}", self.url, method);
        log::debug!("Sending vision request to {}", url);

        let response = self.client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ErrorEnvelope>(&response_text) {
                Ok(envelope) => envelope.error.message,
                Err(_) => response_text,
            };
            log::error!("Vision API {} returned {}: {}", method, status, message);
            return Err(VisionError::ExternalService(format!(
                "{} returned {}: {}",
                method, status, message
            )));
        }

        serde_json::from_str::<Resp>(&response_text).map_err(|e| {
            VisionError::ExternalService(format!("Failed to parse {} response: {}", method, e))
        })
    }

    async fn annotate_pdf_pages(&self, content: &str, pages: Option<Vec<u32>>) -> VisionResult<(u32, Vec<(u32, TextAnnotation)>)> {
        let first_page = pages.as_ref().and_then(|p| p.first().copied()).unwrap_or(1);
        let body = BatchAnnotateFilesRequest {
            requests: vec![AnnotateFileRequest {
                input_config: InputConfig {
                    content: content.to_string(),
                    mime_type: PDF_MIME_TYPE.to_string(),
                },
                features: vec![Feature { feature_type: FeatureType::DocumentText }],
                pages,
            }],
        };

        let batch: BatchAnnotateFilesResponse = self.call("files:annotate", &body).await?;
        let file = batch.responses.into_iter().next()
            .ok_or_else(|| VisionError::ExternalService("files:annotate returned no response".to_string()))?;
        check_status(file.error.as_ref())?;

        let mut annotated = Vec::with_capacity(file.responses.len());
        for (offset, page) in file.responses.into_iter().enumerate() {
            check_status(page.error.as_ref())?;
            let page_number = page.context.as_ref()
                .map(|context| context.page_number)
                .filter(|number| *number > 0)
                .unwrap_or(first_page + offset as u32);
            annotated.push((page_number, page.full_text_annotation.unwrap_or_default()));
        }

        Ok((file.total_pages, annotated))
    }
}

fn check_status(status: Option<&Status>) -> VisionResult<()> {
    match status {
        Some(status) if status.code != 0 || !status.message.is_empty() => {
            Err(VisionError::ExternalService(format!(
                "Error returned from image annotation request (code {}): {}",
                status.code, status.message
            )))
        }
        _ => Ok(()),
    }
}

#[async_trait]
impl VisionProvider for CloudVisionProvider {
    async fn annotate(&self, request: &AnnotationRequest) -> VisionResult<AnnotationResult> {
        let body = BatchAnnotateImagesRequest {
            requests: vec![AnnotateImageRequest {
                image: ImageContent { content: bytes_to_base64(&request.image) },
                features: vec![Feature { feature_type: request.feature }],
            }],
        };

        let batch: BatchAnnotateImagesResponse = self.call("images:annotate", &body).await?;
        let response = batch.responses.into_iter().next()
            .ok_or_else(|| VisionError::ExternalService("images:annotate returned no response".to_string()))?;
        check_status(response.error.as_ref())?;

        let result = match request.feature {
            FeatureType::Text | FeatureType::DocumentText => {
                AnnotationResult::Text(response.full_text_annotation.unwrap_or_default())
            }
            FeatureType::Landmark => AnnotationResult::Landmarks(response.landmark_annotations),
            FeatureType::Face => AnnotationResult::Faces(response.face_annotations),
        };
        log::debug!("{} annotation returned {}", request.feature, result.kind());
        Ok(result)
    }

    async fn annotate_pdf(&self, pdf: &[u8]) -> VisionResult<Vec<TextAnnotation>> {
        let content = bytes_to_base64(pdf);

        // Without an explicit page list the API annotates the first pages and reports the total.
        let (total_pages, mut pages) = self.annotate_pdf_pages(&content, None).await?;
        let mut next_page = pages.len() as u32 + 1;

        while next_page <= total_pages {
            let last_page = (next_page + PDF_PAGES_PER_REQUEST - 1).min(total_pages);
            let (_, batch) = self.annotate_pdf_pages(&content, Some((next_page..=last_page).collect())).await?;
            if batch.is_empty() {
                return Err(VisionError::ExternalService(format!(
                    "files:annotate returned no pages for {}-{}",
                    next_page, last_page
                )));
            }
            pages.extend(batch);
            next_page = last_page + 1;
        }

        pages.sort_by_key(|(page_number, _)| *page_number);
        log::debug!("PDF annotation returned {} of {} pages", pages.len(), total_pages);
        Ok(pages.into_iter().map(|(_, annotation)| annotation).collect())
    }
}
