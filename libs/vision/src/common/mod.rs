mod error;
mod types;
mod utils;

pub use error::{VisionError, VisionResult};
pub use types::{AnnotationRequest, FeatureType};
pub use utils::{bytes_to_base64, guess_image_format};
