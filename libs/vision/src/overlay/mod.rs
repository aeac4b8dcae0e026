mod types;
mod utils;

pub use types::{FaceDescriptor, RenderedImage};
pub use utils::{
    draw_polygon_outline, FaceOverlayRenderer, DEFAULT_STROKE_COLOR, DEFAULT_STROKE_WIDTH,
};
