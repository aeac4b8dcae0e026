use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, BresenhamLineIter};
use imageproc::rect::Rect;
use std::io::Cursor;

use crate::annotate::Vertex;
use crate::common::{guess_image_format, VisionError, VisionResult};

use super::types::{FaceDescriptor, RenderedImage};

pub const DEFAULT_STROKE_WIDTH: u32 = 5;
pub const DEFAULT_STROKE_COLOR: [u8; 3] = [0xFF, 0xFF, 0x00];

/// Draws face outlines on a copy of an uploaded image and re-encodes it.
#[derive(Clone, Debug)]
pub struct FaceOverlayRenderer {
    pub stroke_width: u32,
    pub color: [u8; 3],
}

impl Default for FaceOverlayRenderer {
    fn default() -> Self {
        Self {
            stroke_width: DEFAULT_STROKE_WIDTH,
            color: DEFAULT_STROKE_COLOR,
        }
    }
}

impl FaceOverlayRenderer {
    pub fn new(stroke_width: u32, color: [u8; 3]) -> Self {
        Self { stroke_width, color }
    }

    pub fn render(&self, image_bytes: &[u8], faces: &[FaceDescriptor]) -> VisionResult<RenderedImage> {
        let format = output_format(image_bytes);
        let image = image::load_from_memory(image_bytes)
            .map_err(|e| VisionError::ImageDecode(e.to_string()))?;

        let mut canvas = image.to_rgba8();
        let [r, g, b] = self.color;
        for face in faces {
            draw_polygon_outline(&mut canvas, &face.vertices, self.stroke_width, Rgba([r, g, b, 0xFF]));
        }
        log::debug!(
            "Drew {} face outlines on {}x{} image",
            faces.len(),
            canvas.width(),
            canvas.height()
        );

        let bytes = encode_image(canvas, format)?;
        Ok(RenderedImage { bytes, format })
    }
}

/// Closed outline through `vertices`. Fewer than two vertices draw nothing.
pub fn draw_polygon_outline(canvas: &mut RgbaImage, vertices: &[Vertex], stroke_width: u32, color: Rgba<u8>) {
    if vertices.len() < 2 {
        return;
    }

    let stroke_width = stroke_width.clamp(1, canvas.width().max(canvas.height()).max(1));
    let half = (stroke_width / 2) as i32;
    // edges are walked only where a stamp can still touch the canvas
    let margin = i32::try_from(stroke_width).unwrap_or(i32::MAX);
    let low = -f64::from(margin);
    let high = (
        f64::from(i32::try_from(canvas.width()).unwrap_or(i32::MAX).saturating_add(margin)),
        f64::from(i32::try_from(canvas.height()).unwrap_or(i32::MAX).saturating_add(margin)),
    );

    for (index, start) in vertices.iter().enumerate() {
        let end = vertices[(index + 1) % vertices.len()];
        let from = (f64::from(start.x), f64::from(start.y));
        let to = (f64::from(end.x), f64::from(end.y));
        let Some((from, to)) = clip_segment(from, to, low, high) else {
            continue;
        };

        let line = BresenhamLineIter::new((from.0 as f32, from.1 as f32), (to.0 as f32, to.1 as f32));
        for (x, y) in line {
            // clipped to the canvas by imageproc
            draw_filled_rect_mut(canvas, Rect::at(x - half, y - half).of_size(stroke_width, stroke_width), color);
        }
    }
}

/// Liang-Barsky clip of a segment to the square `[low, high.0] x [low, high.1]`.
fn clip_segment(from: (f64, f64), to: (f64, f64), low: f64, high: (f64, f64)) -> Option<((f64, f64), (f64, f64))> {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let (mut enter, mut exit) = (0.0_f64, 1.0_f64);

    for (p, q) in [(-dx, from.0 - low), (dx, high.0 - from.0), (-dy, from.1 - low), (dy, high.1 - from.1)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            enter = enter.max(t);
        } else {
            exit = exit.min(t);
        }
        if enter > exit {
            return None;
        }
    }

    Some((
        (from.0 + enter * dx, from.1 + enter * dy),
        (from.0 + exit * dx, from.1 + exit * dy),
    ))
}

fn output_format(image_bytes: &[u8]) -> ImageFormat {
    match guess_image_format(image_bytes) {
        Some(format @ (ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::Bmp | ImageFormat::Tiff)) => format,
        _ => ImageFormat::Jpeg,
    }
}

fn encode_image(canvas: RgbaImage, format: ImageFormat) -> VisionResult<Vec<u8>> {
    let image = match format {
        // JPEG has no alpha channel
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas).to_rgb8()),
        _ => DynamicImage::ImageRgba8(canvas),
    };

    let mut buffer = Vec::new();
    image.write_to(&mut Cursor::new(&mut buffer), format)
        .map_err(|e| VisionError::ImageEncode(e.to_string()))?;
    Ok(buffer)
}
