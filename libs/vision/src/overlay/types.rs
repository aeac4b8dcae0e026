use image::ImageFormat;

use crate::annotate::{FaceAnnotation, Vertex};

/// Outline of one detected face, in source image pixels.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FaceDescriptor {
    pub vertices: Vec<Vertex>,
}

impl FaceDescriptor {
    pub fn new(vertices: Vec<Vertex>) -> Self {
        Self { vertices }
    }

    pub fn from_annotations(faces: &[FaceAnnotation]) -> Vec<FaceDescriptor> {
        faces.iter().map(FaceDescriptor::from).collect()
    }
}

impl From<&FaceAnnotation> for FaceDescriptor {
    // fdBoundingPoly, not boundingPoly: the tight box around the face skin.
    fn from(face: &FaceAnnotation) -> Self {
        let vertices = face.fd_bounding_poly.as_ref()
            .map(|poly| poly.vertices.clone())
            .unwrap_or_default();
        Self { vertices }
    }
}

#[derive(Clone, Debug)]
pub struct RenderedImage {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
}

impl RenderedImage {
    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }
}
