// Rendered chart handed to the HTTP layer
use bytes::Bytes;

pub const PNG_CONTENT_TYPE: &str = "image/png";

/// A fully encoded PNG; the whole buffer is readable from offset zero.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    png: Bytes,
    width: u32,
    height: u32,
}

impl RenderedImage {
    pub fn new(png: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            png: Bytes::from(png),
            width,
            height,
        }
    }

    pub fn into_bytes(self) -> Bytes {
        self.png
    }

    pub fn len(&self) -> usize {
        self.png.len()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
