use serde::{Deserialize, Serialize};

/// Output encoding of a normalized buffer. PNG sources stay PNG, everything
/// else becomes sRGB JPEG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageMime {
    #[serde(rename = "image/jpeg")]
    Jpeg,
    #[serde(rename = "image/png")]
    Png,
}

impl ImageMime {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageMime::Jpeg => "image/jpeg",
            ImageMime::Png => "image/png",
        }
    }
}

/// Fit policy for normalization: cover center-crops to fill the target
/// exactly, contain scales to fit and pads the remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fit {
    Cover,
    Contain,
}

/// An image buffer brought onto a vertical 9:16 canvas. Normalization always
/// produces 1080x1920; the forced crop of near-square outputs keeps the
/// source height.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    pub bytes: Vec<u8>,
    pub mime: ImageMime,
    pub width: u32,
    pub height: u32,
}

impl NormalizedImage {
    pub fn to_base64(&self) -> String {
        use base64::Engine as _;
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }
}
