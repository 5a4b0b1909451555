use std::io::Cursor;

use image::{imageops, DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use thiserror::Error;

use crate::error::StudioError;
use crate::models::{Fit, ImageMime, NormalizedImage};

pub const TARGET_WIDTH: u32 = 1080;
pub const TARGET_HEIGHT: u32 = 1920;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("image input is empty")]
    EmptyInput,

    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("failed to encode image: {0}")]
    Encode(String),
}

impl From<ImageError> for StudioError {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::EmptyInput => StudioError::EmptyInputError("image input is empty".into()),
            ImageError::Decode(msg) => StudioError::ImageDecodeError(msg),
            ImageError::Encode(msg) => StudioError::InternalError(msg),
        }
    }
}

/// Resize arbitrary image bytes onto the 1080x1920 vertical canvas.
///
/// Cover center-crops to fill the frame edge-to-edge; contain preserves the
/// full content and pads the remainder (transparent for PNG, white once
/// flattened to JPEG). PNG sources keep their encoding, everything else is
/// re-encoded as sRGB JPEG. Callers that can tolerate a failed normalization
/// fall back to the original buffer; that fallback lives with the caller, not
/// here.
pub fn normalize(bytes: &[u8], fit: Fit) -> Result<NormalizedImage, ImageError> {
    if bytes.is_empty() {
        return Err(ImageError::EmptyInput);
    }

    let source_format =
        image::guess_format(bytes).map_err(|e| ImageError::Decode(e.to_string()))?;
    let img = image::load_from_memory(bytes).map_err(|e| ImageError::Decode(e.to_string()))?;

    let framed = match fit {
        Fit::Cover => img.resize_to_fill(TARGET_WIDTH, TARGET_HEIGHT, imageops::FilterType::Lanczos3),
        Fit::Contain => {
            let resized =
                img.resize(TARGET_WIDTH, TARGET_HEIGHT, imageops::FilterType::Lanczos3);
            let mut canvas =
                RgbaImage::from_pixel(TARGET_WIDTH, TARGET_HEIGHT, Rgba([255, 255, 255, 0]));
            let x = (TARGET_WIDTH - resized.width()) / 2;
            let y = (TARGET_HEIGHT - resized.height()) / 2;
            imageops::overlay(&mut canvas, &resized.to_rgba8(), x as i64, y as i64);
            DynamicImage::ImageRgba8(canvas)
        }
    };

    let keep_png = source_format == ImageFormat::Png;
    let (out, mime) = encode(&framed, keep_png)?;

    Ok(NormalizedImage {
        bytes: out,
        mime,
        width: TARGET_WIDTH,
        height: TARGET_HEIGHT,
    })
}

/// Center-crop a near-square image to 9:16, keeping the source height.
///
/// The text-to-image path needs this because the provider does not reliably
/// honor the aspect-ratio hint for pure text prompts. Returns `None` when the
/// image is not within `tolerance` pixels of square; image-conditioned
/// outputs are returned by the orchestrator as-is and never pass through
/// here.
pub fn vertical_crop_if_square(
    bytes: &[u8],
    tolerance: u32,
) -> Result<Option<NormalizedImage>, ImageError> {
    if bytes.is_empty() {
        return Err(ImageError::EmptyInput);
    }

    let source_format =
        image::guess_format(bytes).map_err(|e| ImageError::Decode(e.to_string()))?;
    let img = image::load_from_memory(bytes).map_err(|e| ImageError::Decode(e.to_string()))?;

    let (width, height) = (img.width(), img.height());
    if width.abs_diff(height) >= tolerance {
        return Ok(None);
    }

    // Full height, width = height * 9/16, centered horizontally.
    let crop_width = ((height as f64) * 9.0 / 16.0).round() as u32;
    let crop_width = crop_width.min(width);
    let left = (width - crop_width) / 2;
    let cropped = img.crop_imm(left, 0, crop_width, height);

    let keep_png = source_format == ImageFormat::Png;
    let (out, mime) = encode(&cropped, keep_png)?;

    Ok(Some(NormalizedImage {
        bytes: out,
        mime,
        width: crop_width,
        height,
    }))
}

/// Best-effort mime sniff for buffers that bypass normalization.
pub fn sniff_mime(bytes: &[u8]) -> ImageMime {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Png) => ImageMime::Png,
        _ => ImageMime::Jpeg,
    }
}

fn encode(img: &DynamicImage, keep_png: bool) -> Result<(Vec<u8>, ImageMime), ImageError> {
    let mut buf = Vec::new();
    if keep_png {
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .map_err(|e| ImageError::Encode(e.to_string()))?;
        Ok((buf, ImageMime::Png))
    } else {
        // The JPEG encoder rejects alpha channels; flatten onto white first.
        let flattened = DynamicImage::ImageRgb8(flatten_onto_white(img));
        flattened
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Jpeg)
            .map_err(|e| ImageError::Encode(e.to_string()))?;
        Ok((buf, ImageMime::Jpeg))
    }
}

fn flatten_onto_white(img: &DynamicImage) -> RgbImage {
    let rgba = img.to_rgba8();
    let mut out = RgbImage::new(rgba.width(), rgba.height());
    for (x, y, px) in rgba.enumerate_pixels() {
        let a = px[3] as u32;
        let blend = |c: u8| ((c as u32 * a + 255 * (255 - a)) / 255) as u8;
        out.put_pixel(x, y, Rgb([blend(px[0]), blend(px[1]), blend(px[2])]));
    }
    out
}
