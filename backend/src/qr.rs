//! Renders scan URLs as QR code images embedded in `data:` URLs.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::Luma;
use png::{BitDepth as PngBitDepth, ColorType as PngColorType, Encoder as PngEncoder};
use qrcode::QrCode;

const MIN_DIMENSION: u32 = 256;
const DATA_URL_PREFIX: &str = "data:image/png;base64,";

#[derive(Debug, thiserror::Error)]
pub enum QrError {
    #[error("payload cannot be encoded: {0}")]
    Encode(String),
    #[error("PNG encoding failed: {0}")]
    Png(#[from] png::EncodingError),
}

/// Encodes `text` as a QR code and returns it as a base64 PNG `data:` URL.
///
/// The output depends only on `text`.
pub fn data_url(text: &str) -> Result<String, QrError> {
    let png = render_png(text)?;
    Ok(format!("{DATA_URL_PREFIX}{}", BASE64.encode(png)))
}

fn render_png(text: &str) -> Result<Vec<u8>, QrError> {
    let code = QrCode::new(text.as_bytes()).map_err(|e| QrError::Encode(e.to_string()))?;
    let image = code
        .render::<Luma<u8>>()
        .min_dimensions(MIN_DIMENSION, MIN_DIMENSION)
        .build();
    let (width, height) = image.dimensions();

    let mut bytes = Vec::new();
    {
        let mut encoder = PngEncoder::new(&mut bytes, width, height);
        encoder.set_color(PngColorType::Grayscale);
        encoder.set_depth(PngBitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(image.as_raw())?;
        writer.finish()?;
    }
    Ok(bytes)
}
