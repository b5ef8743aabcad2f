use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::RgbImage;

use crate::AcquireError;

/// URI scheme marker for inline image data.
pub const DATA_URI_SCHEME: &str = "data:";

/// True when `reference` carries its bytes inline (`data:` URI).
pub fn is_data_uri(reference: &str) -> bool {
    reference
        .get(..DATA_URI_SCHEME.len())
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case(DATA_URI_SCHEME))
}

/// Decode base64 image data, with or without a `data:<mime>;base64,` prefix.
///
/// Everything up to the last comma is treated as the URI header. ASCII
/// whitespace inside the payload is ignored.
pub fn decode_inline(data: &str) -> Result<RgbImage, AcquireError> {
    let payload = match data.rfind(',') {
        Some(idx) => &data[idx + 1..],
        None => data,
    };
    let compact: Vec<u8> = payload
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    if compact.is_empty() {
        return Err(AcquireError::Decode("empty image payload".into()));
    }
    let bytes = STANDARD
        .decode(&compact)
        .map_err(|e| AcquireError::Decode(format!("invalid base64: {e}")))?;
    decode_bytes(&bytes)
}

/// Decode encoded image bytes and normalize them to 8-bit RGB.
///
/// Alpha is dropped and palette/grayscale images are expanded, so every
/// successful path yields the same 3-channel layout.
pub fn decode_bytes(bytes: &[u8]) -> Result<RgbImage, AcquireError> {
    if bytes.is_empty() {
        return Err(AcquireError::Decode("empty image payload".into()));
    }
    let image = image::load_from_memory(bytes)
        .map_err(|e| AcquireError::Decode(format!("unsupported or corrupt image: {e}")))?;
    Ok(image.to_rgb8())
}
