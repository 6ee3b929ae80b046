//! String codec for bitmap label payloads.

use std::io::{Read, Write};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use thiserror::Error;

use crate::mask::Mask;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("base64 decode failed: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("zlib stream error: {0}")]
    Zlib(#[from] std::io::Error),
    #[error("png error: {0}")]
    Png(#[from] image::ImageError),
    #[error("cannot encode a mask with zero dimensions")]
    EmptyMask,
}

/// Decode a stored payload into a binary mask.
pub fn decode(payload: &str) -> Result<Mask, CodecError> {
    let compressed = BASE64.decode(payload.trim())?;
    let mut png = Vec::new();
    ZlibDecoder::new(compressed.as_slice()).read_to_end(&mut png)?;
    let gray = image::load_from_memory(&png)?.to_luma8();
    Ok(Mask::from_raw(
        gray.width() as usize,
        gray.height() as usize,
        gray.as_raw(),
    ))
}

/// Encode a binary mask into the stored payload representation.
///
/// Fixed PNG settings and compression level keep the output stable for
/// a given mask.
pub fn encode(mask: &Mask) -> Result<String, CodecError> {
    if mask.width() == 0 || mask.height() == 0 {
        return Err(CodecError::EmptyMask);
    }
    let mut png = Vec::new();
    PngEncoder::new(&mut png).write_image(
        &mask.luma_bytes(),
        mask.width() as u32,
        mask.height() as u32,
        ExtendedColorType::L8,
    )?;
    let mut deflater = ZlibEncoder::new(Vec::new(), Compression::default());
    deflater.write_all(&png)?;
    let compressed = deflater.finish()?;
    Ok(BASE64.encode(compressed))
}
