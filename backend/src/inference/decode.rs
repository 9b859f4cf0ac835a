use image::RgbImage;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("upload is empty")]
    Empty,
    #[error("not a supported image: {0}")]
    Format(#[from] image::ImageError),
}

/// Decodes an uploaded container (PNG, JPEG, ...) and normalises it to RGB.
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }
    let image = image::load_from_memory(bytes)?;
    Ok(image.into_rgb8())
}
