// src/services/image_codec.rs
use crate::errors::StudioError;
use crate::models::ImageValue;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::{DynamicImage, GenericImageView, ImageFormat};
use log::debug;

/// Uploads with either side above this are refused outright.
pub const MAX_ACCEPTED_DIM: u32 = 8192;

pub struct ImageCodec {
    max_dim: u32,
}

impl ImageCodec {
    pub fn new(max_dim: u32) -> Self {
        Self { max_dim }
    }

    /// Validates raw upload bytes and turns them into an embeddable image.
    pub fn encode_upload(
        &self,
        data: &[u8],
        declared_mime: Option<&str>,
        filename: &str,
    ) -> Result<ImageValue, StudioError> {
        let img = self.validate_image(data)?;
        let (width, height) = img.dimensions();

        if width > self.max_dim || height > self.max_dim {
            let resized = self.downscale(&img)?;
            debug!(
                "Downscaled {} from {}x{} to fit {}",
                filename, width, height, self.max_dim
            );
            return Ok(ImageValue::new(
                STANDARD.encode(resized),
                "image/png",
                filename,
            ));
        }

        let mime_type = match declared_mime.map(str::trim) {
            Some(mime) if !is_generic(mime) => mime.to_string(),
            _ => sniff_mime(data)?.to_string(),
        };
        Ok(ImageValue::new(STANDARD.encode(data), mime_type, filename))
    }

    /// Decodes base64 payload bytes, e.g. for a mask coming in as a data URL.
    pub fn decode(&self, image: &ImageValue) -> Result<Vec<u8>, StudioError> {
        STANDARD
            .decode(image.payload())
            .map_err(|e| StudioError::ImageProcessing(format!("Invalid base64 payload: {}", e)))
    }

    /// Checks that an already-encoded value (mask, reference) holds a real image.
    pub fn check(&self, image: &ImageValue) -> Result<(u32, u32), StudioError> {
        let bytes = self.decode(image)?;
        Ok(self.validate_image(&bytes)?.dimensions())
    }

    fn validate_image(&self, data: &[u8]) -> Result<DynamicImage, StudioError> {
        let img = image::load_from_memory(data)
            .map_err(|e| StudioError::ImageProcessing(format!("Invalid image format: {}", e)))?;

        let (width, height) = img.dimensions();
        if width > MAX_ACCEPTED_DIM || height > MAX_ACCEPTED_DIM {
            return Err(StudioError::ImageProcessing(format!(
                "Image dimensions exceed {}x{}",
                MAX_ACCEPTED_DIM, MAX_ACCEPTED_DIM
            )));
        }

        Ok(img)
    }

    fn downscale(&self, img: &DynamicImage) -> Result<Vec<u8>, StudioError> {
        let (width, height) = img.dimensions();
        let ratio = (self.max_dim as f32 / width.max(height) as f32).min(1.0);
        let new_width = ((width as f32 * ratio) as u32).max(1);
        let new_height = ((height as f32 * ratio) as u32).max(1);

        let resized = img.resize(new_width, new_height, image::imageops::FilterType::Lanczos3);

        let mut output = Vec::new();
        resized
            .write_to(&mut std::io::Cursor::new(&mut output), ImageFormat::Png)
            .map_err(|e| {
                StudioError::ImageProcessing(format!("Failed to encode resized image: {}", e))
            })?;

        Ok(output)
    }
}

fn is_generic(mime: &str) -> bool {
    mime.is_empty() || mime == "application/octet-stream" || !mime.starts_with("image/")
}

fn sniff_mime(data: &[u8]) -> Result<&'static str, StudioError> {
    let format = image::guess_format(data)
        .map_err(|e| StudioError::ImageProcessing(format!("Unknown image format: {}", e)))?;
    Ok(match format {
        ImageFormat::Png => "image/png",
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::Gif => "image/gif",
        ImageFormat::WebP => "image/webp",
        ImageFormat::Bmp => "image/bmp",
        ImageFormat::Tiff => "image/tiff",
        _ => "application/octet-stream",
    })
}
