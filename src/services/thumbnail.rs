// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Album art thumbnail pipeline.
//!
//! fetch -> decode (format sniffed) -> center crop to target aspect ->
//! Catmull-Rom resample to exact size -> uncompressed 24-bit BMP.

use crate::config::MAX_THUMBNAIL_DIMENSION;
use crate::error::AppError;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;

/// Region of the source image kept before resampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Center crop of a `src_width x src_height` image to the aspect ratio of
/// `width x height`.
///
/// A source taller than the target keeps its full width and loses rows top
/// and bottom; a wider one keeps its full height and loses columns left and
/// right. For odd remainders the far edge loses the extra pixel.
pub fn aspect_crop(src_width: u32, src_height: u32, width: u32, height: u32) -> CropRect {
    let full = CropRect {
        x: 0,
        y: 0,
        width: src_width,
        height: src_height,
    };
    if width == 0 || height == 0 || src_width == 0 || src_height == 0 {
        return full;
    }

    // Compare src_w/src_h against w/h without floating point
    let source_cross = u64::from(src_width) * u64::from(height);
    let target_cross = u64::from(width) * u64::from(src_height);

    if source_cross < target_cross {
        let crop_height = (source_cross / u64::from(width)).clamp(1, u64::from(src_height)) as u32;
        CropRect {
            y: (src_height - crop_height) / 2,
            height: crop_height,
            ..full
        }
    } else if source_cross > target_cross {
        let crop_width = (target_cross / u64::from(height)).clamp(1, u64::from(src_width)) as u32;
        CropRect {
            x: (src_width - crop_width) / 2,
            width: crop_width,
            ..full
        }
    } else {
        full
    }
}

/// Check thumbnail query dimensions: both present and in `1..=320`.
pub fn validate_dimensions(width: Option<i64>, height: Option<i64>) -> Result<(u32, u32), AppError> {
    let (width, height) = match (width, height) {
        (Some(w), Some(h)) => (w, h),
        _ => {
            return Err(AppError::BadRequest(
                "thumbnailWidth and thumbnailHeight are required".to_string(),
            ))
        }
    };

    if width <= 0 || height <= 0 {
        return Err(AppError::BadRequest(
            "thumbnailWidth and thumbnailHeight must be greater than 0".to_string(),
        ));
    }

    let max = i64::from(MAX_THUMBNAIL_DIMENSION);
    if width > max || height > max {
        return Err(AppError::BadRequest(format!(
            "thumbnailWidth and thumbnailHeight must be at most {}",
            MAX_THUMBNAIL_DIMENSION
        )));
    }

    Ok((width as u32, height as u32))
}

/// Decode an image, detecting the format from its content.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, AppError> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| AppError::Image(format!("Unable to determine image format: {}", e)))?
        .decode()
        .map_err(|e| AppError::Image(format!("Failed to decode image: {}", e)))
}

/// Crop, resample and BMP-encode `image` at exactly `width x height`.
pub fn to_bitmap(image: &DynamicImage, width: u32, height: u32) -> Result<Vec<u8>, AppError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(AppError::Image("Source image is empty".to_string()));
    }

    let crop = aspect_crop(image.width(), image.height(), width, height);
    let resized = image
        .crop_imm(crop.x, crop.y, crop.width, crop.height)
        .resize_exact(width, height, FilterType::CatmullRom);

    // Drop alpha: the device gets opaque source pixels, no backdrop blending
    let opaque = DynamicImage::ImageRgb8(resized.to_rgb8());

    let mut bytes = Vec::new();
    opaque
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Bmp)
        .map_err(|e| AppError::Image(format!("BMP encode failed: {}", e)))?;
    Ok(bytes)
}

/// Fetches album art and renders device thumbnails.
#[derive(Clone)]
pub struct ThumbnailPipeline {
    http: reqwest::Client,
}

impl ThumbnailPipeline {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Fetch `source_url` and render it as a `width x height` BMP.
    ///
    /// Dimensions are expected to have passed [`validate_dimensions`].
    pub async fn render_thumbnail(
        &self,
        source_url: &str,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, AppError> {
        let response = self
            .http
            .get(source_url)
            .send()
            .await
            .map_err(|e| AppError::Network(format!("Album art fetch failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Provider(format!(
                "Album art host returned status {}",
                response.status()
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.starts_with("image/") {
            return Err(AppError::NotAnImage(format!(
                "content type {:?}",
                content_type
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::Network(format!("Album art read failed: {}", e)))?;

        tracing::debug!(
            source_url,
            bytes = body.len(),
            width,
            height,
            "Rendering album art thumbnail"
        );

        // Decode and resample are CPU bound
        tokio::task::spawn_blocking(move || {
            let image = decode_image(&body)?;
            to_bitmap(&image, width, height)
        })
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Thumbnail task failed: {}", e)))?
    }
}
