use crate::config::{http_client, ImageConfig};
use base64::Engine;
use bytes::Bytes;
use image::{DynamicImage, ImageFormat};
use reqwest::Client;
use serde::Serialize;
use std::io::Cursor;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("HTTP error: {0}")] Http(String),
    #[error("Image decode error: {0}")] Decode(#[from] image::ImageError),
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ImageInfo {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub format: Option<String>,
}

#[derive(Debug, Serialize, Clone)]
pub struct ProcessedImage {
    pub info: ImageInfo,
    pub data_uri: String,
}

pub struct ImageFetcher {
    client: Client,
    max_edge: u32,
}

impl ImageFetcher {
    pub fn new(config: &ImageConfig) -> Self {
        let client = http_client(config.timeout, "image");
        Self { client, max_edge: config.max_edge }
    }

    async fn download(&self, url: &str) -> Result<Bytes, ImageError> {
        let response = self.client
            .get(url)
            .send()
            .await
            .map_err(|e| ImageError::Http(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ImageError::Http(format!("status={}", status)));
        }
        response.bytes().await.map_err(|e| ImageError::Http(e.to_string()))
    }

    /// Downloaded image, converted to RGB and shrunk to fit, plus the source format.
    async fn load(&self, url: &str) -> Result<(DynamicImage, Option<ImageFormat>), ImageError> {
        let bytes = self.download(url).await?;
        let format = image::guess_format(&bytes).ok();
        let img = shrink_to_fit(to_rgb(image::load_from_memory(&bytes)?), self.max_edge);
        Ok((img, format))
    }

    pub async fn download_image(&self, url: &str) -> Result<DynamicImage, ImageError> {
        self.load(url).await.map(|(img, _)| img)
    }

    pub async fn image_info(&self, url: &str) -> Result<ImageInfo, ImageError> {
        let (img, format) = self.load(url).await?;
        Ok(describe(url, &img, format))
    }

    /// Downloads, normalises and re-encodes a product image as a JPEG data URI.
    pub async fn fetch(&self, url: &str) -> Result<ProcessedImage, ImageError> {
        let result = self.load(url).await.and_then(|(img, format)| {
            let data_uri = to_data_uri(&img)?;
            Ok(ProcessedImage { info: describe(url, &img, format), data_uri })
        });
        match &result {
            Ok(p) => info!("🖼️ Processed image {} ({}x{})", url, p.info.width, p.info.height),
            Err(e) => error!("❌ Error processing image from {}: {}", url, e),
        }
        result
    }
}

fn describe(url: &str, img: &DynamicImage, format: Option<ImageFormat>) -> ImageInfo {
    ImageInfo {
        url: url.to_string(),
        width: img.width(),
        height: img.height(),
        format: format.map(|f| format!("{:?}", f).to_uppercase()),
    }
}

fn to_rgb(img: DynamicImage) -> DynamicImage {
    match img {
        DynamicImage::ImageRgb8(_) => img,
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    }
}

/// Shrinks to fit inside `max_edge`×`max_edge`, keeping aspect ratio. Never upscales.
fn shrink_to_fit(img: DynamicImage, max_edge: u32) -> DynamicImage {
    if img.width() > max_edge || img.height() > max_edge {
        img.thumbnail(max_edge, max_edge)
    } else {
        img
    }
}

pub fn to_data_uri(img: &DynamicImage) -> Result<String, ImageError> {
    let mut buf = Cursor::new(Vec::new());
    to_rgb(img.clone()).write_to(&mut buf, ImageFormat::Jpeg)?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(buf.into_inner());
    Ok(format!("data:image/jpeg;base64,{}", encoded))
}
