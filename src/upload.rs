//! Turning a pasteboard source into a named, base64-encoded upload.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use base64::{engine::general_purpose, Engine as _};
use chrono::NaiveDateTime;
use image::{DynamicImage, ImageOutputFormat, RgbaImage};
use tracing::{debug, info};

use crate::clipboard::{ClipboardImage, Source};
use crate::error::PasteError;

/// Anything that can store a file under a name, given base64 content.
pub trait ContentStore {
    fn put(&self, filename: &str, content: &str) -> Result<()>;
}

/// Bytes to upload and the extension (without dot) to name them by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub bytes: Vec<u8>,
    pub extension: Option<String>,
}

impl Payload {
    pub fn from_source(source: &Source) -> Result<Self> {
        match source {
            Source::File(path) => Self::from_file(path),
            Source::Image(image) => Self::from_image(image),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Self {
            bytes,
            extension: extension_of(path),
        })
    }

    /// Encode clipboard pixels as PNG.
    pub fn from_image(image: &ClipboardImage) -> Result<Self> {
        let invalid = || PasteError::InvalidImage {
            width: image.width,
            height: image.height,
            len: image.rgba.len(),
        };
        let width = u32::try_from(image.width).map_err(|_| invalid())?;
        let height = u32::try_from(image.height).map_err(|_| invalid())?;
        let buffer = RgbaImage::from_raw(width, height, image.rgba.clone()).ok_or_else(invalid)?;

        let mut png = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(buffer)
            .write_to(&mut png, ImageOutputFormat::Png)
            .context("Failed to encode clipboard image as PNG")?;
        Ok(Self {
            bytes: png.into_inner(),
            extension: Some("png".to_string()),
        })
    }
}

/// Last extension of `path`, without the dot. Dotfiles have none.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .filter(|ext| !ext.is_empty())
}

/// Remote name: the local timestamp to the second, plus the source extension.
pub fn remote_filename(at: NaiveDateTime, extension: Option<&str>) -> String {
    let stamp = at.format("%Y%m%d%H%M%S");
    match extension {
        Some(ext) => format!("{}.{}", stamp, ext),
        None => stamp.to_string(),
    }
}

pub fn encode_content(bytes: &[u8]) -> String {
    general_purpose::STANDARD.encode(bytes)
}

/// Upload `payload` once and return the name it was stored under.
pub fn upload(store: &dyn ContentStore, payload: &Payload, now: NaiveDateTime) -> Result<String> {
    let filename = remote_filename(now, payload.extension.as_deref());
    let content = encode_content(&payload.bytes);
    debug!(%filename, bytes = payload.bytes.len(), "encoded payload");
    store.put(&filename, &content)?;
    info!(%filename, "uploaded");
    Ok(filename)
}

/// Convenience for callers that start from a path rather than the pasteboard.
pub fn source_for_path(path: impl Into<PathBuf>) -> Source {
    Source::File(path.into())
}
