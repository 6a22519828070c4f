// SPDX-License-Identifier: MPL-2.0
//! Immutable image snapshots and their data-URL encoding.

use crate::error::{Error, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, Utc};
use iced_core::Bytes;
use image_rs::{DynamicImage, ImageFormat, ImageReader};
use std::fmt;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SNAPSHOT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of an [`ImageBuffer`].
///
/// Clones of a buffer share its id; every newly constructed buffer gets a
/// fresh one, even when the bytes are identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SnapshotId(u64);

impl SnapshotId {
    fn next() -> Self {
        Self(NEXT_SNAPSHOT_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

/// One immutable snapshot of the edited image.
///
/// Holds the encoded bytes exactly as received (upload, collaborator result
/// or crop output) plus the metadata needed to name, display and re-encode
/// it. Bytes are shared, so cloning is cheap.
#[derive(Clone)]
pub struct ImageBuffer {
    id: SnapshotId,
    bytes: Bytes,
    mime: String,
    name: String,
    created_at: DateTime<Utc>,
    format: ImageFormat,
    width: u32,
    height: u32,
}

impl ImageBuffer {
    /// Wraps encoded image bytes.
    ///
    /// The header is probed to learn the natural dimensions; bytes that are
    /// not a recognizable image are rejected. An empty `mime` is replaced by
    /// the detected format's mime type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Image`] when the format cannot be detected or the
    /// header cannot be read, or when either dimension is zero.
    pub fn new(bytes: Vec<u8>, mime: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        Self::with_timestamp(bytes, mime, name, Utc::now())
    }

    fn with_timestamp(
        bytes: Vec<u8>,
        mime: impl Into<String>,
        name: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self> {
        let reader = ImageReader::new(Cursor::new(bytes.as_slice())).with_guessed_format()?;
        let format = reader
            .format()
            .ok_or_else(|| Error::Image("unrecognized image format".into()))?;
        let (width, height) = reader.into_dimensions()?;
        if width == 0 || height == 0 {
            return Err(Error::Image("image has empty dimensions".into()));
        }

        let mime = mime.into();
        let mime = if mime.trim().is_empty() {
            format.to_mime_type().to_string()
        } else {
            mime
        };

        Ok(Self {
            id: SnapshotId::next(),
            bytes: Bytes::from(bytes),
            mime,
            name: name.into(),
            created_at,
            format,
            width,
            height,
        })
    }

    /// Reads an image file, naming the snapshot after the file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the file cannot be read and
    /// [`Error::Image`] when it is not an image.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("image")
            .to_string();
        Self::new(bytes, "", name)
    }

    /// Encodes a decoded image losslessly (PNG) into a generated snapshot.
    ///
    /// The name encodes the operation and the creation time, e.g.
    /// `cropped-1718000000000.png`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Image`] if PNG encoding fails.
    pub fn from_dynamic_png(image: &DynamicImage, operation: &str) -> Result<Self> {
        let mut encoded = Vec::new();
        image.write_to(&mut Cursor::new(&mut encoded), ImageFormat::Png)?;
        Self::generated(encoded, ImageFormat::Png.to_mime_type(), operation)
    }

    /// Wraps bytes produced by an operation under a generated name.
    ///
    /// # Errors
    ///
    /// Same as [`ImageBuffer::new`].
    pub fn generated(bytes: Vec<u8>, mime: &str, operation: &str) -> Result<Self> {
        let created_at = Utc::now();
        let name = generated_name(operation, mime, created_at);
        Self::with_timestamp(bytes, mime, name, created_at)
    }

    /// Parses a `data:<mime>;base64,<payload>` URL into a generated snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Image`] when the URL is not a base64 data URL, the
    /// payload does not decode, or the decoded bytes are not an image.
    pub fn from_data_url(url: &str, operation: &str) -> Result<Self> {
        let (mime, payload) = parse_data_url(url)?;
        let bytes = BASE64
            .decode(payload.trim())
            .map_err(|e| Error::Image(format!("invalid base64 payload: {e}")))?;
        Self::generated(bytes, mime, operation)
    }

    /// Encodes this snapshot as a base64 data URL.
    #[must_use]
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.to_base64())
    }

    /// Base64 form of the raw bytes (for inline conversation segments).
    #[must_use]
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }

    /// Decodes the pixels.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Image`] if the bytes fail to decode.
    pub fn decode(&self) -> Result<DynamicImage> {
        Ok(image_rs::load_from_memory_with_format(
            &self.bytes,
            self.format,
        )?)
    }

    #[must_use]
    pub fn id(&self) -> SnapshotId {
        self.id
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Reference-counted view of the encoded bytes; no copy is made.
    #[must_use]
    pub fn shared_bytes(&self) -> Bytes {
        self.bytes.clone()
    }

    #[must_use]
    pub fn mime(&self) -> &str {
        &self.mime
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Natural (intrinsic) width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Natural (intrinsic) height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Natural size as `(width, height)`.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl PartialEq for ImageBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ImageBuffer {}

impl fmt::Debug for ImageBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageBuffer")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("len", &self.bytes.len())
            .finish_non_exhaustive()
    }
}

fn generated_name(operation: &str, mime: &str, at: DateTime<Utc>) -> String {
    let extension = ImageFormat::from_mime_type(mime)
        .and_then(|format| format.extensions_str().first().copied())
        .unwrap_or("img");
    format!("{operation}-{}.{extension}", at.timestamp_millis())
}

fn parse_data_url(url: &str) -> Result<(&str, &str)> {
    let rest = url
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| Error::Image("result is not a data URL".into()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::Image("data URL has no payload".into()))?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| Error::Image("data URL is not base64-encoded".into()))?;
    if !mime.starts_with("image/") {
        return Err(Error::Image(format!("unexpected mime type '{mime}'")));
    }
    Ok((mime, payload))
}
