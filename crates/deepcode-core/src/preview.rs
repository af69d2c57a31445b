//! File preview classification and content decoding

use crate::registry::extension;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "svg"];
const PREVIEW_TEXT_EXTENSIONS: &[&str] = &[
    "txt", "md", "json", "xml", "html", "css", "js", "ts", "java", "yml", "yaml", "log",
];

/// Errors decoding fetched file content
#[derive(Debug, Error)]
pub enum PreviewError {
    /// The response carried no content
    #[error("This file has no base64 content in the response.")]
    MissingContent,

    /// Content present but not base64 encoded
    #[error("unsupported content encoding: {0}")]
    UnsupportedEncoding(String),

    /// Content claimed base64 but did not decode
    #[error("invalid base64 content: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// How a file is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewKind {
    /// UTF-8 text
    Text,
    /// PDF document
    Pdf,
    /// Raster or vector image
    Image,
    /// Nothing displayable
    Unknown,
}

/// A decoded preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    /// Title, the node path
    pub title: String,
    /// Display kind
    pub kind: PreviewKind,
    /// Decoded text for [`PreviewKind::Text`]
    pub text: Option<String>,
    /// Raw bytes for PDFs and images
    pub bytes: Option<Vec<u8>>,
    /// MIME type for PDFs and images
    pub mime: Option<String>,
    /// Message for [`PreviewKind::Unknown`]
    pub error: Option<String>,
}

impl Preview {
    /// A preview that only carries a message
    pub fn unknown(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: path.into(),
            kind: PreviewKind::Unknown,
            text: None,
            bytes: None,
            mime: None,
            error: Some(message.into()),
        }
    }

    fn text(path: &str, text: String) -> Self {
        Self {
            title: path.to_string(),
            kind: PreviewKind::Text,
            text: Some(text),
            bytes: None,
            mime: None,
            error: None,
        }
    }

    fn binary(path: &str, kind: PreviewKind, mime: String, bytes: Vec<u8>) -> Self {
        Self {
            title: path.to_string(),
            kind,
            text: None,
            bytes: Some(bytes),
            mime: Some(mime),
            error: None,
        }
    }
}

/// Decode GitHub file content. `encoding` must be `base64`; whitespace in
/// the payload (GitHub wraps lines) is ignored.
pub fn decode_base64_content(
    content: Option<&str>,
    encoding: Option<&str>,
) -> Result<Vec<u8>, PreviewError> {
    let content = content
        .filter(|c| !c.is_empty())
        .ok_or(PreviewError::MissingContent)?;
    match encoding {
        Some("base64") => {}
        Some(other) => return Err(PreviewError::UnsupportedEncoding(other.to_string())),
        None => return Err(PreviewError::MissingContent),
    }
    let clean: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    Ok(STANDARD.decode(clean)?)
}

/// MIME type of an image extension
pub fn image_mime(ext: &str) -> String {
    match ext {
        "svg" => "image/svg+xml".to_string(),
        "jpg" => "image/jpeg".to_string(),
        other => format!("image/{}", other),
    }
}

/// Classify `bytes` by the extension of `path`.
///
/// Unknown extensions are shown as text when they decode as UTF-8.
pub fn preview_from_bytes(path: &str, bytes: Vec<u8>) -> Preview {
    let ext = extension(path).unwrap_or_default();

    if ext == "pdf" {
        return Preview::binary(path, PreviewKind::Pdf, "application/pdf".into(), bytes);
    }
    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        return Preview::binary(path, PreviewKind::Image, image_mime(&ext), bytes);
    }
    if PREVIEW_TEXT_EXTENSIONS.contains(&ext.as_str()) {
        return Preview::text(path, String::from_utf8_lossy(&bytes).into_owned());
    }

    match String::from_utf8(bytes) {
        Ok(text) if text.is_empty() => {
            Preview::text(path, "Preview not supported for this type.".into())
        }
        Ok(text) => Preview::text(path, text),
        Err(_) => Preview::unknown(path, "Preview not supported for this file type."),
    }
}
