use std::path::Path;

use bytes::Bytes;

use crate::error::{Error, Result};

/// A file attached to an outgoing chat request.
///
/// Attachments switch the transport encoding of a send to multipart form
/// data but do not change its semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// File name presented to the bridge.
    pub file_name: String,

    /// File contents.
    pub content: Bytes,

    /// MIME type, when known.
    pub content_type: Option<String>,
}

impl Attachment {
    /// Creates an attachment from in-memory contents.
    pub fn new(file_name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
            content_type: None,
        }
    }

    /// Sets the MIME type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Reads an attachment from disk, naming it after the file.
    pub async fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                Error::validation(
                    format!("attachment path has no usable file name: {}", path.display()),
                    Some("path".to_string()),
                )
            })?
            .to_string();
        let content = tokio::fs::read(path)
            .await
            .map_err(|err| Error::io(format!("failed to read {}", path.display()), err))?;
        Ok(Self {
            file_name,
            content: Bytes::from(content),
            content_type: None,
        })
    }
}
