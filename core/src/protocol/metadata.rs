//! File metadata exchanged ahead of the chunk stream

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Describes the file being transferred. Serialized as UTF-8 JSON inside a
/// length-prefixed frame, sent by the sender immediately after SAS
/// verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Basename of the source file; never contains path components
    pub name: String,
    /// File size in bytes
    pub size: u64,
}

impl FileMetadata {
    /// Build metadata for a local file, stripping any directory components.
    pub async fn for_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::InvalidInput(format!("unusable file name: {}", path.display())))?
            .to_string();

        let meta = tokio::fs::metadata(path).await?;
        Ok(Self {
            name,
            size: meta.len(),
        })
    }

    /// Reject names a malicious sender could use to escape the receiver's
    /// working directory.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty()
            || self.name == ".."
            || self.name.contains('/')
            || self.name.contains('\\')
        {
            return Err(Error::Protocol(format!(
                "unsafe file name in metadata: {:?}",
                self.name
            )));
        }
        Ok(())
    }
}
