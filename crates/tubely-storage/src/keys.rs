//! Shared key generation for storage backends.
//!
//! Video key format: `{aspect}/{token}.{extension}`. Thumbnail filenames are
//! `{token}.{extension}` with a URL-safe base64 token. Tokens come from the OS
//! random source; nothing in a key is taken from client input except the
//! validated media type, and only through its canonical extension.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::TryRngCore;
use std::fmt::{Display, Formatter, Result as FmtResult};
use tubely_core::AspectClass;

use crate::traits::{StorageError, StorageResult};

const VIDEO_TOKEN_BYTES: usize = 16;
const THUMBNAIL_TOKEN_BYTES: usize = 32;

/// A derived storage key. Generated once per successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKey {
    prefix: Option<&'static str>,
    token: String,
    extension: &'static str,
}

impl StorageKey {
    /// Key for a video: `{aspect}/{32 hex chars}.{extension}`.
    pub fn for_video(aspect: AspectClass, extension: &'static str) -> StorageResult<Self> {
        let bytes = random_bytes::<VIDEO_TOKEN_BYTES>()?;
        Ok(Self {
            prefix: Some(aspect.prefix()),
            token: hex::encode(bytes),
            extension,
        })
    }

    /// Key for a thumbnail file: `{43 url-safe base64 chars}.{extension}`.
    pub fn for_thumbnail(extension: &'static str) -> StorageResult<Self> {
        let bytes = random_bytes::<THUMBNAIL_TOKEN_BYTES>()?;
        Ok(Self {
            prefix: None,
            token: URL_SAFE_NO_PAD.encode(bytes),
            extension,
        })
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn extension(&self) -> &str {
        self.extension
    }

    /// Final path component, `{token}.{extension}`.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.token, self.extension)
    }
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self.prefix {
            Some(prefix) => write!(f, "{}/{}.{}", prefix, self.token, self.extension),
            None => write!(f, "{}.{}", self.token, self.extension),
        }
    }
}

fn random_bytes<const N: usize>() -> StorageResult<[u8; N]> {
    let mut buf = [0u8; N];
    OsRng
        .try_fill_bytes(&mut buf)
        .map_err(|e| StorageError::KeyGeneration(e.to_string()))?;
    Ok(buf)
}
