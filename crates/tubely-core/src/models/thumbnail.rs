use bytes::Bytes;

/// Thumbnail payload: the raw image bytes plus their validated media type.
///
/// Entries are immutable once written, so clones out of the in-memory cache
/// only bump a reference count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub data: Bytes,
    pub media_type: String,
}

impl Thumbnail {
    pub fn new(data: impl Into<Bytes>, media_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            media_type: media_type.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
