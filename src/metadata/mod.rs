//! Embedded metadata model
//!
//! A [`MetadataHandle`] is the decoded form of a file's metadata container:
//! an ordered mapping from canonical keys (`Exif.Image.Make`) to tag entries,
//! plus the raw container bytes. Handles are produced by a [`MetadataCodec`]
//! and cached per file by the [`accessor`].
//!
//! # Examples
//!
//! ```
//! use mfind_exif::metadata::MetadataHandle;
//!
//! let handle = MetadataHandle::new(b"raw".to_vec())
//!     .with_tag("Exif.Image.Make", "Canon", "Canon");
//!
//! assert_eq!(handle.get("Exif.Image.Make").map(|t| t.value.as_str()), Some("Canon"));
//! assert_eq!(handle.buffer(), b"raw");
//! ```

pub mod accessor;
pub mod codec;
pub mod error;

pub use accessor::{MetadataSource, get_metadata};
pub use codec::ExifCodec;
pub use error::CodecError;

use std::collections::HashMap;
use std::path::Path;

/// One tag of a decoded container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEntry {
    /// Interpreted value, used for matching
    pub value: String,
    /// Raw string form, used for printing
    pub raw_value: String,
}

impl TagEntry {
    #[must_use]
    pub fn new(value: impl Into<String>, raw_value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            raw_value: raw_value.into(),
        }
    }
}

/// Decoded metadata of a single file
///
/// Keys keep the order in which the codec produced them. The handle is never
/// mutated once it has been cached in a [`Context`](crate::Context).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataHandle {
    keys: Vec<String>,
    tags: HashMap<String, TagEntry>,
    buffer: Vec<u8>,
}

impl MetadataHandle {
    /// Empty handle over the given raw container bytes
    #[must_use]
    pub fn new(buffer: Vec<u8>) -> Self {
        Self {
            keys: Vec::new(),
            tags: HashMap::new(),
            buffer,
        }
    }

    /// Builder form of [`insert`](Self::insert)
    #[must_use]
    pub fn with_tag(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
        raw_value: impl Into<String>,
    ) -> Self {
        self.insert(key, TagEntry::new(value, raw_value));
        self
    }

    /// Add a tag. The first entry for a key wins; returns `false` for duplicates.
    pub fn insert(&mut self, key: impl Into<String>, entry: TagEntry) -> bool {
        let key = key.into();
        if self.tags.contains_key(&key) {
            return false;
        }
        self.keys.push(key.clone());
        self.tags.insert(key, entry);
        true
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TagEntry> {
        self.tags.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.tags.contains_key(key)
    }

    /// All keys in codec order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// All `(key, entry)` pairs in codec order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &TagEntry)> {
        self.keys
            .iter()
            .filter_map(|k| self.tags.get(k).map(|entry| (k.as_str(), entry)))
    }

    /// Raw container bytes
    #[must_use]
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Decoder turning a file into a [`MetadataHandle`]
///
/// Shared by every test and action of a registry, hence `Send + Sync`.
pub trait MetadataCodec: Send + Sync {
    /// Open `path` and decode its metadata container
    ///
    /// # Errors
    /// * `CodecError::Read` if the file cannot be read.
    /// * `CodecError::Decode` if the container is missing, malformed or unsupported.
    fn open_and_decode(&self, path: &Path) -> Result<MetadataHandle, CodecError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_keep_insertion_order() {
        let handle = MetadataHandle::default()
            .with_tag("Exif.Image.Model", "EOS 5D", "EOS 5D")
            .with_tag("Exif.Image.Make", "Canon", "Canon")
            .with_tag("Exif.Photo.FNumber", "f/2.8", "28/10");

        let keys: Vec<&str> = handle.keys().collect();
        assert_eq!(
            keys,
            vec!["Exif.Image.Model", "Exif.Image.Make", "Exif.Photo.FNumber"]
        );
        assert_eq!(handle.len(), 3);
    }

    #[test]
    fn test_duplicate_key_keeps_first() {
        let mut handle = MetadataHandle::default().with_tag("Exif.Image.Make", "Canon", "Canon");
        let inserted = handle.insert("Exif.Image.Make", TagEntry::new("Nikon", "Nikon"));

        assert!(!inserted);
        assert_eq!(handle.len(), 1);
        assert_eq!(handle.get("Exif.Image.Make").unwrap().value, "Canon");
    }

    #[test]
    fn test_entries_pair_keys_with_values() {
        let handle = MetadataHandle::default()
            .with_tag("Exif.Image.XResolution", "72", "72/1")
            .with_tag("Exif.Image.Make", "Canon", "Canon");

        let entries: Vec<(&str, &str)> = handle
            .entries()
            .map(|(k, e)| (k, e.raw_value.as_str()))
            .collect();
        assert_eq!(
            entries,
            vec![("Exif.Image.XResolution", "72/1"), ("Exif.Image.Make", "Canon")]
        );
    }

    #[test]
    fn test_empty_handle() {
        let handle = MetadataHandle::new(Vec::new());
        assert!(handle.is_empty());
        assert!(handle.get("Exif.Image.Make").is_none());
        assert!(!handle.contains_key("Exif.Image.Make"));
        assert!(handle.buffer().is_empty());
    }
}
