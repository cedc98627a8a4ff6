//! Testing utilities for mfind-exif
//!
//! Provides a counting stub codec, a sample metadata handle and a writer for
//! minimal little-endian TIFF files that the real codec can decode.
//!
//! Only available when compiled with `cfg(test)`.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::aliases::AliasTable;
use crate::metadata::{CodecError, MetadataCodec, MetadataHandle, MetadataSource};

pub const TAG_MAKE: u16 = 0x010f;
pub const TAG_MODEL: u16 = 0x0110;
pub const TAG_SOFTWARE: u16 = 0x0131;

/// Codec returning a fixed handle (or failing) and counting its invocations
///
/// Clones share the counters, so a clone can be moved into a
/// [`MetadataSource`] while the test keeps inspecting the original.
#[derive(Debug, Clone)]
pub struct StubCodec {
    handle: Option<MetadataHandle>,
    calls: Arc<AtomicUsize>,
    paths: Arc<Mutex<Vec<String>>>,
}

impl StubCodec {
    pub fn with_handle(handle: MetadataHandle) -> Self {
        Self {
            handle: Some(handle),
            calls: Arc::new(AtomicUsize::new(0)),
            paths: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Codec that fails every decode, like a file without metadata
    pub fn failing() -> Self {
        Self {
            handle: None,
            calls: Arc::new(AtomicUsize::new(0)),
            paths: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

impl MetadataCodec for StubCodec {
    fn open_and_decode(&self, path: &Path) -> Result<MetadataHandle, CodecError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.paths
            .lock()
            .unwrap()
            .push(path.to_string_lossy().into_owned());
        self.handle
            .clone()
            .ok_or_else(|| CodecError::decode("no Exif data"))
    }
}

/// Handle resembling a camera JPEG
pub fn sample_handle() -> MetadataHandle {
    MetadataHandle::new(b"II*\0sample exif buffer".to_vec())
        .with_tag("Exif.Image.Make", "Canon", "Canon")
        .with_tag("Exif.Image.Model", "Canon EOS 5D", "Canon EOS 5D")
        .with_tag("Exif.Image.Software", "GIMP 2.10", "GIMP 2.10")
        .with_tag("Exif.Image.XResolution", "72", "72/1")
        .with_tag("Exif.Photo.FNumber", "f/2.8", "28/10")
        .with_tag("Exif.Thumbnail.Compression", "JPEG", "6")
}

/// Source over a stub codec with the built-in aliases
pub fn stub_source(codec: &StubCodec) -> Arc<MetadataSource> {
    Arc::new(MetadataSource::new(AliasTable::builtin(), codec.clone()))
}

/// Minimal little-endian TIFF with one IFD of ASCII entries
///
/// Entries should be given in ascending tag order.
pub fn tiff_fixture(entries: &[(u16, &str)]) -> Vec<u8> {
    let ifd_len = 2 + entries.len() * 12 + 4;
    let mut data_offset = 8 + ifd_len;
    let mut out = Vec::new();
    let mut data = Vec::new();

    out.extend_from_slice(b"II*\0");
    out.extend_from_slice(&8u32.to_le_bytes());
    out.extend_from_slice(&u16::try_from(entries.len()).unwrap().to_le_bytes());

    for (tag, text) in entries {
        let mut bytes = text.as_bytes().to_vec();
        bytes.push(0);
        let count = u32::try_from(bytes.len()).unwrap();

        out.extend_from_slice(&tag.to_le_bytes());
        out.extend_from_slice(&2u16.to_le_bytes());
        out.extend_from_slice(&count.to_le_bytes());
        if bytes.len() <= 4 {
            bytes.resize(4, 0);
            out.extend_from_slice(&bytes);
        } else {
            out.extend_from_slice(&u32::try_from(data_offset).unwrap().to_le_bytes());
            if bytes.len() % 2 == 1 {
                bytes.push(0);
            }
            data_offset += bytes.len();
            data.extend_from_slice(&bytes);
        }
    }

    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&data);
    out
}
