//! Default EXIF codec
//!
//! Decodes JPEG, TIFF, HEIF, PNG and WebP containers with `kamadak-exif` and
//! names each field with the dotted key layout used throughout this crate:
//!
//! | IFD              | key prefix        |
//! |------------------|-------------------|
//! | primary image    | `Exif.Image.`     |
//! | thumbnail        | `Exif.Thumbnail.` |
//! | Exif sub-IFD     | `Exif.Photo.`     |
//! | GPS sub-IFD      | `Exif.GPSInfo.`   |
//! | interoperability | `Exif.Iop.`       |

use std::fmt::Display;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use ::exif::{Exif, Field, In, Reader, Tag, Value};

use super::{CodecError, MetadataCodec, MetadataHandle, TagEntry};

/// [`MetadataCodec`] backed by `kamadak-exif`
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifCodec;

impl ExifCodec {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl MetadataCodec for ExifCodec {
    fn open_and_decode(&self, path: &Path) -> Result<MetadataHandle, CodecError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        let exif = Reader::new().read_from_container(&mut reader)?;
        Ok(handle_from_exif(&exif))
    }
}

impl From<::exif::Error> for CodecError {
    fn from(err: ::exif::Error) -> Self {
        match err {
            ::exif::Error::Io(io) => Self::Read(io),
            other => Self::Decode(other.to_string()),
        }
    }
}

fn handle_from_exif(exif: &Exif) -> MetadataHandle {
    let mut handle = MetadataHandle::new(exif.buf().to_vec());
    for field in exif.fields() {
        let Some(key) = canonical_key(field) else {
            continue;
        };
        handle.insert(key, TagEntry::new(interpreted_value(field), raw_value(&field.value)));
    }
    handle
}

fn canonical_key(field: &Field) -> Option<String> {
    let group = match field.tag.context() {
        ::exif::Context::Tiff if field.ifd_num == In::PRIMARY => "Image",
        ::exif::Context::Tiff if field.ifd_num == In::THUMBNAIL => "Thumbnail",
        ::exif::Context::Exif => "Photo",
        ::exif::Context::Gps => "GPSInfo",
        ::exif::Context::Interop => "Iop",
        _ => return None,
    };
    Some(format!("Exif.{group}.{}", tag_name(field.tag)))
}

/// Registered tag name, or the hex tag number for tags the codec does not know
fn tag_name(tag: Tag) -> String {
    if tag.description().is_some() {
        tag.to_string()
    } else {
        format!("0x{:04x}", tag.number())
    }
}

fn interpreted_value(field: &Field) -> String {
    match &field.value {
        Value::Ascii(strings) => ascii_text(strings),
        _ => field.display_value().to_string(),
    }
}

fn raw_value(value: &Value) -> String {
    match value {
        Value::Ascii(strings) => ascii_text(strings),
        Value::Byte(bytes) | Value::Undefined(bytes, _) => join(bytes),
        Value::SByte(v) => join(v),
        Value::Short(v) => join(v),
        Value::SShort(v) => join(v),
        Value::Long(v) => join(v),
        Value::SLong(v) => join(v),
        Value::Float(v) => join(v),
        Value::Double(v) => join(v),
        Value::Rational(v) => v
            .iter()
            .map(|r| format!("{}/{}", r.num, r.denom))
            .collect::<Vec<_>>()
            .join(" "),
        Value::SRational(v) => v
            .iter()
            .map(|r| format!("{}/{}", r.num, r.denom))
            .collect::<Vec<_>>()
            .join(" "),
        _ => String::new(),
    }
}

fn ascii_text(strings: &[Vec<u8>]) -> String {
    strings
        .iter()
        .map(|s| String::from_utf8_lossy(s).trim_end_matches('\0').to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn join<T: Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{TAG_MAKE, TAG_MODEL, TAG_SOFTWARE, tiff_fixture};
    use std::fs;

    #[test]
    fn test_decodes_primary_ifd_tags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.tif");
        fs::write(
            &path,
            tiff_fixture(&[(TAG_MAKE, "Canon"), (TAG_MODEL, "Canon EOS 5D"), (TAG_SOFTWARE, "GIMP")]),
        )
        .unwrap();

        let handle = ExifCodec::new().open_and_decode(&path).unwrap();

        assert_eq!(handle.get("Exif.Image.Make").unwrap().value, "Canon");
        assert_eq!(handle.get("Exif.Image.Make").unwrap().raw_value, "Canon");
        assert_eq!(handle.get("Exif.Image.Model").unwrap().value, "Canon EOS 5D");
        assert_eq!(handle.get("Exif.Image.Software").unwrap().value, "GIMP");
        assert!(!handle.buffer().is_empty());
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ExifCodec::new()
            .open_and_decode(&dir.path().join("nope.jpg"))
            .unwrap_err();
        assert!(matches!(err, CodecError::Read(_)));
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("b.jpg");
        fs::write(&path, b"definitely not an image").unwrap();

        let err = ExifCodec::new().open_and_decode(&path).unwrap_err();
        assert!(matches!(err, CodecError::Decode(_)));
    }

    #[test]
    fn test_raw_value_forms() {
        assert_eq!(raw_value(&Value::Short(vec![1, 2, 3])), "1 2 3");
        assert_eq!(
            raw_value(&Value::Rational(vec![::exif::Rational { num: 72, denom: 1 }])),
            "72/1"
        );
        assert_eq!(raw_value(&Value::Undefined(vec![48, 50, 51, 48], 0)), "48 50 51 48");
        assert_eq!(raw_value(&Value::Ascii(vec![b"Canon\0".to_vec()])), "Canon");
    }
}
