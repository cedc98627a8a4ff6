//! Metadata actions
//!
//! Actions append human-readable text about a file's metadata to the
//! context's output buffer. They always hand the context back, so a chain of
//! actions keeps running on files without metadata; such files simply
//! produce no output.

use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::context::Context;
use crate::metadata::MetadataSource;
use crate::patterns::KeyPattern;

/// A named action the host can run against a file
pub trait Action: Send + Sync {
    fn run<'c>(&self, ctx: &'c mut Context) -> &'c mut Context;
}

/// Print the raw value of one tag, or of every tag matching a glob
///
/// The argument is resolved through the alias table and looked up as an
/// exact key first. On a miss it is used as a case-sensitive glob over all
/// keys, and the matching raw values are printed one per line.
#[derive(Debug, Clone)]
pub struct PrintTag {
    source: Arc<MetadataSource>,
}

impl PrintTag {
    #[must_use]
    pub const fn new(source: Arc<MetadataSource>) -> Self {
        Self { source }
    }
}

impl Action for PrintTag {
    fn run<'c>(&self, ctx: &'c mut Context) -> &'c mut Context {
        let Some(arg) = ctx.args().single().map(str::to_string) else {
            return ctx;
        };
        let Some(metadata) = self.source.metadata(ctx) else {
            return ctx;
        };
        let key = self.source.resolve(&arg);

        if let Some(entry) = metadata.get(key) {
            ctx.push_output(entry.raw_value.clone());
            return ctx;
        }

        let pattern = match KeyPattern::glob(key) {
            Ok(pattern) => pattern,
            Err(err) => {
                tracing::debug!(error = %err, "print_tag argument is not a usable glob");
                return ctx;
            }
        };
        let values: Vec<&str> = pattern
            .filter(metadata.keys())
            .into_iter()
            .filter_map(|k| metadata.get(k))
            .map(|entry| entry.raw_value.as_str())
            .collect();
        if !values.is_empty() {
            ctx.push_output(values.join("\n"));
        }
        ctx
    }
}

/// Print `key: value` lines for every tag, or for the tags matching a glob
#[derive(Debug, Clone)]
pub struct PrintTags {
    source: Arc<MetadataSource>,
}

impl PrintTags {
    #[must_use]
    pub const fn new(source: Arc<MetadataSource>) -> Self {
        Self { source }
    }
}

impl Action for PrintTags {
    fn run<'c>(&self, ctx: &'c mut Context) -> &'c mut Context {
        let pattern = match ctx.args().single() {
            None => None,
            Some(arg) => match KeyPattern::glob(self.source.resolve(arg)) {
                Ok(pattern) => Some(pattern),
                Err(err) => {
                    tracing::debug!(error = %err, "print_tags argument is not a usable glob");
                    return ctx;
                }
            },
        };
        let Some(metadata) = self.source.metadata(ctx) else {
            return ctx;
        };

        let lines: Vec<String> = metadata
            .entries()
            .filter(|(key, _)| pattern.as_ref().is_none_or(|p| p.matches(key)))
            .map(|(key, entry)| format!("{key}: {}", entry.raw_value))
            .collect();
        if !lines.is_empty() {
            ctx.push_output(lines.join("\n"));
        }
        ctx
    }
}

/// Print the hex SHA-256 digest of the raw metadata container
#[derive(Debug, Clone)]
pub struct PrintBufferHash {
    source: Arc<MetadataSource>,
}

impl PrintBufferHash {
    #[must_use]
    pub const fn new(source: Arc<MetadataSource>) -> Self {
        Self { source }
    }
}

impl Action for PrintBufferHash {
    fn run<'c>(&self, ctx: &'c mut Context) -> &'c mut Context {
        let Some(metadata) = self.source.metadata(ctx) else {
            return ctx;
        };
        ctx.push_output(buffer_digest(metadata.buffer()));
        ctx
    }
}

/// Lower-case hex SHA-256 of `buffer`
#[must_use]
pub fn buffer_digest(buffer: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(buffer);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Args;
    use crate::metadata::MetadataHandle;
    use crate::testing::{StubCodec, sample_handle, stub_source};

    fn run_with(action: &dyn Action, ctx: &mut Context, args: Args) -> Vec<String> {
        ctx.set_args(args);
        action.run(ctx).buffer().to_vec()
    }

    #[test]
    fn test_print_tag_by_alias() {
        let codec = StubCodec::with_handle(sample_handle());
        let action = PrintTag::new(stub_source(&codec));
        let mut ctx = Context::new("a.jpg");

        let buffer = run_with(&action, &mut ctx, Args::one("make"));
        assert_eq!(buffer, vec!["Canon".to_string()]);
    }

    #[test]
    fn test_print_tag_prints_raw_value() {
        let codec = StubCodec::with_handle(sample_handle());
        let action = PrintTag::new(stub_source(&codec));
        let mut ctx = Context::new("a.jpg");

        let buffer = run_with(&action, &mut ctx, Args::one("Exif.Image.XResolution"));
        assert_eq!(buffer, vec!["72/1".to_string()]);
    }

    #[test]
    fn test_print_tag_glob_fallback() {
        let codec = StubCodec::with_handle(sample_handle());
        let action = PrintTag::new(stub_source(&codec));
        let mut ctx = Context::new("a.jpg");

        let buffer = run_with(&action, &mut ctx, Args::one("*Image*"));
        assert_eq!(
            buffer,
            vec!["Canon\nCanon EOS 5D\nGIMP 2.10\n72/1".to_string()]
        );
    }

    #[test]
    fn test_print_tag_repeated_stars() {
        let codec = StubCodec::with_handle(sample_handle());
        let action = PrintTag::new(stub_source(&codec));

        let mut ctx = Context::new("a.jpg");
        let single = run_with(&action, &mut ctx, Args::one("*Image*"));
        let mut ctx = Context::new("a.jpg");
        let doubled = run_with(&action, &mut ctx, Args::one("*Image**"));
        assert_eq!(doubled, single);

        let mut ctx = Context::new("a.jpg");
        assert_eq!(run_with(&action, &mut ctx, Args::one("Exif.Photo.**")), vec!["28/10".to_string()]);
        let mut ctx = Context::new("a.jpg");
        assert_eq!(run_with(&action, &mut ctx, Args::one("**Make")), vec!["Canon".to_string()]);
    }

    #[test]
    fn test_print_tags_repeated_stars() {
        let codec = StubCodec::with_handle(sample_handle());
        let action = PrintTags::new(stub_source(&codec));
        let mut ctx = Context::new("a.jpg");

        let buffer = run_with(&action, &mut ctx, Args::one("Exif.Thumbnail.**"));
        assert_eq!(buffer, vec!["Exif.Thumbnail.Compression: 6".to_string()]);
    }

    #[test]
    fn test_print_tag_no_match_leaves_buffer() {
        let codec = StubCodec::with_handle(sample_handle());
        let action = PrintTag::new(stub_source(&codec));
        let mut ctx = Context::new("a.jpg");

        assert!(run_with(&action, &mut ctx, Args::one("*GPS*")).is_empty());
        assert!(run_with(&action, &mut ctx, Args::one("Exif.[Image")).is_empty());
        assert!(run_with(&action, &mut ctx, Args::None).is_empty());
    }

    #[test]
    fn test_glob_fallback_independent_of_order() {
        let codec = StubCodec::with_handle(sample_handle());
        let source = stub_source(&codec);
        let print_tag = PrintTag::new(Arc::clone(&source));
        let print_tags = PrintTags::new(Arc::clone(&source));
        let hash = PrintBufferHash::new(Arc::clone(&source));

        let mut first = Context::new("a.jpg");
        let alone = run_with(&print_tag, &mut first, Args::one("*Image*"));

        let mut second = Context::new("a.jpg");
        run_with(&hash, &mut second, Args::None);
        run_with(&print_tags, &mut second, Args::None);
        let after = run_with(&print_tag, &mut second, Args::one("*Image*"));

        assert_eq!(alone.last(), after.last());
        assert_eq!(codec.calls(), 2);
    }

    #[test]
    fn test_print_tags_all() {
        let codec = StubCodec::with_handle(
            MetadataHandle::default()
                .with_tag("Exif.Image.Make", "Canon", "Canon")
                .with_tag("Exif.Image.XResolution", "72", "72/1"),
        );
        let action = PrintTags::new(stub_source(&codec));
        let mut ctx = Context::new("a.jpg");

        let buffer = run_with(&action, &mut ctx, Args::None);
        assert_eq!(
            buffer,
            vec!["Exif.Image.Make: Canon\nExif.Image.XResolution: 72/1".to_string()]
        );
    }

    #[test]
    fn test_print_tags_with_pattern() {
        let codec = StubCodec::with_handle(sample_handle());
        let action = PrintTags::new(stub_source(&codec));
        let mut ctx = Context::new("a.jpg");

        let buffer = run_with(&action, &mut ctx, Args::one("Exif.Photo.*"));
        assert_eq!(buffer, vec!["Exif.Photo.FNumber: 28/10".to_string()]);

        let buffer = run_with(&action, &mut ctx, Args::one("model"));
        assert_eq!(buffer.last().unwrap(), "Exif.Image.Model: Canon EOS 5D");
    }

    #[test]
    fn test_buffer_hash() {
        let codec = StubCodec::with_handle(sample_handle());
        let action = PrintBufferHash::new(stub_source(&codec));
        let mut ctx = Context::new("a.jpg");

        let buffer = run_with(&action, &mut ctx, Args::None);
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer[0], buffer_digest(sample_handle().buffer()));
        assert_eq!(buffer[0].len(), 64);
        assert!(buffer[0].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_known_digest() {
        assert_eq!(
            buffer_digest(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            buffer_digest(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_hash_same_buffer_different_paths() {
        let codec = StubCodec::with_handle(sample_handle());
        let action = PrintBufferHash::new(stub_source(&codec));

        let mut first = Context::new("a.jpg");
        let mut second = Context::new("copy/of/a.jpg");
        let a = run_with(&action, &mut first, Args::None);
        let b = run_with(&action, &mut second, Args::None);
        assert_eq!(a, b);
    }

    #[test]
    fn test_actions_without_metadata() {
        let codec = StubCodec::failing();
        let source = stub_source(&codec);
        let actions: Vec<Box<dyn Action>> = vec![
            Box::new(PrintTag::new(Arc::clone(&source))),
            Box::new(PrintTags::new(Arc::clone(&source))),
            Box::new(PrintBufferHash::new(Arc::clone(&source))),
        ];
        let mut ctx = Context::new("b.jpg").with_args(Args::one("make"));

        for action in &actions {
            let returned = action.run(&mut ctx);
            assert_eq!(returned.path(), std::path::Path::new("b.jpg"));
        }
        assert!(ctx.buffer().is_empty());
        assert_eq!(codec.calls(), 1);
    }
}
