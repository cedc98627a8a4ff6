//! mfind-exif - EXIF metadata tests and actions for file search pipelines
//!
//! A host pipeline hands this extension one file at a time through a
//! per-file [`Context`]. The extension answers tests such as "is the camera
//! make Canon?" and runs actions that print tags or a hash of the metadata
//! buffer. A file's metadata is decoded at most once per context, however
//! many tests and actions look at it.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use mfind_exif::{Args, Context, ExifConfig, MetadataSource, Registry};
//!
//! let config = ExifConfig::load().unwrap_or_default();
//! let registry = Registry::new(Arc::new(MetadataSource::exif(config.alias_table())));
//!
//! let mut ctx = Context::new("photos/a.jpg");
//! ctx.set_args(Args::one("canon"));
//! if registry.test("imake").and_then(|t| t.test(&mut ctx)).is_some() {
//!     ctx.set_args(Args::one("*Image*"));
//!     if let Some(print_tag) = registry.action("print_tag") {
//!         print_tag.run(&mut ctx);
//!     }
//! }
//! for line in ctx.take_buffer() {
//!     println!("{line}");
//! }
//! ```

use thiserror::Error;

pub mod actions;
pub mod aliases;
pub mod config;
pub mod context;
pub mod matcher;
pub mod metadata;
pub mod patterns;
pub mod predicates;
pub mod registry;

#[cfg(test)]
pub mod testing;

pub use actions::Action;
pub use aliases::AliasTable;
pub use config::ExifConfig;
pub use context::{Args, Context, MetadataSlot};
pub use matcher::{CaseMode, Indeterminate, MatchResult, match_tag};
pub use metadata::{CodecError, ExifCodec, MetadataCodec, MetadataHandle, MetadataSource, TagEntry};
pub use predicates::{Test, make_tag_predicate};
pub use registry::{Arity, FlagKind, FlagSpec, Registry};

/// Error enum, contains all failure states surfaced to a host
#[derive(Debug, Error)]
pub enum ExifFindError {
    /// Metadata codec error
    #[error("Metadata error: {0}")]
    Codec(#[from] CodecError),
    /// Key pattern error
    #[error("Pattern error: {0}")]
    Pattern(#[from] patterns::PatternError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
