//! Per-file evaluation context
//!
//! The host creates one [`Context`] per file and threads it through every
//! test and action evaluated for that file. Tests and actions read the path,
//! the current arguments and the verbosity; they write the metadata cache slot
//! and append to the output buffer. Dropping the context discards the cached
//! metadata, so nothing leaks from one file into the next.
//!
//! # Examples
//!
//! ```
//! use mfind_exif::{Args, Context};
//!
//! let mut ctx = Context::new("photos/a.jpg").with_verbosity(1);
//! ctx.set_args(Args::one("Canon"));
//!
//! assert_eq!(ctx.args().single(), Some("Canon"));
//! assert!(ctx.buffer().is_empty());
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::metadata::MetadataHandle;

/// Arguments of the test or action currently being invoked
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Args {
    /// No argument (zero-arity flags, or an optional argument left out)
    #[default]
    None,
    /// A single argument
    One(String),
    /// An ordered pair of arguments
    Two(String, String),
}

impl Args {
    #[must_use]
    pub fn one(value: impl Into<String>) -> Self {
        Self::One(value.into())
    }

    #[must_use]
    pub fn two(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self::Two(first.into(), second.into())
    }

    /// The single argument, if that is the shape given
    #[must_use]
    pub fn single(&self) -> Option<&str> {
        match self {
            Self::One(value) => Some(value),
            _ => None,
        }
    }

    /// The argument pair, if that is the shape given
    #[must_use]
    pub fn pair(&self) -> Option<(&str, &str)> {
        match self {
            Self::Two(first, second) => Some((first, second)),
            _ => None,
        }
    }
}

/// Cache slot holding the outcome of the metadata load for one file
#[derive(Debug, Clone, Default)]
pub enum MetadataSlot {
    /// No test or action has asked for metadata yet
    #[default]
    Unresolved,
    /// Metadata was decoded successfully
    Loaded(Arc<MetadataHandle>),
    /// Loading was attempted and failed; never retried for this file
    Absent,
}

impl MetadataSlot {
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        !matches!(self, Self::Unresolved)
    }
}

/// Mutable per-file state owned by the host
#[derive(Debug, Clone, Default)]
pub struct Context {
    path: PathBuf,
    args: Args,
    verbosity: u8,
    exif: MetadataSlot,
    buffer: Vec<String>,
}

impl Context {
    /// Create a context for `path` with no arguments and verbosity 0
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    #[must_use]
    pub fn with_args(mut self, args: Args) -> Self {
        self.args = args;
        self
    }

    /// Replace the arguments before invoking the next test or action
    pub fn set_args(&mut self, args: Args) -> &mut Self {
        self.args = args;
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn args(&self) -> &Args {
        &self.args
    }

    #[must_use]
    pub const fn verbosity(&self) -> u8 {
        self.verbosity
    }

    #[must_use]
    pub const fn metadata_slot(&self) -> &MetadataSlot {
        &self.exif
    }

    pub(crate) fn store_metadata(&mut self, slot: MetadataSlot) {
        self.exif = slot;
    }

    /// Output appended by actions, in order
    #[must_use]
    pub fn buffer(&self) -> &[String] {
        &self.buffer
    }

    /// Append one output entry
    pub fn push_output(&mut self, entry: impl Into<String>) {
        self.buffer.push(entry.into());
    }

    /// Hand the collected output to the host, leaving the buffer empty
    pub fn take_buffer(&mut self) -> Vec<String> {
        std::mem::take(&mut self.buffer)
    }
}
