//! Tag value matching
//!
//! [`match_tag`] is the single comparison routine behind every value test.
//! It resolves the tag name through the alias table, fetches the cached
//! metadata and compares the tag's interpreted value with the user's value
//! by exact string equality, optionally after lower-casing both sides.

use crate::context::Context;
use crate::metadata::MetadataSource;

/// Case handling of a value comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseMode {
    #[default]
    Sensitive,
    Insensitive,
}

impl CaseMode {
    /// Compare two values under this mode; both operands get the same treatment
    #[must_use]
    pub fn equals(self, left: &str, right: &str) -> bool {
        match self {
            Self::Sensitive => left == right,
            Self::Insensitive => left.to_lowercase() == right.to_lowercase(),
        }
    }
}

/// Why a match could not be decided
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Indeterminate {
    /// The file has no readable metadata
    NoMetadata,
    /// The metadata has no entry for this canonical key
    TagMissing(String),
}

/// Outcome of [`match_tag`]
///
/// A successful match hands the context back so the host can keep
/// evaluating against it.
#[derive(Debug)]
pub enum MatchResult<'c> {
    Matched(&'c mut Context),
    NotMatched,
    Indeterminate(Indeterminate),
}

impl<'c> MatchResult<'c> {
    #[must_use]
    pub const fn is_match(&self) -> bool {
        matches!(self, Self::Matched(_))
    }

    /// The context on a match, `None` otherwise
    #[must_use]
    pub fn into_context(self) -> Option<&'c mut Context> {
        match self {
            Self::Matched(ctx) => Some(ctx),
            Self::NotMatched | Self::Indeterminate(_) => None,
        }
    }
}

/// Compare the value of `tag_name` in the file of `ctx` with `tag_value`
pub fn match_tag<'c>(
    source: &MetadataSource,
    ctx: &'c mut Context,
    tag_name: &str,
    tag_value: &str,
    case: CaseMode,
) -> MatchResult<'c> {
    let key = source.resolve(tag_name);
    let Some(metadata) = source.metadata(ctx) else {
        return MatchResult::Indeterminate(Indeterminate::NoMetadata);
    };
    let Some(entry) = metadata.get(key) else {
        if ctx.verbosity() > 2 {
            tracing::trace!(path = %ctx.path().display(), key, "tag not present");
        }
        return MatchResult::Indeterminate(Indeterminate::TagMissing(key.to_string()));
    };

    if case.equals(&entry.value, tag_value) {
        MatchResult::Matched(ctx)
    } else {
        MatchResult::NotMatched
    }
}
