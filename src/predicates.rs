//! Metadata tests
//!
//! A test looks at the file of a [`Context`] and either hands the context
//! back (match) or returns `None` (no match). Files without readable metadata
//! never match.
//!
//! Value tests come in two call shapes over the same [`match_tag`] routine:
//!
//! - free functions ([`tag_test`], [`fixed_tag_test`]) taking the source and
//!   context on every call;
//! - predicate objects built once with [`make_tag_predicate`] and invoked per
//!   file through the [`Test`] trait.

use std::sync::Arc;

use crate::context::Context;
use crate::matcher::{CaseMode, match_tag};
use crate::metadata::MetadataSource;
use crate::patterns::KeyPattern;

/// A named test the host can evaluate against a file
pub trait Test: Send + Sync {
    /// `Some(ctx)` when the file matches, `None` otherwise
    fn test<'c>(&self, ctx: &'c mut Context) -> Option<&'c mut Context>;
}

/// Match an arbitrary tag against a value; `ctx.args()` holds `(tag, value)`
pub fn tag_test<'c>(source: &MetadataSource, ctx: &'c mut Context) -> Option<&'c mut Context> {
    let Some((name, value)) = ctx
        .args()
        .pair()
        .map(|(name, value)| (name.to_string(), value.to_string()))
    else {
        tracing::debug!(args = ?ctx.args(), "tag test expects a tag and a value");
        return None;
    };
    match_tag(source, ctx, &name, &value, CaseMode::Sensitive).into_context()
}

/// Match the fixed tag `tag_name`; `ctx.args()` holds the value
pub fn fixed_tag_test<'c>(
    source: &MetadataSource,
    ctx: &'c mut Context,
    tag_name: &str,
    case: CaseMode,
) -> Option<&'c mut Context> {
    let Some(value) = ctx.args().single().map(str::to_string) else {
        tracing::debug!(tag = tag_name, args = ?ctx.args(), "tag test expects one value");
        return None;
    };
    match_tag(source, ctx, tag_name, &value, case).into_context()
}

/// Value test bound to one tag and case mode
#[derive(Debug, Clone)]
pub struct TagPredicate {
    source: Arc<MetadataSource>,
    tag: String,
    case: CaseMode,
}

impl TagPredicate {
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[must_use]
    pub const fn case(&self) -> CaseMode {
        self.case
    }
}

impl Test for TagPredicate {
    fn test<'c>(&self, ctx: &'c mut Context) -> Option<&'c mut Context> {
        fixed_tag_test(&self.source, ctx, &self.tag, self.case)
    }
}

/// Build the value test for `tag_name` (short name or canonical key)
#[must_use]
pub fn make_tag_predicate(
    source: Arc<MetadataSource>,
    tag_name: impl Into<String>,
    case: CaseMode,
) -> TagPredicate {
    TagPredicate {
        source,
        tag: tag_name.into(),
        case,
    }
}

/// The two-argument `tag NAME VALUE` test
#[derive(Debug, Clone)]
pub struct TagValuePredicate {
    source: Arc<MetadataSource>,
}

impl TagValuePredicate {
    #[must_use]
    pub const fn new(source: Arc<MetadataSource>) -> Self {
        Self { source }
    }
}

impl Test for TagValuePredicate {
    fn test<'c>(&self, ctx: &'c mut Context) -> Option<&'c mut Context> {
        tag_test(&self.source, ctx)
    }
}

/// How a `has-tag` test interprets its argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMode {
    /// Alias-resolved key, exact
    Exact,
    /// Alias-resolved key, ignoring case
    Caseless,
    /// Regular expression over the keys
    Regex,
}

/// Presence test: matches when the file has a key selected by the argument
#[derive(Debug, Clone)]
pub struct HasTagPredicate {
    source: Arc<MetadataSource>,
    mode: KeyMode,
}

impl HasTagPredicate {
    #[must_use]
    pub const fn new(source: Arc<MetadataSource>, mode: KeyMode) -> Self {
        Self { source, mode }
    }

    fn pattern(&self, arg: &str) -> Option<KeyPattern> {
        let built = match self.mode {
            KeyMode::Exact => KeyPattern::literal(self.source.resolve(arg)),
            KeyMode::Caseless => {
                let lowered = arg.to_lowercase();
                match self.source.resolve(arg) {
                    key if key != arg => KeyPattern::caseless(key),
                    _ => KeyPattern::caseless(self.source.resolve(&lowered)),
                }
            }
            KeyMode::Regex => KeyPattern::regex(arg),
        };
        built
            .inspect_err(|err| tracing::debug!(error = %err, "unusable key pattern"))
            .ok()
    }
}

impl Test for HasTagPredicate {
    fn test<'c>(&self, ctx: &'c mut Context) -> Option<&'c mut Context> {
        let pattern = self.pattern(ctx.args().single()?)?;
        let metadata = self.source.metadata(ctx)?;
        if metadata.keys().any(|key| pattern.matches(key)) {
            Some(ctx)
        } else {
            if ctx.verbosity() > 2 {
                tracing::trace!(path = %ctx.path().display(), pattern = pattern.original(), "no key present");
            }
            None
        }
    }
}
