//! Cached metadata access
//!
//! [`get_metadata`] is the only place that invokes a codec. The outcome is
//! stored in the context's cache slot on the first call, so a file is decoded
//! at most once no matter how many tests and actions look at it, and a failed
//! load is remembered as Absent instead of being retried.

use std::fmt;
use std::sync::Arc;

use crate::aliases::AliasTable;
use crate::context::{Context, MetadataSlot};

use super::{ExifCodec, MetadataCodec, MetadataHandle};

/// Return the metadata of the file in `ctx`, decoding it on first use
///
/// Returns `None` when the file has no readable metadata. Codec errors never
/// escape; they are logged when `verbosity > 0` and cached as Absent.
pub fn get_metadata(ctx: &mut Context, codec: &dyn MetadataCodec) -> Option<Arc<MetadataHandle>> {
    match ctx.metadata_slot() {
        MetadataSlot::Loaded(handle) => {
            if ctx.verbosity() > 1 {
                tracing::debug!(path = %ctx.path().display(), "metadata cache hit");
            }
            return Some(Arc::clone(handle));
        }
        MetadataSlot::Absent => return None,
        MetadataSlot::Unresolved => {}
    }

    match codec.open_and_decode(ctx.path()) {
        Ok(handle) => {
            let handle = Arc::new(handle);
            if ctx.verbosity() > 1 {
                tracing::debug!(
                    path = %ctx.path().display(),
                    tags = handle.len(),
                    "metadata loaded"
                );
            }
            ctx.store_metadata(MetadataSlot::Loaded(Arc::clone(&handle)));
            Some(handle)
        }
        Err(err) => {
            if ctx.verbosity() > 0 {
                tracing::warn!(path = %ctx.path().display(), error = %err, "cannot read metadata");
            }
            if ctx.verbosity() > 2 {
                tracing::trace!(error = ?err, "metadata decode failure detail");
            }
            ctx.store_metadata(MetadataSlot::Absent);
            None
        }
    }
}

/// Alias table and codec shared by every test and action of a registry
///
/// Built once at startup and never mutated afterwards.
pub struct MetadataSource {
    aliases: AliasTable,
    codec: Box<dyn MetadataCodec>,
}

impl MetadataSource {
    #[must_use]
    pub fn new(aliases: AliasTable, codec: impl MetadataCodec + 'static) -> Self {
        Self {
            aliases,
            codec: Box::new(codec),
        }
    }

    /// Source backed by the default EXIF codec
    #[must_use]
    pub fn exif(aliases: AliasTable) -> Self {
        Self::new(aliases, ExifCodec::new())
    }

    #[must_use]
    pub const fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Resolve a short tag name through the alias table
    #[must_use]
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.resolve(name)
    }

    /// Cached metadata of the file in `ctx`, see [`get_metadata`]
    pub fn metadata(&self, ctx: &mut Context) -> Option<Arc<MetadataHandle>> {
        get_metadata(ctx, self.codec.as_ref())
    }
}

impl Default for MetadataSource {
    fn default() -> Self {
        Self::exif(AliasTable::builtin())
    }
}

impl fmt::Debug for MetadataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataSource")
            .field("aliases", &self.aliases)
            .finish_non_exhaustive()
    }
}
