//! Short tag names
//!
//! Maps user-friendly names such as `make` to the canonical metadata keys the
//! codec produces (`Exif.Image.Make`). Unknown names resolve to themselves so
//! they can be used as canonical keys or as glob patterns.

use std::collections::HashMap;

/// Built-in aliases, extended by the `[aliases]` table of the config file
const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("make", "Exif.Image.Make"),
    ("model", "Exif.Image.Model"),
    ("software", "Exif.Image.Software"),
];

/// Immutable short-name to canonical-key table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTable {
    entries: HashMap<String, String>,
}

impl AliasTable {
    /// Table holding only the built-in aliases
    #[must_use]
    pub fn builtin() -> Self {
        let entries = BUILTIN_ALIASES
            .iter()
            .map(|(short, key)| ((*short).to_string(), (*key).to_string()))
            .collect();
        Self { entries }
    }

    /// Built-in aliases with `overrides` layered on top. User entries win.
    #[must_use]
    pub fn with_overrides<I, K, V>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut table = Self::builtin();
        table
            .entries
            .extend(overrides.into_iter().map(|(k, v)| (k.into(), v.into())));
        table
    }

    /// Resolve a short name to its canonical key, or return `name` unchanged
    #[must_use]
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.entries.get(name).map_or(name, String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_aliases() {
        let table = AliasTable::builtin();
        assert_eq!(table.resolve("make"), "Exif.Image.Make");
        assert_eq!(table.resolve("model"), "Exif.Image.Model");
        assert_eq!(table.resolve("software"), "Exif.Image.Software");
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_unknown_name_passes_through() {
        let table = AliasTable::builtin();
        assert_eq!(table.resolve("Exif.Photo.FNumber"), "Exif.Photo.FNumber");
        assert_eq!(table.resolve("*Image*"), "*Image*");
        assert_eq!(table.resolve(""), "");
    }

    #[test]
    fn test_aliases_are_case_sensitive() {
        let table = AliasTable::builtin();
        assert_eq!(table.resolve("Make"), "Make");
    }

    #[test]
    fn test_overrides_extend_and_replace() {
        let table = AliasTable::with_overrides([
            ("fnumber", "Exif.Photo.FNumber"),
            ("make", "Exif.Image.Model"),
        ]);
        assert_eq!(table.resolve("fnumber"), "Exif.Photo.FNumber");
        assert_eq!(table.resolve("make"), "Exif.Image.Model");
        assert_eq!(table.resolve("software"), "Exif.Image.Software");
        assert_eq!(table.len(), 4);
    }
}
