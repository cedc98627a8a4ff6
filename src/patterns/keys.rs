use glob::Pattern as GlobPattern;
use regex::Regex;

use super::error::PatternError;

/// Pattern over canonical metadata keys
#[derive(Debug, Clone)]
pub enum KeyPattern {
    /// Exact, case-sensitive key
    Literal(String),
    /// Exact key compared case-insensitively; holds the lower-cased form
    Caseless(String),
    /// Case-sensitive Unix glob
    Glob { original: String, spec: GlobPattern },
    /// Regular expression searched anywhere in the key
    Regex { original: String, compiled: Regex },
}

impl KeyPattern {
    /// Construct a literal key pattern.
    ///
    /// # Errors
    /// Returns `PatternError::InvalidEmpty` if `s` is empty.
    pub fn literal(s: &str) -> Result<Self, PatternError> {
        if s.is_empty() {
            return Err(PatternError::InvalidEmpty);
        }
        Ok(Self::Literal(s.to_string()))
    }

    /// Construct a case-insensitive literal key pattern.
    ///
    /// # Errors
    /// Returns `PatternError::InvalidEmpty` if `s` is empty.
    pub fn caseless(s: &str) -> Result<Self, PatternError> {
        if s.is_empty() {
            return Err(PatternError::InvalidEmpty);
        }
        Ok(Self::Caseless(s.to_lowercase()))
    }

    /// Construct a glob key pattern.
    ///
    /// # Errors
    /// * Returns `PatternError::InvalidEmpty` if `p` is empty.
    /// * Returns `PatternError::InvalidGlob` if the glob specification is invalid.
    pub fn glob(p: &str) -> Result<Self, PatternError> {
        if p.is_empty() {
            return Err(PatternError::InvalidEmpty);
        }
        GlobPattern::new(&collapse_stars(p))
            .map(|g| Self::Glob {
                original: p.to_string(),
                spec: g,
            })
            .map_err(|e| PatternError::glob_parse(p, &e.to_string()))
    }

    /// Construct a regex key pattern.
    ///
    /// # Errors
    /// * Returns `PatternError::InvalidEmpty` if `p` is empty.
    /// * Returns `PatternError::InvalidRegex` if the pattern fails to compile.
    pub fn regex(p: &str) -> Result<Self, PatternError> {
        if p.is_empty() {
            return Err(PatternError::InvalidEmpty);
        }
        Regex::new(p)
            .map(|r| Self::Regex {
                original: p.to_string(),
                compiled: r,
            })
            .map_err(|e| PatternError::regex_compile(p, &e.to_string()))
    }

    #[must_use]
    pub fn matches(&self, key: &str) -> bool {
        match self {
            Self::Literal(s) => s == key,
            Self::Caseless(s) => *s == key.to_lowercase(),
            Self::Glob { spec, .. } => spec.matches(key),
            Self::Regex { compiled, .. } => compiled.is_match(key),
        }
    }

    /// Keys accepted by this pattern, in the order given
    pub fn filter<'a, I>(&self, keys: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        keys.into_iter().filter(|k| self.matches(k)).collect()
    }

    #[must_use]
    pub fn original(&self) -> &str {
        match self {
            Self::Literal(s) | Self::Caseless(s) => s.as_str(),
            Self::Glob { original, .. } | Self::Regex { original, .. } => original.as_str(),
        }
    }
}

/// Keys have no path separators, so `**` means the same as `*`
fn collapse_stars(p: &str) -> String {
    let mut out = String::with_capacity(p.len());
    for c in p.chars() {
        if c == '*' && out.ends_with('*') {
            continue;
        }
        out.push(c);
    }
    out
}

impl PartialEq for KeyPattern {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Literal(a), Self::Literal(b))
            | (Self::Caseless(a), Self::Caseless(b))
            | (Self::Glob { original: a, .. }, Self::Glob { original: b, .. })
            | (Self::Regex { original: a, .. }, Self::Regex { original: b, .. }) => a == b,
            _ => false,
        }
    }
}

impl Eq for KeyPattern {}
