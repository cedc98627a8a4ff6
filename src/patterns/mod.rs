//! Key patterns - typed matchers over canonical metadata keys.
//!
//! Actions and the `has-tag` family of tests select keys either by exact
//! name, by case-insensitive name, by Unix glob (`*Image*`) or by regular
//! expression.

pub mod error;
pub mod keys;

pub use error::PatternError;
pub use keys::KeyPattern;
