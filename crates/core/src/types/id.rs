//! Newtype id for product listings.
//!
//! Listing ids are millisecond timestamps, so the wrapper is an `i64` that
//! serializes as a bare JSON number.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of a [`ProductListing`](super::ProductListing).
///
/// # Example
///
/// ```rust
/// # use vadaf_core::ProductId;
/// let id: ProductId = "1718000000000".parse().unwrap();
/// assert_eq!(id.as_i64(), 1_718_000_000_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(i64);

impl ProductId {
    /// Create a new ID from an i64 value.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the underlying i64 value.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProductId {
    type Err = core::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<ProductId> for i64 {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_bare_number() {
        let id = ProductId::new(1_700_000_000_123);
        assert_eq!(serde_json::to_string(&id).unwrap(), "1700000000123");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("abc".parse::<ProductId>().is_err());
        assert_eq!(" 42 ".parse::<ProductId>().unwrap(), ProductId::new(42));
    }

    #[test]
    fn test_ordering_follows_value() {
        assert!(ProductId::new(1) < ProductId::new(2));
    }
}
