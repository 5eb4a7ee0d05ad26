//! Domain-specific newtypes for type safety.
//!
//! Strongly-typed wrappers keep comment ids, batch ids and counts from being
//! mixed up. Uses `derive_more` to skip conversion boilerplate.

use std::fmt;
use std::str::FromStr;

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

// ============================================================================
// CommentId
// ============================================================================

/// Backend identifier of a classified comment (`id_comment`).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    From,
    Into,
    Display,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct CommentId(pub u64);

impl CommentId {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

// ============================================================================
// BatchId
// ============================================================================

/// Identifier the backend assigns to an uploaded CSV batch (`file_id`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, From, Into, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchId(pub Uuid);

impl FromStr for BatchId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| Error::InvalidBatchId(s.to_string()))
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

// ============================================================================
// ReviewCount
// ============================================================================

/// Number of reviews falling into a bucket.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    From,
    Into,
    Display,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct ReviewCount(pub u64);

impl ReviewCount {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Add one review.
    pub fn increment(&mut self) {
        self.0 += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_id_display() {
        assert_eq!(CommentId(42).to_string(), "42");
        assert_eq!(u64::from(CommentId(7)), 7);
    }

    #[test]
    fn test_batch_id_parse() {
        let id: BatchId = "6f1c2a8e-9b3d-4c1e-8f2a-1b2c3d4e5f60".parse().unwrap();
        assert_eq!(id.to_string(), "6f1c2a8e-9b3d-4c1e-8f2a-1b2c3d4e5f60");

        let err = "not-a-uuid".parse::<BatchId>().unwrap_err();
        assert!(matches!(err, Error::InvalidBatchId(_)));
    }

    #[test]
    fn test_review_count_increment() {
        let mut count = ReviewCount::default();
        count.increment();
        count.increment();
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_json_is_transparent() {
        assert_eq!(serde_json::to_string(&CommentId(5)).unwrap(), "5");
        assert_eq!(serde_json::to_string(&ReviewCount(3)).unwrap(), "3");
    }
}
