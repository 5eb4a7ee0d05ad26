//! Classified comments and the review feed.
//!
//! The feed shows comments newest first, filters them by a search query and
//! collects pending relabels until they are committed as backend updates.

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::date_range::DateRange;
use crate::error::{Error, Result};
use crate::types::{BatchId, CommentId};

/// Sentiment class of a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentScore {
    Negative,
    Neutral,
    Positive,
}

impl SentimentScore {
    /// Map a backend `type_comment` code. Anything unrecognized is negative.
    #[must_use]
    pub const fn from_code(code: i64) -> Self {
        match code {
            2 => Self::Positive,
            1 => Self::Neutral,
            _ => Self::Negative,
        }
    }

    /// Backend `type_comment` code.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Negative => 0,
            Self::Neutral => 1,
            Self::Positive => 2,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Negative => "negative",
            Self::Neutral => "neutral",
            Self::Positive => "positive",
        }
    }

    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Negative, Self::Neutral, Self::Positive]
    }
}

impl fmt::Display for SentimentScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for SentimentScore {
    type Err = Error;

    /// Accepts names (`positive`) or backend codes (`2`).
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "negative" | "0" => Ok(Self::Negative),
            "neutral" | "1" => Ok(Self::Neutral),
            "positive" | "2" => Ok(Self::Positive),
            _ => Err(Error::InvalidScore(s.to_string())),
        }
    }
}

/// A classified comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub text: String,
    pub score: SentimentScore,
    pub created_at: Option<DateTime<Utc>>,
}

impl Comment {
    /// UTC calendar day the comment was written, if known.
    #[must_use]
    pub fn created_day(&self) -> Option<NaiveDate> {
        self.created_at.map(|t| t.date_naive())
    }
}

/// Relabel payload for the backend `PUT /classified` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreUpdate {
    pub file_id: BatchId,
    pub id_comment: CommentId,
    pub type_comment: u8,
}

/// Comment feed with local, uncommitted relabels.
#[derive(Debug, Clone, Default)]
pub struct CommentFeed {
    comments: Vec<Comment>,
    pending: BTreeMap<CommentId, SentimentScore>,
}

impl CommentFeed {
    /// Build a feed ordered newest first.
    ///
    /// Comments without a timestamp go last, in their original order.
    #[must_use]
    pub fn new(mut comments: Vec<Comment>) -> Self {
        comments.sort_by_key(|c| Reverse(c.created_at));
        Self {
            comments,
            pending: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.comments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// Case-insensitive substring search over comment text.
    ///
    /// A blank query matches everything.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Comment> {
        let query = query.trim().to_lowercase();
        self.comments
            .iter()
            .filter(|c| query.is_empty() || c.text.to_lowercase().contains(&query))
            .collect()
    }

    /// Comments created inside a complete range. Other ranges keep everything.
    #[must_use]
    pub fn in_range(&self, range: &DateRange) -> Vec<&Comment> {
        if !range.is_complete() {
            return self.comments.iter().collect();
        }
        self.comments
            .iter()
            .filter(|c| c.created_day().is_some_and(|d| range.contains(d)))
            .collect()
    }

    fn find(&self, id: CommentId) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == id)
    }

    /// The score shown for a comment: its pending relabel, else its class.
    #[must_use]
    pub fn effective_score(&self, id: CommentId) -> Option<SentimentScore> {
        self.pending
            .get(&id)
            .copied()
            .or_else(|| self.find(id).map(|c| c.score))
    }

    /// Record a pending relabel.
    ///
    /// Relabeling back to the classified score drops the pending entry.
    pub fn relabel(&mut self, id: CommentId, score: SentimentScore) -> Result<()> {
        let current = self
            .find(id)
            .map(|c| c.score)
            .ok_or(Error::UnknownComment(id.get()))?;

        if current == score {
            self.pending.remove(&id);
        } else {
            self.pending.insert(id, score);
        }
        debug!(%id, %score, pending = self.pending.len(), "comment relabeled");
        Ok(())
    }

    /// Pending relabels in id order.
    pub fn pending(&self) -> impl Iterator<Item = (CommentId, SentimentScore)> + '_ {
        self.pending.iter().map(|(id, score)| (*id, *score))
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Drop all pending relabels.
    pub fn discard_pending(&mut self) {
        self.pending.clear();
    }

    /// Apply pending relabels and return the backend updates for them.
    pub fn commit(&mut self, batch: BatchId) -> Vec<ScoreUpdate> {
        let pending = std::mem::take(&mut self.pending);
        let mut updates = Vec::with_capacity(pending.len());

        for (id, score) in pending {
            if let Some(comment) = self.comments.iter_mut().find(|c| c.id == id) {
                comment.score = score;
                updates.push(ScoreUpdate {
                    file_id: batch,
                    id_comment: id,
                    type_comment: score.code(),
                });
            }
        }
        updates
    }
}
