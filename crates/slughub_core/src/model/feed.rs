//! Forum feed domain model.
//!
//! # Responsibility
//! - Define channel identity and feed entry records.
//! - Define the watermark ordering used by incremental sync.
//!
//! # Invariants
//! - `ChannelId` is trimmed and non-blank.
//! - Watermarks order by `(posted_at_ms, seq)`; `seq` is assigned by the store
//!   in insertion order, so equal timestamps still have a total order.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Identifier of one forum channel (usually a course code).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChannelId(String);

impl ChannelId {
    pub fn new(value: impl AsRef<str>) -> Result<Self, FeedValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(FeedValidationError::BlankChannel);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ChannelId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ChannelId {
    type Error = FeedValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ChannelId> for String {
    fn from(value: ChannelId) -> Self {
        value.0
    }
}

/// Position of the last entry incorporated into a local view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FeedWatermark {
    /// Store-assigned timestamp in epoch milliseconds.
    pub posted_at_ms: i64,
    /// Store-assigned insertion sequence; secondary ordering key.
    pub seq: i64,
}

/// One stored forum message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub seq: i64,
    pub channel: ChannelId,
    pub author: String,
    pub body: String,
    pub posted_at_ms: i64,
}

impl FeedEntry {
    pub fn watermark(&self) -> FeedWatermark {
        FeedWatermark {
            posted_at_ms: self.posted_at_ms,
            seq: self.seq,
        }
    }
}

/// Unsaved message; the store assigns `seq` and timestamp on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedDraft {
    pub author: String,
    pub body: String,
}

impl FeedDraft {
    pub fn new(
        author: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<Self, FeedValidationError> {
        let draft = Self {
            author: author.into(),
            body: body.into(),
        };
        draft.validate()?;
        Ok(draft)
    }

    pub fn validate(&self) -> Result<(), FeedValidationError> {
        if self.author.trim().is_empty() {
            return Err(FeedValidationError::BlankAuthor);
        }
        if self.body.trim().is_empty() {
            return Err(FeedValidationError::BlankBody);
        }
        Ok(())
    }
}

/// Validation errors for feed records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedValidationError {
    BlankChannel,
    BlankAuthor,
    BlankBody,
}

impl Display for FeedValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankChannel => write!(f, "channel id must not be blank"),
            Self::BlankAuthor => write!(f, "feed entry author must not be blank"),
            Self::BlankBody => write!(f, "feed entry body must not be blank"),
        }
    }
}

impl Error for FeedValidationError {}
