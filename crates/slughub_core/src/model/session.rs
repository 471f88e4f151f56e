//! Explicit user session context.
//!
//! Every operation that needs a user identity takes a `Session` instead of
//! reading process-wide state.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Username of the owner of a schedule or the author of a post.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    pub fn new(value: impl AsRef<str>) -> Result<Self, SessionError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(SessionError::BlankUser);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for UserId {
    type Error = SessionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

/// Authenticated user context passed into core operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: UserId,
}

impl Session {
    pub fn new(user: UserId) -> Self {
        Self { user }
    }

    /// Shorthand for `Session::new(UserId::new(name)?)`.
    pub fn for_user(name: impl AsRef<str>) -> Result<Self, SessionError> {
        Ok(Self::new(UserId::new(name)?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    BlankUser,
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankUser => write!(f, "session user must not be blank"),
        }
    }
}

impl Error for SessionError {}
