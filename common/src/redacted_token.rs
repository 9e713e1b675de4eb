//! GitHub credential wrapper.
//!
//! The raw value is reachable only through `as_str()` (for the
//! `Authorization` header). Every other way of printing it goes through
//! `mask`, and serializing it is refused.

use crate::{ErrorLocation, RedactError};

use std::fmt;
use std::panic::Location;

use serde::ser::Error;
use zeroize::Zeroize;

/// Number of leading characters `mask` keeps visible.
pub const MASK_PREFIX_LEN: usize = 7;

/// Redaction marker appended by `mask`, or returned alone for short tokens.
pub const MASK_SUFFIX: &str = "***";

/// Safe-to-log form of a token: the first 7 characters plus `***`.
/// Tokens shorter than that are replaced by `***` alone.
pub fn mask(token: &str) -> String {
    if token.chars().count() < MASK_PREFIX_LEN {
        return MASK_SUFFIX.to_string();
    }

    let prefix: String = token.chars().take(MASK_PREFIX_LEN).collect();
    format!("{prefix}{MASK_SUFFIX}")
}

#[derive(Clone, PartialEq, Eq)]
pub struct RedactedToken {
    inner: String,
}

impl RedactedToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            inner: token.into(),
        }
    }

    /// A token from an environment variable or tool input, if it has content.
    ///
    /// Surrounding whitespace (a trailing newline from a `.env` file, say)
    /// is stripped so the value is usable as a header.
    pub fn from_optional(raw: Option<&str>) -> Option<Self> {
        let trimmed = raw?.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self::new(trimmed))
    }

    /// The raw value. Only for the `Authorization` header and format checks.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Prefix-and-marker form for logs, see [`mask`].
    pub fn masked(&self) -> String {
        mask(&self.inner)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl fmt::Debug for RedactedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RedactedToken({})", self.masked())
    }
}

impl fmt::Display for RedactedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

impl Drop for RedactedToken {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}

// Tool results are serialized for agent frameworks; a credential must never ride along.
impl serde::Serialize for RedactedToken {
    fn serialize<S>(&self, _serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        Err(S::Error::custom(RedactError::Serialization {
            message: format!(
                "refusing to serialize GitHub token {}; use as_str() explicitly",
                self.masked()
            ),
            location: ErrorLocation::from(Location::caller()),
        }))
    }
}
