//! Response envelope parsing.
//!
//! Every JSON response from the platform carries a top-level `status` field;
//! the payload location is endpoint-specific and addressed by JSON pointer.
//! Pure functions only.

use jobprobe_common::{LogicalStatus, pointers};
use serde_json::Value;

use crate::domain::error::EnvelopeError;

/// Result of a call that may be logically rejected by the platform.
///
/// `Rejected` is not an error: the HTTP exchange succeeded but the platform
/// answered with a non-success logical status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiOutcome<T> {
    Success(T),
    Rejected(LogicalStatus),
}

impl<T> ApiOutcome<T> {
    #[must_use]
    pub fn success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Rejected(_) => None,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The logical status this outcome corresponds to.
    #[must_use]
    pub fn status(&self) -> LogicalStatus {
        match self {
            Self::Success(_) => LogicalStatus::success(),
            Self::Rejected(status) => status.clone(),
        }
    }
}

/// A parsed response body with its raw text kept for diagnostics.
#[derive(Debug, Clone)]
pub struct Envelope {
    raw: String,
    root: Value,
}

impl Envelope {
    /// Parse a JSON response body.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid JSON.
    pub fn parse(raw: impl Into<String>) -> Result<Self, EnvelopeError> {
        let raw = raw.into();
        let root = serde_json::from_str(&raw)?;
        Ok(Self { raw, root })
    }

    /// Logical status. A missing or non-string `status` reads as empty,
    /// which is never a success.
    #[must_use]
    pub fn status(&self) -> LogicalStatus {
        LogicalStatus::new(self.text_at(pointers::STATUS).unwrap_or_default())
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status().is_success()
    }

    #[must_use]
    pub fn text_at(&self, pointer: &str) -> Option<&str> {
        self.root.pointer(pointer).and_then(Value::as_str)
    }

    /// Unsigned integer at `pointer`; numeric strings are accepted too.
    #[must_use]
    pub fn count_at(&self, pointer: &str) -> Option<u64> {
        match self.root.pointer(pointer)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Apply `extract` when the envelope is a logical success.
    ///
    /// A success envelope whose payload cannot be extracted is reported as
    /// rejected with the envelope status, so callers never see a success
    /// without a value.
    pub fn outcome<T>(&self, extract: impl FnOnce(&Self) -> Option<T>) -> ApiOutcome<T> {
        let status = self.status();
        if !status.is_success() {
            return ApiOutcome::Rejected(status);
        }
        match extract(self) {
            Some(value) => ApiOutcome::Success(value),
            None => ApiOutcome::Rejected(status),
        }
    }

    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }
}
