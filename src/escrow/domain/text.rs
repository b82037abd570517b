//! Free-form text payloads carried by a task.
//!
//! None of these values influence the state machine. They are validated only
//! so that records stay within the limits the board is configured with.

use super::EscrowDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-empty task title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskTitle(String);

impl TaskTitle {
    /// Creates a trimmed, validated title.
    ///
    /// # Errors
    ///
    /// Returns [`EscrowDomainError::EmptyTitle`] when the title is blank or
    /// [`EscrowDomainError::TitleTooLong`] when it exceeds `max_chars`.
    pub fn new(value: impl Into<String>, max_chars: usize) -> Result<Self, EscrowDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(EscrowDomainError::EmptyTitle);
        }
        let length = normalized.chars().count();
        if length > max_chars {
            return Err(EscrowDomainError::TitleTooLong {
                length,
                max: max_chars,
            });
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the title as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Task description. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskDescription(String);

impl TaskDescription {
    /// Creates a trimmed, validated description.
    ///
    /// # Errors
    ///
    /// Returns [`EscrowDomainError::DescriptionTooLong`] when the description
    /// exceeds `max_chars`.
    pub fn new(value: impl Into<String>, max_chars: usize) -> Result<Self, EscrowDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        let length = normalized.chars().count();
        if length > max_chars {
            return Err(EscrowDomainError::DescriptionTooLong {
                length,
                max: max_chars,
            });
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the description as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Reference to delivered work, typically a content hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProofReference(String);

impl ProofReference {
    /// Creates a trimmed, validated proof reference.
    ///
    /// # Errors
    ///
    /// Returns [`EscrowDomainError::EmptyProof`] when the reference is blank
    /// or [`EscrowDomainError::ProofTooLong`] when it exceeds `max_chars`.
    pub fn new(value: impl Into<String>, max_chars: usize) -> Result<Self, EscrowDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(EscrowDomainError::EmptyProof);
        }
        let length = normalized.chars().count();
        if length > max_chars {
            return Err(EscrowDomainError::ProofTooLong {
                length,
                max: max_chars,
            });
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the reference as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProofReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
