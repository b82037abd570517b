//! Runtime configuration for the escrow service.
//!
//! Every setting has a default. [`EscrowConfig::from_env`] overlays values
//! from `BOUNTYBOARD_*` environment variables.

use std::env;
use std::str::FromStr;

use thiserror::Error;

use super::domain::{AccountId, EscrowDomainError};

/// Board name used to derive the default custody account.
pub const DEFAULT_BOARD_NAME: &str = "bountyboard";
/// Default maximum title length in characters.
pub const DEFAULT_MAX_TITLE_CHARS: usize = 100;
/// Default maximum description length in characters.
pub const DEFAULT_MAX_DESCRIPTION_CHARS: usize = 300;
/// Default maximum proof reference length in characters.
pub const DEFAULT_MAX_PROOF_CHARS: usize = 128;

/// Environment variable naming the custody account explicitly.
pub const CUSTODY_ACCOUNT_ENV: &str = "BOUNTYBOARD_CUSTODY_ACCOUNT";
/// Environment variable naming the board the custody account derives from.
pub const BOARD_NAME_ENV: &str = "BOUNTYBOARD_BOARD_NAME";
/// Environment variable overriding the title limit.
pub const MAX_TITLE_CHARS_ENV: &str = "BOUNTYBOARD_MAX_TITLE_CHARS";
/// Environment variable overriding the description limit.
pub const MAX_DESCRIPTION_CHARS_ENV: &str = "BOUNTYBOARD_MAX_DESCRIPTION_CHARS";
/// Environment variable overriding the proof limit.
pub const MAX_PROOF_CHARS_ENV: &str = "BOUNTYBOARD_MAX_PROOF_CHARS";
/// Environment variable toggling past-deadline rejection.
pub const REJECT_PAST_DEADLINES_ENV: &str = "BOUNTYBOARD_REJECT_PAST_DEADLINES";

/// Errors raised while loading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A variable holds a value that cannot be parsed.
    #[error("invalid value {value:?} for {key}")]
    InvalidValue {
        /// Variable name.
        key: &'static str,
        /// Raw value.
        value: String,
    },

    /// The configured custody account is malformed.
    #[error("invalid custody account: {0}")]
    InvalidCustody(#[source] EscrowDomainError),
}

/// Escrow service settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscrowConfig {
    custody_account: AccountId,
    max_title_chars: usize,
    max_description_chars: usize,
    max_proof_chars: usize,
    reject_past_deadlines: bool,
}

impl Default for EscrowConfig {
    fn default() -> Self {
        Self {
            custody_account: AccountId::custody_for(DEFAULT_BOARD_NAME),
            max_title_chars: DEFAULT_MAX_TITLE_CHARS,
            max_description_chars: DEFAULT_MAX_DESCRIPTION_CHARS,
            max_proof_chars: DEFAULT_MAX_PROOF_CHARS,
            reject_past_deadlines: false,
        }
    }
}

impl EscrowConfig {
    /// Default settings with past-dated deadlines refused at creation.
    #[must_use]
    pub fn strict() -> Self {
        Self::default().with_reject_past_deadlines(true)
    }

    /// Loads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads settings through `lookup`, which maps a variable name to its
    /// value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is set to an unusable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let custody_account = match (lookup(CUSTODY_ACCOUNT_ENV), lookup(BOARD_NAME_ENV)) {
            (Some(account), _) => AccountId::new(account).map_err(ConfigError::InvalidCustody)?,
            (None, Some(board)) => AccountId::custody_for(&board),
            (None, None) => defaults.custody_account,
        };

        Ok(Self {
            custody_account,
            max_title_chars: parse_or(&lookup, MAX_TITLE_CHARS_ENV, defaults.max_title_chars)?,
            max_description_chars: parse_or(
                &lookup,
                MAX_DESCRIPTION_CHARS_ENV,
                defaults.max_description_chars,
            )?,
            max_proof_chars: parse_or(&lookup, MAX_PROOF_CHARS_ENV, defaults.max_proof_chars)?,
            reject_past_deadlines: parse_or(
                &lookup,
                REJECT_PAST_DEADLINES_ENV,
                defaults.reject_past_deadlines,
            )?,
        })
    }

    /// Sets the custody account.
    #[must_use]
    pub fn with_custody_account(mut self, custody_account: AccountId) -> Self {
        self.custody_account = custody_account;
        self
    }

    /// Sets the title limit.
    #[must_use]
    pub const fn with_max_title_chars(mut self, max: usize) -> Self {
        self.max_title_chars = max;
        self
    }

    /// Sets the description limit.
    #[must_use]
    pub const fn with_max_description_chars(mut self, max: usize) -> Self {
        self.max_description_chars = max;
        self
    }

    /// Sets the proof limit.
    #[must_use]
    pub const fn with_max_proof_chars(mut self, max: usize) -> Self {
        self.max_proof_chars = max;
        self
    }

    /// Sets whether past-dated deadlines are refused at creation.
    #[must_use]
    pub const fn with_reject_past_deadlines(mut self, reject: bool) -> Self {
        self.reject_past_deadlines = reject;
        self
    }

    /// Returns the custody account.
    #[must_use]
    pub const fn custody_account(&self) -> &AccountId {
        &self.custody_account
    }

    /// Returns the title limit.
    #[must_use]
    pub const fn max_title_chars(&self) -> usize {
        self.max_title_chars
    }

    /// Returns the description limit.
    #[must_use]
    pub const fn max_description_chars(&self) -> usize {
        self.max_description_chars
    }

    /// Returns the proof limit.
    #[must_use]
    pub const fn max_proof_chars(&self) -> usize {
        self.max_proof_chars
    }

    /// Returns whether past-dated deadlines are refused at creation.
    #[must_use]
    pub const fn reject_past_deadlines(&self) -> bool {
        self.reject_past_deadlines
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
    }
}
