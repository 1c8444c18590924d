//! Lending policy and its TOML configuration.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Days a loan may run before fines start to accrue
pub const DEFAULT_GRACE_DAYS: u64 = 7;

/// Fine charged per day past the grace period, in currency units
pub const DEFAULT_DAILY_RATE: u64 = 1000;

/// Rules for overdue fines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinePolicy {
    /// Length of the fine-free window after the loan starts
    pub grace_days: u64,
    /// Units charged for every day past the grace deadline
    pub daily_rate: u64,
}

impl Default for FinePolicy {
    fn default() -> Self {
        Self { grace_days: DEFAULT_GRACE_DAYS, daily_rate: DEFAULT_DAILY_RATE }
    }
}

impl FinePolicy {
    /// Last day of the fine-free window, `None` if it falls outside the calendar
    #[must_use]
    pub fn grace_deadline(&self, loan_start: NaiveDate) -> Option<NaiveDate> {
        loan_start.checked_add_days(Days::new(self.grace_days))
    }

    /// Fine owed for a loan that started on `loan_start`, assessed on `as_of`.
    ///
    /// Nothing is owed up to and including the grace deadline; every later day
    /// costs `daily_rate`.
    #[must_use]
    pub fn fine_for(&self, loan_start: NaiveDate, as_of: NaiveDate) -> u64 {
        let Some(deadline) = self.grace_deadline(loan_start) else {
            return 0;
        };
        if as_of <= deadline {
            return 0;
        }
        let days_late =
            u64::try_from(as_of.signed_duration_since(deadline).num_days()).unwrap_or(0);
        days_late.saturating_mul(self.daily_rate)
    }
}

/// Errors raised while loading a [`LibraryConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        /// File that was requested
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid TOML for this schema
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration of a library instance.
///
/// ```toml
/// [fines]
/// grace_days = 7
/// daily_rate = 1000
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Overdue fine rules
    pub fines: FinePolicy,
}

impl LibraryConfig {
    /// Parse a configuration from TOML text; missing keys fall back to defaults
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if the text is not valid TOML for this schema
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Read` if the file cannot be read and
    /// `ConfigError::Parse` if its contents are invalid
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        tracing::debug!(path = %path.display(), "loading library config");
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use std::io::Write;

    use super::*;

    /// Fixed loan start used by the fine tests
    #[allow(clippy::expect_used)]
    fn loan_start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date")
    }

    #[test]
    fn no_fine_within_grace_period() {
        let policy = FinePolicy::default();
        let start = loan_start();

        assert_eq!(policy.fine_for(start, start), 0);
        assert_eq!(policy.fine_for(start, start + Days::new(7)), 0);
    }

    #[test]
    fn fine_accrues_per_day_after_grace() {
        let policy = FinePolicy::default();
        let start = loan_start();

        assert_eq!(policy.fine_for(start, start + Days::new(8)), 1000);
        assert_eq!(policy.fine_for(start, start + Days::new(10)), 3000);
    }

    #[test]
    fn assessing_before_loan_start_is_free() {
        let policy = FinePolicy::default();
        let start = loan_start();

        assert_eq!(policy.fine_for(start, start - Days::new(3)), 0);
    }

    #[test]
    fn partial_config_keeps_defaults() -> Result<(), ConfigError> {
        let config = LibraryConfig::from_toml_str("[fines]\ndaily_rate = 500\n")?;

        assert_eq!(config.fines.grace_days, DEFAULT_GRACE_DAYS);
        assert_eq!(config.fines.daily_rate, 500);
        Ok(())
    }

    #[test]
    fn empty_config_is_default() -> Result<(), ConfigError> {
        assert_eq!(LibraryConfig::from_toml_str("")?, LibraryConfig::default());
        Ok(())
    }

    #[test]
    fn wrong_type_is_a_parse_error() {
        let result = LibraryConfig::from_toml_str("[fines]\ngrace_days = \"a week\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file should be created");
        file.write_all(b"[fines]\ngrace_days = 14\ndaily_rate = 250\n")
            .expect("config should be written");

        let config = LibraryConfig::from_file(file.path()).expect("config should load");
        assert_eq!(config.fines, FinePolicy { grace_days: 14, daily_rate: 250 });
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let result = LibraryConfig::from_file("/definitely/not/here/library.toml");
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
