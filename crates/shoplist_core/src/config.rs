//! Tunables for the shared-list core.
//!
//! Values deserialize with per-field defaults so hosts can override only what
//! they need.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Default lifetime of a share code: 24 hours.
pub const DEFAULT_SHARE_CODE_TTL_MS: i64 = 24 * 60 * 60 * 1000;
/// Candidates tried before issuance gives up on collisions.
pub const DEFAULT_SHARE_CODE_MAX_ATTEMPTS: u32 = 16;

/// Share-code issuance policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareCodePolicy {
    /// Lifetime of a freshly issued code, in milliseconds.
    pub ttl_ms: i64,
    /// Upper bound on generate-and-insert attempts per issuance.
    pub max_attempts: u32,
}

impl Default for ShareCodePolicy {
    fn default() -> Self {
        Self {
            ttl_ms: DEFAULT_SHARE_CODE_TTL_MS,
            max_attempts: DEFAULT_SHARE_CODE_MAX_ATTEMPTS,
        }
    }
}

impl ShareCodePolicy {
    /// Policy with a lifetime expressed in whole hours.
    pub fn with_ttl_hours(hours: u32) -> Self {
        Self {
            ttl_ms: i64::from(hours) * 60 * 60 * 1000,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ttl_ms <= 0 {
            return Err(ConfigError::NonPositiveTtl(self.ttl_ms));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        Ok(())
    }
}

/// Rejected configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    NonPositiveTtl(i64),
    ZeroAttempts,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveTtl(value) => {
                write!(f, "share code ttl must be positive, got {value} ms")
            }
            Self::ZeroAttempts => write!(f, "share code max_attempts must be at least 1"),
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ShareCodePolicy, DEFAULT_SHARE_CODE_TTL_MS};

    #[test]
    fn default_policy_is_one_day_and_valid() {
        let policy = ShareCodePolicy::default();
        assert_eq!(policy.ttl_ms, DEFAULT_SHARE_CODE_TTL_MS);
        assert_eq!(ShareCodePolicy::with_ttl_hours(24), policy);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let policy: ShareCodePolicy = serde_json::from_str(r#"{"max_attempts": 3}"#)
            .expect("partial policy should deserialize");
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.ttl_ms, DEFAULT_SHARE_CODE_TTL_MS);
    }

    #[test]
    fn validate_rejects_degenerate_values() {
        let expired = ShareCodePolicy {
            ttl_ms: 0,
            ..ShareCodePolicy::default()
        };
        assert_eq!(expired.validate(), Err(ConfigError::NonPositiveTtl(0)));

        let no_attempts = ShareCodePolicy {
            max_attempts: 0,
            ..ShareCodePolicy::default()
        };
        assert_eq!(no_attempts.validate(), Err(ConfigError::ZeroAttempts));
    }
}
