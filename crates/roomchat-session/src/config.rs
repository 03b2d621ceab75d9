//! Session configuration.

use std::fmt;
use std::str::FromStr;

/// What to do when a connection that never joined sends a message or a
/// location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnjoinedPolicy {
    /// Acknowledge with [`SessionError::Unjoined`](crate::SessionError::Unjoined).
    #[default]
    Reject,

    /// Drop the request without any acknowledgement.
    Ignore,
}

/// Returned when parsing an [`UnjoinedPolicy`] from text fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown unjoined policy {0:?}, expected \"reject\" or \"ignore\"")]
pub struct UnknownPolicy(pub String);

impl FromStr for UnjoinedPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "ignore" => Ok(Self::Ignore),
            _ => Err(UnknownPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for UnjoinedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reject => write!(f, "reject"),
            Self::Ignore => write!(f, "ignore"),
        }
    }
}

/// Configuration for session behavior.
///
/// Create one with `SessionConfig::default()` and override the fields you
/// care about.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// How sends from unjoined connections are answered.
    pub unjoined: UnjoinedPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unjoined_policy_default_is_reject() {
        assert_eq!(SessionConfig::default().unjoined, UnjoinedPolicy::Reject);
    }

    #[test]
    fn test_unjoined_policy_from_str_accepts_known_values() {
        assert_eq!("reject".parse(), Ok(UnjoinedPolicy::Reject));
        assert_eq!(" Ignore ".parse(), Ok(UnjoinedPolicy::Ignore));
    }

    #[test]
    fn test_unjoined_policy_from_str_rejects_unknown() {
        let err = "drop".parse::<UnjoinedPolicy>().unwrap_err();
        assert_eq!(err, UnknownPolicy("drop".into()));
        assert!(err.to_string().contains("drop"));
    }

    #[test]
    fn test_unjoined_policy_display_parses_back() {
        for policy in [UnjoinedPolicy::Reject, UnjoinedPolicy::Ignore] {
            assert_eq!(policy.to_string().parse(), Ok(policy));
        }
    }
}
