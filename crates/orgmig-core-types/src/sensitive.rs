//! Sensitive data marker for access-token redaction
//!
//! GitHub personal access tokens are read into the configuration at startup
//! and must never reach a log line, the `config` command output or a report.
//! `Sensitive<T>` redacts itself in `Debug`, `Display` and `Serialize`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const REDACTED: &str = "***REDACTED***";

/// Wrapper for a secret value that never prints or serializes its content
///
/// # Example
///
/// ```
/// use orgmig_core_types::Sensitive;
///
/// let pat = Sensitive::new("ghp_example");
/// assert_eq!(format!("{:?}", pat), "***REDACTED***");
/// assert_eq!(pat.expose(), &"ghp_example");
/// ```
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    /// Wrap a sensitive value
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Expose the underlying value
    ///
    /// Only the collector boundary that talks to the GitHub API should call this.
    pub fn expose(&self) -> &T {
        &self.0
    }

    /// Consume the wrapper and return the inner value
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T: Clone> Clone for Sensitive<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Serialize for Sensitive<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(REDACTED)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Sensitive<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Sensitive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensitive_debug_redaction() {
        let secret = Sensitive::new("ghp_0123456789");
        let debug_str = format!("{:?}", secret);
        assert_eq!(debug_str, REDACTED);
        assert!(!debug_str.contains("ghp_"));
    }

    #[test]
    fn test_sensitive_display_redaction() {
        let secret = Sensitive::new("ghp_0123456789");
        assert_eq!(format!("{}", secret), REDACTED);
    }

    #[test]
    fn test_sensitive_serialize_redaction() {
        let secret = Sensitive::new(String::from("ghp_0123456789"));
        let json = serde_json::to_string(&secret).unwrap();
        assert_eq!(json, format!("\"{}\"", REDACTED));
    }

    #[test]
    fn test_sensitive_deserialize_keeps_value() {
        let secret: Sensitive<String> = serde_json::from_str("\"ghp_abc\"").unwrap();
        assert_eq!(secret.expose(), "ghp_abc");
        assert_eq!(secret.into_inner(), "ghp_abc");
    }

    #[test]
    fn test_sensitive_within_struct() {
        #[derive(Debug)]
        #[allow(dead_code)]
        struct Credentials {
            org: String,
            pat: Sensitive<String>,
        }

        let creds = Credentials {
            org: "acme".to_string(),
            pat: Sensitive::new("ghp_secret".to_string()),
        };

        let debug_str = format!("{:?}", creds);
        assert!(debug_str.contains("acme"));
        assert!(debug_str.contains(REDACTED));
        assert!(!debug_str.contains("ghp_secret"));
    }
}
