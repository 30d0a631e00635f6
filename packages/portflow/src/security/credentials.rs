//! Credentials kept out of logs.

use secrecy::{ExposeSecret, SecretBox};
use std::fmt;

/// An API key or token that never appears in `Debug` or `Display` output.
pub struct SecretString(SecretBox<str>);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretBox::new(value.into().into_boxed_str()))
    }

    /// Read the secret. Call only where the value is sent to a backend.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Parse an optional raw value; blank values count as absent.
    pub fn from_optional(value: Option<String>) -> Option<Self> {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(Self::new)
    }
}

impl Clone for SecretString {
    fn clone(&self) -> Self {
        Self::new(self.expose())
    }
}

impl PartialEq for SecretString {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacted_everywhere() {
        let secret = SecretString::new("sk-live-123");
        assert_eq!(format!("{:?}", secret), "[REDACTED]");
        assert_eq!(format!("{}", secret), "[REDACTED]");
        assert_eq!(secret.expose(), "sk-live-123");
    }

    #[test]
    fn test_blank_values_are_absent() {
        assert!(SecretString::from_optional(None).is_none());
        assert!(SecretString::from_optional(Some("   ".into())).is_none());
        let key = SecretString::from_optional(Some(" anon-key ".into())).unwrap();
        assert_eq!(key.expose(), "anon-key");
    }
}
