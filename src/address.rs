//! Email address type with optional display name.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An email address with an optional display name.
///
/// # Examples
///
/// ```
/// use herald::Address;
///
/// let addr = Address::new("user@example.com");
/// assert_eq!(addr.email, "user@example.com");
/// assert_eq!(addr.name, None);
///
/// let addr = Address::with_name("Alice", "alice@example.com");
/// assert_eq!(addr.formatted(), "Alice <alice@example.com>");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Optional display name (e.g., "Alice Smith")
    pub name: Option<String>,
    /// Email address (e.g., "alice@example.com")
    pub email: String,
}

impl Address {
    /// Create a new address with just an email.
    ///
    /// Performs a basic sanity check (non-empty, contains @) and logs a
    /// warning if the email looks invalid. Submission addresses go through
    /// [`validate`](crate::validate) before they get here; configured
    /// operator addresses are trusted as-is.
    pub fn new(email: impl Into<String>) -> Self {
        let email = email.into();

        if !Self::basic_sanity_check(&email) {
            tracing::warn!(email = %email, "Creating address with potentially invalid email");
        }

        Self { name: None, email }
    }

    /// Create a new address with a name and email.
    pub fn with_name(name: impl Into<String>, email: impl Into<String>) -> Self {
        let email = email.into();

        if !Self::basic_sanity_check(&email) {
            tracing::warn!(email = %email, "Creating address with potentially invalid email");
        }

        Self {
            name: Some(name.into()),
            email,
        }
    }

    fn basic_sanity_check(email: &str) -> bool {
        !email.is_empty() && email.contains('@')
    }

    /// Format as "Name <email>" or just "email" if no name.
    pub fn formatted(&self) -> String {
        match &self.name {
            Some(name) if name.is_empty() => self.email.clone(),
            Some(name) => format!("{} <{}>", name, self.email),
            None => self.email.clone(),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formatted())
    }
}

impl From<&str> for Address {
    fn from(email: &str) -> Self {
        Self::new(email)
    }
}

impl From<String> for Address {
    fn from(email: String) -> Self {
        Self::new(email)
    }
}

impl From<(&str, &str)> for Address {
    fn from((name, email): (&str, &str)) -> Self {
        Self::with_name(name, email)
    }
}

impl From<(String, String)> for Address {
    fn from((name, email): (String, String)) -> Self {
        Self::with_name(name, email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        let addr: Address = "test@example.com".into();
        assert_eq!(addr.email, "test@example.com");
        assert_eq!(addr.name, None);
    }

    #[test]
    fn test_from_tuple() {
        let addr: Address = ("Alice", "alice@example.com").into();
        assert_eq!(addr.email, "alice@example.com");
        assert_eq!(addr.name, Some("Alice".to_string()));
    }

    #[test]
    fn test_formatted() {
        let addr = Address::new("test@example.com");
        assert_eq!(addr.formatted(), "test@example.com");

        let addr = Address::with_name("Alice", "alice@example.com");
        assert_eq!(addr.formatted(), "Alice <alice@example.com>");
    }

    #[test]
    fn test_formatted_empty_name() {
        let addr = Address::with_name("", "alice@example.com");
        assert_eq!(addr.formatted(), "alice@example.com");
    }

    #[test]
    fn test_display() {
        let addr = Address::with_name("Bob", "bob@example.com");
        assert_eq!(format!("{}", addr), "Bob <bob@example.com>");
    }

    #[test]
    fn test_basic_sanity_check() {
        assert!(Address::basic_sanity_check("user@example.com"));
        assert!(Address::basic_sanity_check("a@b"));
        assert!(!Address::basic_sanity_check(""));
        assert!(!Address::basic_sanity_check("userexample.com"));
    }
}
