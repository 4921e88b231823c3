//! Authenticated identities and the roles granted to them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A granted role name.
///
/// Role names compare case-insensitively: `Stream` grants the same access
/// as `stream`.
///
/// # Examples
///
/// ```
/// use fluxflix_core::principal::Role;
///
/// let role = Role::new("STREAM");
/// assert!(role.matches("stream"));
/// assert_eq!(role, Role::stream());
/// ```
#[derive(Clone, Debug, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    /// Administrative role. Modeled but grants nothing extra today.
    pub const ADMIN: &'static str = "admin";

    /// Role required to read the catalog and watch event streams.
    pub const STREAM: &'static str = "stream";

    /// Create a role from its name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The `admin` role.
    #[must_use]
    pub fn admin() -> Self {
        Self::new(Self::ADMIN)
    }

    /// The `stream` role.
    #[must_use]
    pub fn stream() -> Self {
        Self::new(Self::STREAM)
    }

    /// Role name as given.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison against a role name.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.0.eq_ignore_ascii_case(name)
    }
}

impl PartialEq for Role {
    fn eq(&self, other: &Self) -> bool {
        self.matches(&other.0)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// An authenticated identity with its granted roles.
///
/// Principals are resolved from request credentials by the user directory
/// and are immutable for the lifetime of the process.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Login name.
    pub username: String,
    /// Granted roles, in the order they were configured.
    pub roles: Vec<Role>,
}

impl Principal {
    /// Create a principal.
    #[must_use]
    pub fn new(username: impl Into<String>, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            username: username.into(),
            roles: roles.into_iter().collect(),
        }
    }

    /// Whether any granted role matches `role`, ignoring case.
    #[must_use]
    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.iter().any(|granted| granted.matches(role.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn has_role_ignores_case() {
        let principal = Principal::new("rwinch", [Role::new("Stream")]);
        assert!(principal.has_role(&Role::stream()));
        assert!(!principal.has_role(&Role::admin()));
    }

    #[test]
    fn principal_without_roles_has_none() {
        let principal = Principal::new("nobody", []);
        assert!(!principal.has_role(&Role::stream()));
    }

    proptest! {
        #[test]
        fn role_equality_is_case_insensitive(name in "[a-zA-Z]{1,16}") {
            let lower = Role::new(name.to_ascii_lowercase());
            let upper = Role::new(name.to_ascii_uppercase());
            prop_assert_eq!(lower, upper);
        }
    }
}
