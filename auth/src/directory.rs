//! Principal directory.
//!
//! A fixed username → (password, roles) table, built once at startup and
//! shared read-only (`Arc<UserDirectory>`) by every request.

use crate::credentials::BasicCredentials;
use fluxflix_core::principal::{Principal, Role};
use std::collections::HashMap;

/// One directory entry.
#[derive(Clone)]
pub struct UserRecord {
    password: String,
    roles: Vec<Role>,
}

impl UserRecord {
    /// Granted roles.
    #[must_use]
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }
}

impl std::fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRecord")
            .field("password", &"<redacted>")
            .field("roles", &self.roles)
            .finish()
    }
}

/// Immutable username → roles table.
///
/// # Example
///
/// ```
/// use fluxflix_auth::{BasicCredentials, UserDirectory};
/// use fluxflix_core::principal::Role;
///
/// let directory = UserDirectory::builder()
///     .user("rwinch", "password", [Role::stream()])
///     .build();
///
/// let principal = directory
///     .authenticate(&BasicCredentials::new("rwinch", "password"))
///     .unwrap();
/// assert!(principal.has_role(&Role::stream()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: HashMap<String, UserRecord>,
}

impl UserDirectory {
    /// Start building a directory.
    #[must_use]
    pub fn builder() -> UserDirectoryBuilder {
        UserDirectoryBuilder::default()
    }

    /// The demo table: five users, every password `password`.
    #[must_use]
    pub fn demo() -> Self {
        let both = [Role::admin(), Role::stream()];
        Self::builder()
            .user("sdeleuze", "password", both.clone())
            .user("apoutsma", "password", both.clone())
            .user("rwinch", "password", [Role::stream()])
            .user("mkheck", "password", both)
            .user("jlong", "password", [Role::stream()])
            .build()
    }

    /// Look up a user's record.
    #[must_use]
    pub fn lookup(&self, username: &str) -> Option<&UserRecord> {
        self.users.get(username)
    }

    /// Resolve credentials to a principal.
    ///
    /// Returns `None` for an unknown user or a wrong password. The password
    /// check runs in constant time.
    #[must_use]
    pub fn authenticate(&self, credentials: &BasicCredentials) -> Option<Principal> {
        let Some(record) = self.lookup(&credentials.username) else {
            tracing::debug!(username = %credentials.username, "Unknown user");
            return None;
        };

        if !constant_time_eq::constant_time_eq(
            credentials.password.as_bytes(),
            record.password.as_bytes(),
        ) {
            tracing::debug!(username = %credentials.username, "Password mismatch");
            return None;
        }

        Some(Principal::new(
            credentials.username.clone(),
            record.roles.iter().cloned(),
        ))
    }

    /// Number of users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether the directory has no users.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

/// Builder for [`UserDirectory`].
#[derive(Debug, Default)]
pub struct UserDirectoryBuilder {
    users: HashMap<String, UserRecord>,
}

impl UserDirectoryBuilder {
    /// Add (or replace) a user.
    #[must_use]
    pub fn user(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
        roles: impl IntoIterator<Item = Role>,
    ) -> Self {
        self.users.insert(
            username.into(),
            UserRecord {
                password: password.into(),
                roles: roles.into_iter().collect(),
            },
        );
        self
    }

    /// Freeze the table.
    #[must_use]
    pub fn build(self) -> UserDirectory {
        UserDirectory { users: self.users }
    }
}
