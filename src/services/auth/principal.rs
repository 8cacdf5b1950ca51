//! User record and the principal view handed to authentication consumers.
use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;

/// Opaque user identifier as stored by the record provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Granted authority (role name), kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
pub struct Authority(String);

impl Authority {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// User entity as returned by a record provider.
///
/// The resolver only reads it; ownership and persistence stay with the provider.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub authorities: BTreeSet<Authority>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub locked: bool,
}

fn enabled_by_default() -> bool {
    true
}

// Hand-written so the credential hash never reaches logs.
impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("authorities", &self.authorities)
            .field("enabled", &self.enabled)
            .field("locked", &self.locked)
            .finish()
    }
}

/// Authenticated-identity view over a [`UserRecord`].
///
/// - Only constructible from an owned record, so an absent record can never
///   become a principal.
/// - Built fresh for every lookup; nothing caches it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    record: UserRecord,
}

impl Principal {
    pub fn id(&self) -> &UserId {
        &self.record.id
    }

    /// Login name; the email address the record was found by.
    pub fn username(&self) -> &str {
        &self.record.email
    }

    pub fn password_hash(&self) -> &str {
        &self.record.password_hash
    }

    pub fn authorities(&self) -> &BTreeSet<Authority> {
        &self.record.authorities
    }

    pub fn is_enabled(&self) -> bool {
        self.record.enabled
    }

    pub fn is_account_non_locked(&self) -> bool {
        !self.record.locked
    }
}

impl From<UserRecord> for Principal {
    fn from(record: UserRecord) -> Self {
        Self { record }
    }
}
