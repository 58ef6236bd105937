//! Edit gating derived once from the initial address.

use serde::Serialize;

use super::query::admin_credential;
use crate::projection::params::Field;

/// Whether the session may edit its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    /// View-only: only the view mode may change.
    Locked,
    /// Every field is editable.
    Unlocked,
}

impl Access {
    /// Unlocked only when a credential was provided and equals `secret` exactly.
    ///
    /// An empty secret is honored: `?admin=` unlocks it, a missing key does not.
    ///
    /// # Examples
    ///
    /// ```
    /// use solar_savings::sync::access::Access;
    ///
    /// assert_eq!(Access::from_credential(Some("k"), "k"), Access::Unlocked);
    /// assert_eq!(Access::from_credential(None, ""), Access::Locked);
    /// ```
    pub fn from_credential(provided: Option<&str>, secret: &str) -> Self {
        if provided == Some(secret) {
            Self::Unlocked
        } else {
            Self::Locked
        }
    }

    /// Reads the admin credential from `query` and compares it to `secret`.
    pub fn from_query(query: &str, secret: &str) -> Self {
        Self::from_credential(admin_credential(query).as_deref(), secret)
    }

    /// Whether the session is view-only.
    pub fn is_locked(self) -> bool {
        self == Self::Locked
    }

    /// Whether an edit of `field` is allowed. The view mode is always editable.
    pub fn permits(self, field: Field) -> bool {
        match self {
            Self::Unlocked => true,
            Self::Locked => field == Field::View,
        }
    }
}
