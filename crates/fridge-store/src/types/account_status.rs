//! Account status enumeration.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Whether an account may sign in.
///
/// A blocked account keeps its data and roles but cannot obtain new tokens.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
#[derive(Serialize, Deserialize, AsRefStr, Display, EnumIter, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AccountStatus {
    /// The account may sign in.
    #[default]
    Active,
    /// Sign-in is refused until an administrator unblocks the account.
    Blocked,
}

impl AccountStatus {
    /// Returns whether the account may sign in.
    #[inline]
    pub const fn is_active(self) -> bool {
        matches!(self, AccountStatus::Active)
    }

    /// Returns whether the account has been blocked.
    #[inline]
    pub const fn is_blocked(self) -> bool {
        matches!(self, AccountStatus::Blocked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_lowercase() -> anyhow::Result<()> {
        assert_eq!(serde_json::to_string(&AccountStatus::Blocked)?, "\"blocked\"");
        let status: AccountStatus = serde_json::from_str("\"active\"")?;
        assert!(status.is_active());
        assert_eq!("blocked".parse::<AccountStatus>()?, AccountStatus::Blocked);
        assert_eq!(AccountStatus::default(), AccountStatus::Active);
        Ok(())
    }
}
