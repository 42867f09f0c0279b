//! Account request types.

use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validate_username;
use crate::service::ProfileUpdate;

/// Request payload to update an account profile.
///
/// Omitted fields are left unchanged.
#[must_use]
#[derive(Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfile {
    /// New username.
    #[validate(custom(function = "validate_username"))]
    pub username: Option<String>,

    /// New password (will be hashed before storage).
    #[validate(length(min = 1, max = 128))]
    pub password: Option<String>,
}

impl UpdateProfile {
    /// Converts this request into a service update.
    pub fn into_update(self) -> ProfileUpdate {
        ProfileUpdate {
            username: self.username,
            password: self.password,
        }
    }
}

impl fmt::Debug for UpdateProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateProfile")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_fields_pass_validation() -> anyhow::Result<()> {
        let update: UpdateProfile = serde_json::from_str("{}")?;
        assert!(update.validate().is_ok());
        assert!(update.username.is_none());
        Ok(())
    }

    #[test]
    fn provided_fields_are_validated() -> anyhow::Result<()> {
        let update: UpdateProfile =
            serde_json::from_str(r#"{"username": "a b", "password": ""}"#)?;
        let errors = update.validate().err();

        let fields = errors.map(|e| e.field_errors().len());
        assert_eq!(fields, Some(2));
        Ok(())
    }

    #[test]
    fn debug_redacts_password() {
        let update = UpdateProfile {
            username: None,
            password: Some("hunter2".into()),
        };
        assert!(!format!("{update:?}").contains("hunter2"));
    }
}
