//! Validated JSON extractor.
//!
//! [`ValidateJson`] deserializes the body like [`Json`] and then runs the
//! `validator` rules of the target type. Failures become a `400` response whose
//! `errors` map lists messages per field.

use std::borrow::Cow;
use std::collections::HashMap;

use axum::extract::{FromRequest, Request};
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError, ValidationErrors};

use super::Json;
use crate::handler::{Error, ErrorKind};
use crate::utility::tracing_targets::TRACING_TARGET_VALIDATION;

/// JSON extractor with automatic validation using the `validator` crate.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct ValidateJson<T>(pub T);

impl<T> ValidateJson<T> {
    /// Creates a new instance of [`ValidateJson`].
    #[inline]
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Returns the inner validated value.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequest<S> for ValidateJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = <Json<T> as FromRequest<S>>::from_request(req, state).await?;

        data.validate()?;
        Ok(Self::new(data))
    }
}

/// Formats length validation errors.
fn format_length_error(params: &HashMap<Cow<'static, str>, serde_json::Value>) -> String {
    let number = |key: &str| params.get(key).and_then(serde_json::Value::as_u64);

    match (number("min"), number("max")) {
        (Some(min), Some(max)) => format!("must be between {min} and {max} characters long"),
        (Some(min), None) => format!("must be at least {min} characters long"),
        (None, Some(max)) => format!("must be at most {max} characters long"),
        _ => "has invalid length".to_owned(),
    }
}

/// Formats a validation error, preferring the rule's own message.
fn format_validation_error(field: &str, error: &ValidationError) -> String {
    if let Some(custom_message) = &error.message {
        return custom_message.to_string();
    }

    let message = match error.code.as_ref() {
        "required" => "is required and cannot be empty".to_owned(),
        "length" => format_length_error(&error.params),
        code => format!("failed validation: {code}"),
    };

    format!("Field '{field}' {message}")
}

impl From<ValidationErrors> for Error<'static> {
    fn from(errors: ValidationErrors) -> Self {
        tracing::debug!(
            target: TRACING_TARGET_VALIDATION,
            fields = errors.field_errors().len(),
            "request validation failed"
        );

        errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, field_errors)| {
                field_errors
                    .iter()
                    .map(move |error| (field.to_string(), format_validation_error(&field, error)))
            })
            .fold(
                ErrorKind::BadRequest
                    .with_message("Validation failed")
                    .with_resource("request"),
                |error, (field, message)| error.with_field(field, message),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::request::validation_error;

    #[test]
    fn validation_errors_become_field_messages() {
        let mut errors = ValidationErrors::new();
        errors.add("username", validation_error("username_length", "Username is too short"));
        errors.add("password", ValidationError::new("length").with_message(Cow::Borrowed("Password is too long")));

        let error = Error::from(errors);
        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert_eq!(
            error.field("username").and_then(|m| m.first()).map(AsRef::as_ref),
            Some("Username is too short")
        );
        assert!(error.field("password").is_some());
    }

    #[test]
    fn length_errors_mention_bounds() {
        let mut error = ValidationError::new("length");
        error.add_param(Cow::Borrowed("min"), &1);
        error.add_param(Cow::Borrowed("max"), &128);

        let message = format_validation_error("password", &error);
        assert_eq!(message, "Field 'password' must be between 1 and 128 characters long");
    }
}
