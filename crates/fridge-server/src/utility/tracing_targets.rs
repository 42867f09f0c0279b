//! Centralized tracing target constants for structured logging.
//!
//! Using consistent targets enables fine-grained control over log output
//! via tracing subscriber filters, e.g. `RUST_LOG=fridge_server::authorization=debug`.

/// Sign-in, sign-up and token issuance.
pub const TRACING_TARGET_AUTHENTICATION: &str = "fridge_server::authentication";

/// Route role checks and token verification on protected requests.
pub const TRACING_TARGET_AUTHORIZATION: &str = "fridge_server::authorization";

/// Account status, role and profile administration.
pub const TRACING_TARGET_ADMINISTRATION: &str = "fridge_server::administration";

/// Error recovery including middleware errors and request failures.
pub const TRACING_TARGET_RECOVERY_ERROR: &str = "fridge_server::recovery::error";

/// Panic recovery including handler panics.
pub const TRACING_TARGET_RECOVERY_PANIC: &str = "fridge_server::recovery::panic";

/// Password hashing and verification operations.
pub const TRACING_TARGET_PASSWORD_HASHER: &str = "fridge_server::password_hasher";

/// Signing key management and JWT encoding.
pub const TRACING_TARGET_SESSION_KEYS: &str = "fridge_server::session_keys";

/// Service state construction and startup bootstrap.
pub const TRACING_TARGET_SERVICE: &str = "fridge_server::service";

/// Request body validation failures.
pub const TRACING_TARGET_VALIDATION: &str = "fridge_server::validation";

/// HTTP error responses.
pub const TRACING_TARGET_HTTP_ERROR: &str = "fridge_server::handler::error";
