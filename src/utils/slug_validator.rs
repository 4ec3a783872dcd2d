//! Validation rules for user-supplied short codes.
//!
//! The same rules run for interactive availability checks and for allocation,
//! so a code reported as available is always allocatable barring a race.

/// Minimum short code length in characters.
pub const MIN_CODE_LENGTH: usize = 3;

/// Maximum short code length in characters.
pub const MAX_CODE_LENGTH: usize = 50;

/// Codes that collide with application routes or infrastructure names.
///
/// Compared case-insensitively; `Admin` and `ADMIN` are both reserved.
pub const RESERVED_CODES: &[&str] = &[
    "about",
    "account",
    "admin",
    "analytics",
    "api",
    "app",
    "assets",
    "auth",
    "blog",
    "callback",
    "dashboard",
    "docs",
    "edit",
    "favicon",
    "health",
    "help",
    "home",
    "links",
    "login",
    "logout",
    "mail",
    "metrics",
    "new",
    "null",
    "privacy",
    "profile",
    "public",
    "register",
    "reset-password",
    "root",
    "settings",
    "signin",
    "signup",
    "static",
    "stats",
    "status",
    "support",
    "system",
    "terms",
    "undefined",
    "views",
    "www",
];

/// Reason a short code was rejected.
///
/// Display strings are shown verbatim in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SlugError {
    #[error("Custom code must be at least 3 characters")]
    TooShort,

    #[error("Custom code must be at most 50 characters")]
    TooLong,

    #[error("Custom code can only contain letters, numbers, and hyphens")]
    InvalidCharacters,

    #[error("Custom code cannot contain consecutive hyphens")]
    ConsecutiveHyphens,

    #[error("Custom code cannot start or end with a hyphen")]
    HyphenBoundary,

    #[error("This code is reserved")]
    Reserved,
}

impl SlugError {
    /// Stable snake_case identifier used in API error details.
    pub fn kind(&self) -> &'static str {
        match self {
            SlugError::TooShort => "too_short",
            SlugError::TooLong => "too_long",
            SlugError::InvalidCharacters => "invalid_characters",
            SlugError::ConsecutiveHyphens => "consecutive_hyphens",
            SlugError::HyphenBoundary => "hyphen_boundary",
            SlugError::Reserved => "reserved",
        }
    }
}

/// Validates a short code.
///
/// Rules are checked in order and the first failure wins:
///
/// 1. at least [`MIN_CODE_LENGTH`] characters
/// 2. at most [`MAX_CODE_LENGTH`] characters
/// 3. only `[A-Za-z0-9-]`
/// 4. no `--`
/// 5. no leading or trailing `-`
/// 6. not a reserved word (case-insensitive)
///
/// The stored code keeps its original casing; lowercasing happens only for
/// the reserved-word comparison.
///
/// # Examples
///
/// ```
/// use linkfolio::utils::slug_validator::{SlugError, validate_code};
///
/// assert!(validate_code("my-link").is_ok());
/// assert_eq!(validate_code("ab"), Err(SlugError::TooShort));
/// assert_eq!(validate_code("ADMIN"), Err(SlugError::Reserved));
/// ```
pub fn validate_code(code: &str) -> Result<(), SlugError> {
    let length = code.chars().count();

    if length < MIN_CODE_LENGTH {
        return Err(SlugError::TooShort);
    }

    if length > MAX_CODE_LENGTH {
        return Err(SlugError::TooLong);
    }

    if !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(SlugError::InvalidCharacters);
    }

    if code.contains("--") {
        return Err(SlugError::ConsecutiveHyphens);
    }

    if code.starts_with('-') || code.ends_with('-') {
        return Err(SlugError::HyphenBoundary);
    }

    if is_reserved(code) {
        return Err(SlugError::Reserved);
    }

    Ok(())
}

/// Returns true if the code matches a reserved word, ignoring case.
pub fn is_reserved(code: &str) -> bool {
    let lowered = code.to_ascii_lowercase();
    RESERVED_CODES.contains(&lowered.as_str())
}
