use thiserror::Error;

/// Rejection raised by a domain constructor or a `with_*` update.
///
/// A value of a model type only ever exists in a fully valid state; any
/// attempt to construct or update one with bad data fails with one of
/// these variants before the value becomes visible.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} cannot be null or empty")]
    Blank { field: &'static str },
    #[error("year founded must be a positive number")]
    YearFounded,
    #[error("{field} must be between 1 and 200000 kg")]
    MassOutOfRange { field: &'static str },
    #[error("price cannot be negative")]
    NegativePrice,
    #[error("email must contain an @")]
    EmailFormat,
    #[error("password must be at least 8 characters with an uppercase letter")]
    PasswordTooWeak,
}

/// Rejects strings that are empty or whitespace-only. The value itself is
/// stored as given; only the check trims.
pub(crate) fn require_non_blank(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Blank { field });
    }
    Ok(())
}
