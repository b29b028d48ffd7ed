use std::hash::{Hash, Hasher};

use serde::Serialize;
use uuid::Uuid;

use super::validation::{require_non_blank, ValidationError};

/// An operator account.
///
/// Users are identified by email alone; names are descriptive payload.
/// The password never serializes, and there is no `Deserialize` impl, so
/// an account can only come from [`User::new`] or the store.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    id: Option<Uuid>,
    first_name: String,
    last_name: String,
    email: String,
    #[serde(skip_serializing)]
    password: String,
}

impl User {
    /// Creates a user. Names must not be blank, the email must contain an
    /// `@`, and the password needs at least 8 characters including an
    /// uppercase letter.
    pub fn new(
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, ValidationError> {
        require_non_blank("first name", first_name)?;
        require_non_blank("last name", last_name)?;
        require_non_blank("email", email)?;
        if !email.contains('@') {
            return Err(ValidationError::EmailFormat);
        }
        require_non_blank("password", password)?;
        if password.chars().count() < 8 || !password.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(ValidationError::PasswordTooWeak);
        }
        Ok(Self {
            id: None,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        })
    }

    pub fn id(&self) -> Option<Uuid> {
        self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Compares a supplied password against the stored one, ignoring
    /// surrounding whitespace on both sides.
    pub fn matches_password(&self, given: &str) -> bool {
        given.trim() == self.password.trim()
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }

    pub(crate) fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.email == other.email
    }
}

impl Eq for User {}

impl Hash for User {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.email.hash(state);
    }
}
