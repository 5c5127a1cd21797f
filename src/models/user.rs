//! User model, session identity and account forms

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::form::{trim_in_place, FormErrors};

/// Full user model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: String,
    pub created: DateTime<Utc>,
}

/// Identity kept in the session once a user has logged in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub username: String,
    pub email: String,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

/// Signup form
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NewUser {
    #[serde(default)]
    #[validate(length(max = 50, message = "This field is too long (maximum is 50 characters)"))]
    pub username: String,
    #[serde(default)]
    #[validate(
        email(message = "This field must be a valid email address"),
        length(max = 255, message = "This field is too long (maximum is 255 characters)")
    )]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 6, message = "This field is too short (minimum is 6 characters)"))]
    pub password: String,
    #[serde(skip)]
    pub errors: FormErrors,
}

impl NewUser {
    pub fn valid(&mut self) -> bool {
        trim_in_place(&mut self.username);
        trim_in_place(&mut self.email);

        self.errors.clear();
        self.errors.require(&[
            ("username", self.username.as_str()),
            ("email", self.email.as_str()),
            ("password", self.password.as_str()),
        ]);
        let checked = self.validate();
        self.errors.extend_from(checked);
        self.errors.is_empty()
    }

    /// Drop the password before the form is shown again
    pub fn redacted(mut self) -> Self {
        self.password.clear();
        self
    }
}

/// Login form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}
