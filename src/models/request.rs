//! Book request model and submission form

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::form::{trim_in_place, FormErrors};

/// A book request as stored in the database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Request {
    pub id: i32,
    /// Username of the member who asked for the book
    pub requester: String,
    pub title: String,
    /// Address the request was submitted from
    #[serde(skip_serializing)]
    pub ip: String,
    pub created: DateTime<Utc>,
}

/// New request form
///
/// `requester` never comes from the submitted body; the handler fills it
/// from the logged-in session user.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NewRequest {
    #[serde(skip)]
    pub requester: String,
    #[serde(default)]
    #[validate(length(max = 255, message = "This field is too long (maximum is 255 characters)"))]
    pub title: String,
    #[serde(skip)]
    pub errors: FormErrors,
}

impl NewRequest {
    /// Check the submitted fields, recording messages for re-display
    pub fn valid(&mut self) -> bool {
        trim_in_place(&mut self.title);

        self.errors.clear();
        self.errors.require(&[
            ("requester", self.requester.as_str()),
            ("title", self.title.as_str()),
        ]);
        let checked = self.validate();
        self.errors.extend_from(checked);
        self.errors.is_empty()
    }
}
