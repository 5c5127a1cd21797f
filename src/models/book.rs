//! Book catalog model and upload/edit form

use std::str::FromStr;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::form::{trim_in_place, FormErrors};

static VOLUME_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid volume id pattern"));
static ISBN10_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{9}[0-9Xx]$").expect("valid isbn10 pattern"));
static ISBN13_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{13}$").expect("valid isbn13 pattern"));

/// Book record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: i32,
    /// External catalog key, used in every URL
    pub volume_id: String,
    pub title: String,
    pub subtitle: String,
    pub publisher: String,
    pub published_date: String,
    pub page_count: i32,
    pub maturity_rating: String,
    /// Comma separated
    pub authors: String,
    /// Comma separated
    pub categories: String,
    pub description: String,
    /// Username of the member who uploaded the book
    pub uploader: String,
    pub price: Decimal,
    pub isbn10: String,
    pub isbn13: String,
    pub image_link: String,
    pub downloads: i32,
    pub created: DateTime<Utc>,
}

/// Upload and edit form for books
///
/// Numeric fields stay as submitted text until `valid()` accepts them, so a
/// typo is reported next to the field instead of rejecting the whole body.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct NewBook {
    #[validate(length(max = 64, message = "This field is too long (maximum is 64 characters)"))]
    pub volume_id: String,
    #[validate(length(max = 500, message = "This field is too long (maximum is 500 characters)"))]
    pub title: String,
    pub subtitle: String,
    pub publisher: String,
    pub published_date: String,
    pub page_count: String,
    pub maturity_rating: String,
    pub authors: String,
    pub categories: String,
    pub description: String,
    #[serde(skip)]
    pub uploader: String,
    pub price: String,
    pub isbn10: String,
    pub isbn13: String,
    pub image_link: String,
    #[serde(skip)]
    pub errors: FormErrors,
}

impl NewBook {
    pub fn valid(&mut self) -> bool {
        for field in [
            &mut self.volume_id,
            &mut self.title,
            &mut self.subtitle,
            &mut self.publisher,
            &mut self.published_date,
            &mut self.page_count,
            &mut self.maturity_rating,
            &mut self.authors,
            &mut self.categories,
            &mut self.description,
            &mut self.price,
            &mut self.isbn10,
            &mut self.isbn13,
            &mut self.image_link,
        ] {
            trim_in_place(field);
        }

        self.errors.clear();
        self.errors.require(&[
            ("volume_id", self.volume_id.as_str()),
            ("title", self.title.as_str()),
            ("uploader", self.uploader.as_str()),
        ]);

        if !self.volume_id.is_empty() && !VOLUME_ID_RE.is_match(&self.volume_id) {
            self.errors.add(
                "volume_id",
                "This field may only contain letters, digits, '-' and '_'",
            );
        }
        if !self.page_count.is_empty()
            && !matches!(self.page_count.parse::<i32>(), Ok(n) if n >= 0)
        {
            self.errors
                .add("page_count", "This field must be a whole number of pages");
        }
        if !self.price.is_empty() {
            match Decimal::from_str(&self.price) {
                Ok(p) if p.is_sign_negative() => {
                    self.errors.add("price", "This field must be a positive amount")
                }
                Ok(p) if p.normalize().scale() > 2 => {
                    self.errors.add("price", "This field may have at most 2 decimal places")
                }
                // Stored as NUMERIC(10, 2)
                Ok(p) if p >= Decimal::new(100_000_000, 0) => {
                    self.errors.add("price", "This field must be less than 100000000")
                }
                Ok(_) => {}
                Err(_) => self.errors.add("price", "This field must be a positive amount"),
            }
        }
        if !self.isbn10.is_empty() && !ISBN10_RE.is_match(&self.isbn10) {
            self.errors.add("isbn10", "ISBN-10 must be 10 characters");
        }
        if !self.isbn13.is_empty() && !ISBN13_RE.is_match(&self.isbn13) {
            self.errors.add("isbn13", "ISBN-13 must be 13 digits");
        }

        if !self.image_link.is_empty()
            && !(self.image_link.starts_with("http://") || self.image_link.starts_with("https://"))
        {
            self.errors.add("image_link", "This field must be an http(s) link");
        }

        let checked = self.validate();
        self.errors.extend_from(checked);

        self.errors.is_empty()
    }

    /// Page count after validation; blank means zero
    pub fn page_count_value(&self) -> i32 {
        self.page_count.parse().unwrap_or(0)
    }

    /// Price after validation; blank means free
    pub fn price_value(&self) -> Decimal {
        Decimal::from_str(&self.price).unwrap_or(Decimal::ZERO)
    }
}

impl From<&Book> for NewBook {
    fn from(book: &Book) -> Self {
        Self {
            volume_id: book.volume_id.clone(),
            title: book.title.clone(),
            subtitle: book.subtitle.clone(),
            publisher: book.publisher.clone(),
            published_date: book.published_date.clone(),
            page_count: book.page_count.to_string(),
            maturity_rating: book.maturity_rating.clone(),
            authors: book.authors.clone(),
            categories: book.categories.clone(),
            description: book.description.clone(),
            uploader: book.uploader.clone(),
            price: book.price.to_string(),
            isbn10: book.isbn10.clone(),
            isbn13: book.isbn13.clone(),
            image_link: book.image_link.clone(),
            errors: FormErrors::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::form::BLANK_FIELD;

    fn book_form() -> NewBook {
        NewBook {
            volume_id: "zyTCAlFPjgYC".to_string(),
            title: "The Google Story".to_string(),
            authors: "David A. Vise, Mark Malseed".to_string(),
            page_count: "207".to_string(),
            price: "12.50".to_string(),
            isbn10: "055380457X".to_string(),
            isbn13: "9780553804577".to_string(),
            image_link: "http://books.google.com/books/content?id=zyTCAlFPjgYC".to_string(),
            uploader: "alice".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_book() {
        let mut form = book_form();
        assert!(form.valid(), "{:?}", form.errors);
        assert_eq!(form.page_count_value(), 207);
        assert_eq!(form.price_value(), Decimal::new(1250, 2));
    }

    #[test]
    fn test_optional_fields_may_be_blank() {
        let mut form = NewBook {
            volume_id: "abc_123".to_string(),
            title: "Untitled".to_string(),
            uploader: "alice".to_string(),
            ..Default::default()
        };
        assert!(form.valid(), "{:?}", form.errors);
        assert_eq!(form.page_count_value(), 0);
        assert_eq!(form.price_value(), Decimal::ZERO);
    }

    #[test]
    fn test_required_fields() {
        let mut form = NewBook::default();
        assert!(!form.valid());
        assert_eq!(form.errors.get("volume_id"), Some(BLANK_FIELD));
        assert_eq!(form.errors.get("title"), Some(BLANK_FIELD));
        assert_eq!(form.errors.get("uploader"), Some(BLANK_FIELD));
    }

    #[test]
    fn test_volume_id_characters() {
        let mut form = book_form();
        form.volume_id = "../etc/passwd".to_string();
        assert!(!form.valid());
        assert!(form.errors.get("volume_id").is_some());
    }

    #[test]
    fn test_numeric_fields() {
        let mut form = book_form();
        form.page_count = "many".to_string();
        form.price = "-3".to_string();
        assert!(!form.valid());
        assert!(form.errors.get("page_count").is_some());
        assert!(form.errors.get("price").is_some());
    }

    #[test]
    fn test_price_must_fit_the_stored_precision() {
        let mut form = book_form();
        form.price = "123456789012".to_string();
        assert!(!form.valid());
        assert_eq!(
            form.errors.get("price"),
            Some("This field must be less than 100000000")
        );

        form.price = "0.004".to_string();
        assert!(!form.valid());
        assert_eq!(
            form.errors.get("price"),
            Some("This field may have at most 2 decimal places")
        );
    }

    #[test]
    fn test_price_limits_that_still_fit() {
        let mut form = book_form();
        form.price = "99999999.99".to_string();
        assert!(form.valid(), "{:?}", form.errors);

        // Trailing zeros do not count as extra precision
        form.price = "4.500".to_string();
        assert!(form.valid(), "{:?}", form.errors);
        assert_eq!(form.price_value(), Decimal::new(45, 1));
    }

    #[test]
    fn test_isbn_formats() {
        let mut form = book_form();
        form.isbn10 = "12345".to_string();
        form.isbn13 = "978055380457X".to_string();
        assert!(!form.valid());
        assert!(form.errors.get("isbn10").is_some());
        assert!(form.errors.get("isbn13").is_some());
    }

    #[test]
    fn test_bad_image_link() {
        let mut form = book_form();
        form.image_link = "not a url".to_string();
        assert!(!form.valid());
        assert!(form.errors.get("image_link").is_some());
    }
}
