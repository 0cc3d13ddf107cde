//! Single field validators for the book resource.
//!
//! Every validator takes the raw value and returns the normalized value,
//! or a [`ValidationError`] naming the field.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ValidationError;

pub const TITLE: &str = "title";
pub const AUTHOR: &str = "author";
pub const GENRE: &str = "genre";
pub const YEAR_PUBLISHED: &str = "year_published";
pub const ISBN: &str = "isbn";
pub const PRICE: &str = "price";

pub const MAX_TITLE_LEN: usize = 255;
pub const MAX_AUTHOR_LEN: usize = 255;
pub const MAX_GENRE_LEN: usize = 100;
pub const MIN_YEAR: i64 = 0;
pub const MAX_YEAR: i64 = 2024;

lazy_static! {
    // ASCII only, \d would also accept other unicode digits
    static ref ISBN_RE: Regex = Regex::new(r"^[0-9]{13}$").unwrap();
}

pub type ValidationResult<T> = Result<T, ValidationError>;

fn bounded_text(field: &str, value: String, max_len: usize) -> ValidationResult<String> {
    if value.is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    if value.chars().count() > max_len {
        return Err(ValidationError::new(
            field,
            format!("must be at most {max_len} characters"),
        ));
    }
    Ok(value)
}

pub fn validate_title(value: String) -> ValidationResult<String> {
    bounded_text(TITLE, value, MAX_TITLE_LEN)
}

pub fn validate_author(value: String) -> ValidationResult<String> {
    bounded_text(AUTHOR, value, MAX_AUTHOR_LEN)
}

pub fn validate_genre(value: String) -> ValidationResult<String> {
    bounded_text(GENRE, value, MAX_GENRE_LEN)
}

pub fn validate_year_published(value: i64) -> ValidationResult<i32> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&value) {
        return Err(ValidationError::new(
            YEAR_PUBLISHED,
            format!("must be between {MIN_YEAR} and {MAX_YEAR}"),
        ));
    }
    // range above fits into i32
    Ok(value as i32)
}

pub fn validate_isbn(value: String) -> ValidationResult<String> {
    if !ISBN_RE.is_match(&value) {
        return Err(ValidationError::new(
            ISBN,
            "must be exactly 13 digits, e.g. 9780743273565",
        ));
    }
    Ok(value)
}

pub fn validate_price(value: f64) -> ValidationResult<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::new(PRICE, "must be a positive number"));
    }
    Ok(value)
}
