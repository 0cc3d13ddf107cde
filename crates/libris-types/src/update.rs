use crate::{
    book::{BookPayload, BookRecord},
    error::ValidationError,
    patch::Patch,
    validate::{self, ValidationResult},
};

/// Validated partial update, carries only the fields that were sent.
///
/// Can only be built by [`parse_update`], so it always changes at least one field.
#[derive(Debug, Clone, PartialEq)]
pub struct BookUpdate {
    title: Option<String>,
    author: Option<String>,
    genre: Option<String>,
    year_published: Option<i32>,
    isbn: Option<String>,
    price: Option<f64>,
}

impl BookUpdate {
    /// Names of the fields this update overwrites.
    pub fn changed_fields(&self) -> Vec<&'static str> {
        [
            (validate::TITLE, self.title.is_some()),
            (validate::AUTHOR, self.author.is_some()),
            (validate::GENRE, self.genre.is_some()),
            (validate::YEAR_PUBLISHED, self.year_published.is_some()),
            (validate::ISBN, self.isbn.is_some()),
            (validate::PRICE, self.price.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, changed)| changed.then_some(name))
        .collect()
    }
}

fn optional<T, U>(
    field: &str,
    value: Patch<T>,
    validator: impl FnOnce(T) -> ValidationResult<U>,
) -> ValidationResult<Option<U>> {
    match value {
        Patch::Absent => Ok(None),
        Patch::Null => Err(ValidationError::new(field, "field cannot be cleared")),
        Patch::Value(v) => validator(v).map(Some),
    }
}

/// Builds a [`BookUpdate`] from an update payload.
///
/// A payload with no field set (all missing or null) is rejected as a whole.
/// Otherwise present fields are validated in the same order as on create.
pub fn parse_update(payload: BookPayload) -> ValidationResult<BookUpdate> {
    let any_set = payload.title.is_value()
        || payload.author.is_value()
        || payload.genre.is_value()
        || payload.year_published.is_value()
        || payload.isbn.is_value()
        || payload.price.is_value();
    if !any_set {
        return Err(ValidationError::payload("at least one field required"));
    }

    Ok(BookUpdate {
        title: optional(validate::TITLE, payload.title, validate::validate_title)?,
        author: optional(validate::AUTHOR, payload.author, validate::validate_author)?,
        genre: optional(validate::GENRE, payload.genre, validate::validate_genre)?,
        year_published: optional(
            validate::YEAR_PUBLISHED,
            payload.year_published,
            validate::validate_year_published,
        )?,
        isbn: optional(validate::ISBN, payload.isbn, validate::validate_isbn)?,
        price: optional(validate::PRICE, payload.price, validate::validate_price)?,
    })
}

/// Overwrites fields of `existing` that are present in `update`.
///
/// `existing` must be the current state of a record known to exist.
pub fn apply_update(existing: BookRecord, update: BookUpdate) -> BookRecord {
    BookRecord {
        title: update.title.unwrap_or(existing.title),
        author: update.author.unwrap_or(existing.author),
        genre: update.genre.unwrap_or(existing.genre),
        year_published: update.year_published.unwrap_or(existing.year_published),
        isbn: update.isbn.unwrap_or(existing.isbn),
        price: update.price.or(existing.price),
    }
}
