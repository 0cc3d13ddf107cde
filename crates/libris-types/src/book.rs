use serde::{Deserialize, Serialize};

use crate::{
    error::ValidationError,
    patch::Patch,
    validate::{self, ValidationResult},
};

/// Fully validated book data, as handed to the store.
///
/// Obtain it through [`parse_create`] (or by merging an update onto
/// a stored record); the store does not validate again.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookRecord {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub year_published: i32,
    pub isbn: String,
    pub price: Option<f64>,
}

/// Raw request body for both create and update.
///
/// Unknown keys are ignored, type mismatches fail during deserialization.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BookPayload {
    #[serde(default)]
    pub title: Patch<String>,
    #[serde(default)]
    pub author: Patch<String>,
    #[serde(default)]
    pub genre: Patch<String>,
    #[serde(default)]
    pub year_published: Patch<i64>,
    #[serde(default)]
    pub isbn: Patch<String>,
    #[serde(default)]
    pub price: Patch<f64>,
}

fn required<T, U>(
    field: &str,
    value: Patch<T>,
    validator: impl FnOnce(T) -> ValidationResult<U>,
) -> ValidationResult<U> {
    let value = value
        .into_value()
        .ok_or_else(|| ValidationError::required(field))?;
    validator(value)
}

/// Builds a [`BookRecord`] from a create payload.
///
/// Fields are checked in order title, author, genre, year_published, isbn, price
/// and the first failure is returned.
pub fn parse_create(payload: BookPayload) -> ValidationResult<BookRecord> {
    let title = required(validate::TITLE, payload.title, validate::validate_title)?;
    let author = required(validate::AUTHOR, payload.author, validate::validate_author)?;
    let genre = required(validate::GENRE, payload.genre, validate::validate_genre)?;
    let year_published = required(
        validate::YEAR_PUBLISHED,
        payload.year_published,
        validate::validate_year_published,
    )?;
    let isbn = required(validate::ISBN, payload.isbn, validate::validate_isbn)?;
    let price = payload
        .price
        .into_value()
        .map(validate::validate_price)
        .transpose()?;

    Ok(BookRecord {
        title,
        author,
        genre,
        year_published,
        isbn,
        price,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use fake::{faker::lorem::en::Words, faker::name::en::Name, Fake as _};
    use quickcheck::{Arbitrary, Gen};
    use quickcheck_macros::quickcheck;
    use serde_json::json;

    use super::*;

    const FIELDS: [&str; 5] = ["title", "author", "genre", "year_published", "isbn"];

    pub(crate) fn dune() -> serde_json::Value {
        json!({
            "title": "Dune",
            "author": "Herbert",
            "genre": "SciFi",
            "year_published": 1965,
            "isbn": "9780441013593"
        })
    }

    pub(crate) fn payload(value: serde_json::Value) -> BookPayload {
        serde_json::from_value(value).unwrap()
    }

    impl Arbitrary for BookRecord {
        fn arbitrary(g: &mut Gen) -> Self {
            let words: Vec<String> = Words(1..6).fake();
            let digits = b"0123456789";
            let isbn = (0..13)
                .map(|_| *g.choose(digits).unwrap() as char)
                .collect::<String>();
            let price = if bool::arbitrary(g) {
                // exact in binary, survives the JSON round trip
                Some(f64::from(u16::arbitrary(g)) + 0.5)
            } else {
                None
            };
            BookRecord {
                title: words.join(" "),
                author: Name().fake(),
                genre: Words(1..3).fake::<Vec<String>>().join("-"),
                year_published: i32::from(u16::arbitrary(g) % 2025),
                isbn,
                price,
            }
        }
    }

    #[quickcheck]
    fn test_valid_record_parses_to_itself(record: BookRecord) -> bool {
        let value = serde_json::to_value(&record).unwrap();
        parse_create(payload(value)) == Ok(record)
    }

    #[quickcheck]
    fn test_missing_field_is_named(record: BookRecord, which: usize) -> bool {
        let missing = FIELDS[which % FIELDS.len()];
        let mut value = serde_json::to_value(&record).unwrap();
        value.as_object_mut().unwrap().remove(missing);
        match parse_create(payload(value)) {
            Err(e) => e.is_for(missing) && e.reason == "field is required",
            Ok(_) => false,
        }
    }

    #[test]
    fn test_dune() {
        let record = parse_create(payload(dune())).unwrap();
        assert_eq!(record.title, "Dune");
        assert_eq!(record.author, "Herbert");
        assert_eq!(record.genre, "SciFi");
        assert_eq!(record.year_published, 1965);
        assert_eq!(record.isbn, "9780441013593");
        assert_eq!(record.price, None);
    }

    #[test]
    fn test_null_is_missing() {
        let mut value = dune();
        value["genre"] = serde_json::Value::Null;
        let err = parse_create(payload(value)).unwrap_err();
        assert!(err.is_for("genre"));
    }

    #[test]
    fn test_first_failure_wins() {
        let value = json!({
            "title": "",
            "author": "Herbert",
            "genre": "SciFi",
            "year_published": 3000,
            "isbn": "123"
        });
        let err = parse_create(payload(value)).unwrap_err();
        assert!(err.is_for("title"));

        let value = json!({
            "title": "Dune",
            "author": "Herbert",
            "genre": "SciFi",
            "year_published": 3000,
            "isbn": "123"
        });
        let err = parse_create(payload(value)).unwrap_err();
        assert!(err.is_for("year_published"));
    }

    #[test]
    fn test_price() {
        let mut value = dune();
        value["price"] = json!(12.5);
        assert_eq!(parse_create(payload(value.clone())).unwrap().price, Some(12.5));

        value["price"] = json!(null);
        assert_eq!(parse_create(payload(value.clone())).unwrap().price, None);

        value["price"] = json!(-1);
        assert!(parse_create(payload(value)).unwrap_err().is_for("price"));
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let mut value = dune();
        value["id"] = json!(7);
        value["publisher"] = json!("Chilton");
        assert!(parse_create(payload(value)).is_ok());
    }
}
