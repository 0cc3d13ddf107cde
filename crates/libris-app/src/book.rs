//! Book operations on top of any [`BookStore`].
//!
//! Inputs are already parsed, so nothing here touches the store with invalid data.

use libris_dal::{
    book::{SearchFilter, StoredBook},
    BookStore, Error,
};
use libris_types::{apply_update, BookRecord, BookUpdate, ValidationError};
use tracing::debug;

use crate::error::{ApiError, ApiResult};

/// Loads the current record, precondition for every mutation of an existing book.
pub async fn require_existing<S: BookStore>(store: &S, id: i64) -> ApiResult<StoredBook> {
    store.get(id).await?.ok_or_else(|| {
        debug!("Book {id} does not exist");
        Error::RecordNotFound(id).into()
    })
}

pub async fn create_book<S: BookStore>(store: &S, record: BookRecord) -> ApiResult<StoredBook> {
    let book = store.insert(record).await?;
    debug!("Created book {} with ISBN {}", book.id, book.isbn);
    Ok(book)
}

pub async fn update_book<S: BookStore>(
    store: &S,
    id: i64,
    update: BookUpdate,
) -> ApiResult<StoredBook> {
    let existing = require_existing(store, id).await?;
    debug!("Updating fields {:?} of book {id}", update.changed_fields());
    let merged = apply_update(existing.into_record(), update);
    let book = store.update(id, merged).await?;
    Ok(book)
}

pub async fn delete_book<S: BookStore>(store: &S, id: i64) -> ApiResult<()> {
    require_existing(store, id).await?;
    store.delete(id).await?;
    Ok(())
}

pub async fn search_books<S: BookStore>(
    store: &S,
    filter: SearchFilter,
) -> ApiResult<Vec<StoredBook>> {
    if let (Some(min), Some(max)) = (filter.min_price, filter.max_price) {
        if min > max {
            return Err(ApiError::Validation(ValidationError::new(
                "max_price",
                "must not be lower than min_price",
            )));
        }
    }
    let books = store.search(filter).await?;
    Ok(books)
}
