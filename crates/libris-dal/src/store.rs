use std::future::Future;

use libris_types::BookRecord;

use crate::{
    Batch, ListingParams,
    book::{SearchFilter, StoredBook},
    error::Result,
};

/// Persistence of books, keyed by the store assigned integer id.
///
/// Records passed in are already validated.
pub trait BookStore {
    /// Fails with `Conflict` when the ISBN is already stored.
    fn insert(&self, record: BookRecord) -> impl Future<Output = Result<StoredBook>> + Send;

    fn get(&self, id: i64) -> impl Future<Output = Result<Option<StoredBook>>> + Send;

    /// Replaces all record fields, fails with `RecordNotFound` if there is no such id.
    fn update(
        &self,
        id: i64,
        record: BookRecord,
    ) -> impl Future<Output = Result<StoredBook>> + Send;

    /// Fails with `RecordNotFound` if there is no such id.
    fn delete(&self, id: i64) -> impl Future<Output = Result<()>> + Send;

    fn list(&self, params: ListingParams)
    -> impl Future<Output = Result<Batch<StoredBook>>> + Send;

    fn search(&self, filter: SearchFilter) -> impl Future<Output = Result<Vec<StoredBook>>> + Send;

    fn count(&self) -> impl Future<Output = Result<u64>> + Send;
}
