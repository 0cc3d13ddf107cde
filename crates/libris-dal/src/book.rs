use futures::{StreamExt as _, TryStreamExt as _};
use libris_types::BookRecord;
use serde::{Deserialize, Serialize};
use sqlx::{Pool, QueryBuilder};
use tracing::debug;

use crate::{
    Batch, ChosenDB, ListingParams, MAX_LIMIT,
    error::{Error, Result},
    store::BookStore,
};

const VALID_ORDER_FIELDS: &[&str] = &[
    "id",
    "title",
    "author",
    "genre",
    "year_published",
    "isbn",
    "price",
    "created",
];

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, sqlx::FromRow)]
pub struct StoredBook {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub year_published: i32,
    pub isbn: String,
    pub price: Option<f64>,
    pub is_available: bool,
    pub created: time::PrimitiveDateTime,
}

impl StoredBook {
    pub fn into_record(self) -> BookRecord {
        BookRecord {
            title: self.title,
            author: self.author,
            genre: self.genre,
            year_published: self.year_published,
            isbn: self.isbn,
            price: self.price,
        }
    }
}

/// Conditions for [`BookStore::search`], all given conditions must hold.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    /// Case insensitive substring of title
    pub title: Option<String>,
    /// Case insensitive substring of author
    pub author: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub limit: Option<i64>,
}

pub type BookRepository = BookRepositoryImpl<Pool<ChosenDB>>;

pub struct BookRepositoryImpl<E> {
    executor: E,
}

impl<E> BookRepositoryImpl<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }
}

/// Unicode lowercase, stored next to title and author for searching.
fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

async fn get<'c, E>(id: i64, executor: E) -> Result<Option<StoredBook>>
where
    E: sqlx::Executor<'c, Database = ChosenDB>,
{
    let record = sqlx::query_as::<_, StoredBook>("SELECT * FROM book WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(record)
}

impl BookStore for BookRepository {
    async fn insert(&self, record: BookRecord) -> Result<StoredBook> {
        let result = sqlx::query(
            "INSERT INTO book (title, author, title_folded, author_folded, genre, year_published, isbn, price) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.title)
        .bind(&record.author)
        .bind(fold_case(&record.title))
        .bind(fold_case(&record.author))
        .bind(&record.genre)
        .bind(record.year_published)
        .bind(&record.isbn)
        .bind(record.price)
        .execute(&self.executor)
        .await?;

        let id = result.last_insert_rowid();
        debug!("Inserted book {id}");
        get(id, &self.executor)
            .await?
            .ok_or(Error::RecordNotFound(id))
    }

    async fn get(&self, id: i64) -> Result<Option<StoredBook>> {
        get(id, &self.executor).await
    }

    async fn update(&self, id: i64, record: BookRecord) -> Result<StoredBook> {
        let mut transaction = self.executor.begin().await?;
        let result = sqlx::query(
            "UPDATE book SET title = ?, author = ?, title_folded = ?, author_folded = ?, genre = ?, year_published = ?, isbn = ?, price = ? WHERE id = ?",
        )
        .bind(&record.title)
        .bind(&record.author)
        .bind(fold_case(&record.title))
        .bind(fold_case(&record.author))
        .bind(&record.genre)
        .bind(record.year_published)
        .bind(&record.isbn)
        .bind(record.price)
        .bind(id)
        .execute(&mut *transaction)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::RecordNotFound(id));
        }
        let updated = get(id, &mut *transaction)
            .await?
            .ok_or(Error::RecordNotFound(id))?;
        transaction.commit().await?;
        debug!("Updated book {id}");
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let res = sqlx::query("DELETE FROM book WHERE id = ?")
            .bind(id)
            .execute(&self.executor)
            .await?;

        if res.rows_affected() == 0 {
            Err(Error::RecordNotFound(id))
        } else {
            debug!("Deleted book {id}");
            Ok(())
        }
    }

    async fn list(&self, params: ListingParams) -> Result<Batch<StoredBook>> {
        let order = params.ordering(VALID_ORDER_FIELDS)?;
        let order = if order.is_empty() {
            "ORDER BY id".to_string()
        } else {
            format!("ORDER BY {order}, id")
        };
        let rows = sqlx::query_as::<_, StoredBook>(&format!(
            "SELECT * FROM book {order} LIMIT ? OFFSET ?"
        ))
        .bind(params.limit)
        .bind(params.offset)
        .fetch(&self.executor)
        .take(MAX_LIMIT)
        .try_collect::<Vec<_>>()
        .await?;
        let total = self.count().await?;

        Ok(Batch {
            offset: params.offset,
            limit: params.limit,
            rows,
            total,
        })
    }

    async fn search(&self, filter: SearchFilter) -> Result<Vec<StoredBook>> {
        let mut query = QueryBuilder::<ChosenDB>::new("SELECT * FROM book WHERE 1 = 1");
        if let Some(title) = filter.title {
            query
                .push(" AND instr(title_folded, ")
                .push_bind(fold_case(&title))
                .push(") > 0");
        }
        if let Some(author) = filter.author {
            query
                .push(" AND instr(author_folded, ")
                .push_bind(fold_case(&author))
                .push(") > 0");
        }
        if let Some(min_price) = filter.min_price {
            query.push(" AND price >= ").push_bind(min_price);
        }
        if let Some(max_price) = filter.max_price {
            query.push(" AND price <= ").push_bind(max_price);
        }
        let limit = filter.limit.unwrap_or(MAX_LIMIT as i64).min(MAX_LIMIT as i64);
        query.push(" ORDER BY id LIMIT ").push_bind(limit);

        let records = query
            .build_query_as::<StoredBook>()
            .fetch_all(&self.executor)
            .await?;
        Ok(records)
    }

    async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT count(*) FROM book")
            .fetch_one(&self.executor)
            .await?;
        Ok(count as u64)
    }
}
