use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Json,
};
use axum_valid::Garde;
use garde::Validate;
use http::StatusCode;
use libris_dal::{
    book::{BookRepository, SearchFilter},
    BookStore as _,
};
use libris_types::{BookRecord, BookUpdate};
use serde::Deserialize;

use crate::{
    book,
    error::ApiResult,
    rest_api::{Page, Paging},
    state::AppState,
    validate::Parsed,
};

crate::repository_from_request!(BookRepository);

const DEFAULT_SEARCH_LIMIT: i64 = 100;

#[derive(Debug, Clone, Validate, Deserialize)]
pub struct SearchQuery {
    #[garde(length(min = 1, max = 255))]
    title: Option<String>,
    #[garde(length(min = 1, max = 255))]
    author: Option<String>,
    #[garde(range(min = 0.0), custom(finite))]
    min_price: Option<f64>,
    #[garde(range(min = 0.0), custom(finite))]
    max_price: Option<f64>,
    #[garde(range(min = 1, max = 1000))]
    limit: Option<i64>,
}

fn finite(value: &Option<f64>, _context: &()) -> garde::Result {
    match value {
        Some(v) if !v.is_finite() => Err(garde::Error::new("must be a finite number")),
        _ => Ok(()),
    }
}

impl From<SearchQuery> for SearchFilter {
    fn from(query: SearchQuery) -> Self {
        SearchFilter {
            title: query.title,
            author: query.author,
            min_price: query.min_price,
            max_price: query.max_price,
            limit: Some(query.limit.unwrap_or(DEFAULT_SEARCH_LIMIT)),
        }
    }
}

pub async fn create(
    repository: BookRepository,
    Parsed(record): Parsed<BookRecord>,
) -> ApiResult<impl IntoResponse> {
    let book = book::create_book(&repository, record).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

pub async fn list(
    repository: BookRepository,
    State(state): State<AppState>,
    Garde(Query(paging)): Garde<Query<Paging>>,
) -> ApiResult<impl IntoResponse> {
    let default_page_size: u32 = state.config().default_page_size;
    let page_size = paging.page_size(default_page_size);
    let listing_params = paging.into_listing_params(default_page_size)?;
    let batch = repository.list(listing_params).await?;
    Ok((StatusCode::OK, Json(Page::from_batch(batch, page_size)?)))
}

pub async fn count(repository: BookRepository) -> ApiResult<impl IntoResponse> {
    let count = repository.count().await?;
    Ok((StatusCode::OK, Json(count)))
}

pub async fn search(
    repository: BookRepository,
    Garde(Query(query)): Garde<Query<SearchQuery>>,
) -> ApiResult<impl IntoResponse> {
    let books = book::search_books(&repository, query.into()).await?;
    Ok((StatusCode::OK, Json(books)))
}

pub async fn get_one(
    Path(id): Path<i64>,
    repository: BookRepository,
) -> ApiResult<impl IntoResponse> {
    let record = book::require_existing(&repository, id).await?;
    Ok((StatusCode::OK, Json(record)))
}

pub async fn update(
    Path(id): Path<i64>,
    repository: BookRepository,
    Parsed(update): Parsed<BookUpdate>,
) -> ApiResult<impl IntoResponse> {
    let record = book::update_book(&repository, id, update).await?;
    Ok((StatusCode::OK, Json(record)))
}

pub async fn delete(
    Path(id): Path<i64>,
    repository: BookRepository,
) -> ApiResult<impl IntoResponse> {
    book::delete_book(&repository, id).await?;
    Ok((StatusCode::NO_CONTENT, ()))
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/", get(list).post(create))
        .route("/count", get(count))
        .route("/search", get(search))
        .route(
            "/{id}",
            get(get_one).put(update).patch(update).delete(delete),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::FromRequestParts as _;

    async fn search_query(uri: &str) -> Result<SearchQuery, StatusCode> {
        let (mut parts, _) = http::Request::builder()
            .uri(uri)
            .body(())
            .unwrap()
            .into_parts();
        Garde::<Query<SearchQuery>>::from_request_parts(&mut parts, &())
            .await
            .map(|Garde(Query(query))| query)
            .map_err(|rejection| rejection.into_response().status())
    }

    #[tokio::test]
    async fn test_search_query_prices() {
        let query = search_query("/search?title=dune&min_price=1.5&max_price=20")
            .await
            .unwrap();
        let filter: SearchFilter = query.into();
        assert_eq!(filter.min_price, Some(1.5));
        assert_eq!(filter.max_price, Some(20.0));
        assert_eq!(filter.limit, Some(DEFAULT_SEARCH_LIMIT));

        for uri in [
            "/search?min_price=NaN",
            "/search?max_price=inf",
            "/search?min_price=NaN&max_price=-inf",
            "/search?min_price=-1",
            "/search?limit=0",
        ] {
            assert_eq!(
                search_query(uri).await.unwrap_err(),
                StatusCode::BAD_REQUEST,
                "{uri}"
            );
        }
    }
}
