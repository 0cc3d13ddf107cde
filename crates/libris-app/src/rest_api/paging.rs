mod parsers;

use crate::error::{ApiError, ApiResult};
use garde::Validate;
use libris_dal::{Batch, ListingParams};
use serde::Serialize;

#[derive(Debug, Clone, Default, Validate, serde::Deserialize)]
pub struct Paging {
    #[garde(range(min = 1))]
    page: Option<u32>,
    #[garde(range(min = 1, max = 1000))]
    page_size: Option<u32>,
    #[garde(length(max = 255))]
    sort: Option<String>,
}

impl Paging {
    pub fn into_listing_params(self, default_page_size: u32) -> ApiResult<ListingParams> {
        let page = i64::from(self.page.unwrap_or(1).max(1));
        let page_size = i64::from(self.page_size.unwrap_or(default_page_size));
        let offset = (page - 1) * page_size;
        let order = self
            .sort
            .as_deref()
            .map(parsers::parse_ordering)
            .transpose()?;

        Ok(ListingParams {
            offset,
            limit: page_size,
            order,
        })
    }

    pub fn page_size(&self, default_page_size: u32) -> u32 {
        self.page_size.unwrap_or(default_page_size)
    }
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    page: u32,
    page_size: u32,
    total_pages: u32,
    total: u64,
    rows: Vec<T>,
}

impl<T> Page<T>
where
    T: Serialize,
{
    pub fn try_from_batch(
        batch: Batch<T>,
        page_size: u32,
    ) -> Result<Self, std::num::TryFromIntError> {
        let page_size_wide = u64::from(page_size.max(1));
        Ok(Self {
            page: u32::try_from(u64::try_from(batch.offset)? / page_size_wide + 1)?,
            page_size,
            total_pages: u32::try_from(batch.total.div_ceil(page_size_wide))?,
            total: batch.total,
            rows: batch.rows,
        })
    }

    pub fn from_batch(batch: Batch<T>, page_size: u32) -> ApiResult<Self> {
        Self::try_from_batch(batch, page_size)
            .map_err(|e| ApiError::InternalError(format!("Cannot build page: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{FromRequestParts as _, Query},
        response::IntoResponse as _,
    };
    use axum_valid::Garde;
    use http::StatusCode;

    #[test]
    fn test_listing_params() {
        let paging = Paging {
            page: Some(3),
            page_size: Some(20),
            sort: Some("-year_published".to_string()),
        };
        let params = paging.into_listing_params(100).unwrap();
        assert_eq!(params.offset, 40);
        assert_eq!(params.limit, 20);
        assert_eq!(params.order.unwrap()[0].to_string(), "year_published DESC");

        let params = Paging::default().into_listing_params(100).unwrap();
        assert_eq!(params.offset, 0);
        assert_eq!(params.limit, 100);
        assert!(params.order.is_none());
    }

    #[test]
    fn test_paging_validation() {
        let paging = Paging {
            page: Some(0),
            ..Default::default()
        };
        assert!(paging.validate().is_err());
        let paging = Paging {
            page_size: Some(1001),
            ..Default::default()
        };
        assert!(paging.validate().is_err());
    }

    #[tokio::test]
    async fn test_invalid_paging_is_bad_request() {
        let (mut parts, _) = http::Request::builder()
            .uri("/api/book?page=0&page_size=10")
            .body(())
            .unwrap()
            .into_parts();
        let Err(rejection) = Garde::<Query<Paging>>::from_request_parts(&mut parts, &()).await
        else {
            panic!("page 0 must be rejected");
        };
        assert_eq!(rejection.into_response().status(), StatusCode::BAD_REQUEST);

        let (mut parts, _) = http::Request::builder()
            .uri("/api/book?page=2&page_size=10&sort=-title")
            .body(())
            .unwrap()
            .into_parts();
        let Ok(Garde(Query(paging))) =
            Garde::<Query<Paging>>::from_request_parts(&mut parts, &()).await
        else {
            panic!("valid paging rejected");
        };
        assert_eq!(paging.into_listing_params(100).unwrap().offset, 10);
    }

    #[test]
    fn test_page_from_batch() {
        let batch = Batch {
            offset: 40,
            limit: 20,
            rows: vec![1, 2, 3],
            total: 43,
        };
        let page = Page::from_batch(batch, 20).unwrap();
        assert_eq!(page.page, 3);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total, 43);
        assert_eq!(page.rows.len(), 3);
    }
}
