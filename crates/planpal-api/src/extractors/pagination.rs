//! Pagination extractor
//!
//! Extracts stateless offset paging parameters (`page`, `per_page`) from the
//! query string.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;

use planpal_core::PageQuery;

use crate::response::ApiError;

/// Raw pagination query parameters
#[derive(Debug, Deserialize)]
struct PaginationParams {
    #[serde(default)]
    page: Option<i64>,
    #[serde(default)]
    per_page: Option<i64>,
}

/// Validated pagination parameters
#[derive(Debug, Clone, Copy)]
pub struct Pagination(pub PageQuery);

#[async_trait]
impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PaginationParams>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::invalid_query("Invalid pagination parameters"))?;

        let defaults = PageQuery::default();
        Ok(Self(PageQuery::new(
            params.page.unwrap_or(defaults.page),
            params.per_page.unwrap_or(defaults.per_page),
        )))
    }
}
