//! Feed search extractor

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use vidshare_service::dto::SearchRequest;

use crate::response::ApiError;

/// `?q=` of the public feed; validated by the service
#[derive(Debug, Clone, Default)]
pub struct Search(pub SearchRequest);

#[async_trait]
impl<S> FromRequestParts<S> for Search
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(request) = Query::<SearchRequest>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.to_string()))?;
        Ok(Search(request))
    }
}
