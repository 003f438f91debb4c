//! Request extractors that reject malformed input before a handler runs.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Query},
    http::request::Parts,
};
use serde::Deserialize;

use course_catalog_core::{PageRequest, SortKey};

use crate::error::ApiError;

/// JSON body whose decoding failures become validation errors.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// The single numeric path parameter of a route, required to be positive.
#[derive(Debug, Clone, Copy)]
pub struct PathId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(params) = Path::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;

        let (name, raw) = params
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::Internal("route declares no path parameter".to_string()))?;
        parse_positive_id(&name, &raw).map(Self)
    }
}

fn parse_positive_id(name: &str, raw: &str) -> Result<i64, ApiError> {
    let value: i64 = raw.parse().map_err(|_| {
        ApiError::Validation(format!("{name}: must be a positive integer (got '{raw}')"))
    })?;
    if value <= 0 {
        return Err(ApiError::Validation(format!(
            "{name}: must be greater than 0"
        )));
    }
    Ok(value)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPageQuery {
    page: Option<String>,
    size: Option<String>,
    sort_by: Option<String>,
    direction: Option<String>,
}

/// `page`, `size`, `sortBy` and `direction` query parameters resolved against `K`.
#[derive(Debug, Clone, Copy)]
pub struct Paging<K>(pub PageRequest<K>);

#[async_trait]
impl<S, K> FromRequestParts<S> for Paging<K>
where
    S: Send + Sync,
    K: SortKey + Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(raw) = Query::<RawPageQuery>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;

        let request = PageRequest::parse(
            raw.page.as_deref(),
            raw.size.as_deref(),
            raw.sort_by.as_deref(),
            raw.direction.as_deref(),
        )?;
        Ok(Self(request))
    }
}
