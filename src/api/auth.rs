//! Authenticated User Extractor
//!
//! Credentials are verified upstream. The gateway forwards the verified
//! numeric user id in the `x-user-id` header and handlers trust it as is.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::api::error::ApiError;
use crate::store::UserId;

/// Header carrying the verified user id
pub const USER_ID_HEADER: &str = "x-user-id";

/// The verified user a request acts for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub UserId);

fn parse_user_id(value: &str) -> Result<UserId, ApiError> {
    value
        .trim()
        .parse::<i64>()
        .map(UserId)
        .map_err(|_| ApiError::Forbidden(format!("non-numeric user id '{}'", value)))
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or(ApiError::Unauthorized)?;

        let value = header
            .to_str()
            .map_err(|_| ApiError::Forbidden("user id header is not valid text".to_string()))?;

        parse_user_id(value).map(AuthenticatedUser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(header: Option<&str>) -> Result<AuthenticatedUser, ApiError> {
        let mut builder = Request::builder().uri("/api/insights/patterns");
        if let Some(value) = header {
            builder = builder.header(USER_ID_HEADER, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        AuthenticatedUser::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_valid_header() {
        assert_eq!(extract(Some("42")).await.unwrap(), AuthenticatedUser(UserId(42)));
    }

    #[tokio::test]
    async fn test_missing_header() {
        assert!(matches!(extract(None).await, Err(ApiError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_non_numeric_header() {
        assert!(matches!(extract(Some("abc")).await, Err(ApiError::Forbidden(_))));
    }
}
