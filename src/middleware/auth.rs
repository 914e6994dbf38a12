//! Bearer token extraction from the `Authorization` header.

use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::error::AppError;

const BEARER_PREFIX: &str = "Bearer ";

/// Raw token taken from `Authorization: Bearer <token>`. Not yet verified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BearerToken(pub String);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::Auth("Missing token".to_string()))?;
        let token = header
            .to_str()
            .ok()
            .and_then(|s| s.strip_prefix(BEARER_PREFIX))
            .ok_or_else(|| AppError::Auth("Invalid authorization header".to_string()))?;
        Ok(BearerToken(token.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::FromRequestParts;
    use axum::http::Request;

    async fn extract(header: Option<&str>) -> Result<BearerToken, AppError> {
        let mut builder = Request::builder().uri("/");
        if let Some(h) = header {
            builder = builder.header(AUTHORIZATION, h);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        BearerToken::from_request_parts(&mut parts, &()).await
    }

    fn message(err: AppError) -> String {
        match err {
            AppError::Auth(msg) => msg,
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn extracts_token_after_prefix() {
        let token = extract(Some("Bearer abc.def.ghi")).await.unwrap();
        assert_eq!(token, BearerToken("abc.def.ghi".to_string()));
    }

    #[tokio::test]
    async fn missing_or_empty_header() {
        assert_eq!(message(extract(None).await.unwrap_err()), "Missing token");
        assert_eq!(message(extract(Some("")).await.unwrap_err()), "Missing token");
    }

    #[tokio::test]
    async fn wrong_scheme_is_rejected_without_slicing() {
        for header in ["abc", "Basic dXNlcjpwYXNz", "bearer abc", "Bearer"] {
            assert_eq!(
                message(extract(Some(header)).await.unwrap_err()),
                "Invalid authorization header",
                "header: {header}"
            );
        }
    }

    #[tokio::test]
    async fn empty_token_passes_through_for_verification() {
        let token = extract(Some("Bearer ")).await.unwrap();
        assert_eq!(token.0, "");
    }
}
