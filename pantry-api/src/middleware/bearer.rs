/// Bearer token extraction
///
/// The gateway serves public and protected operations on one route, so this
/// layer never rejects a request for lacking a token. It only parses the
/// `Authorization` header when present and stores the token in the request
/// extensions as [`BearerToken`]. Operations that need a caller resolve it
/// later.

use axum::{
    extract::Request,
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;

/// Raw token from `Authorization: Bearer <token>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(pub String);

/// Parses an `Authorization` header value
pub fn parse_bearer(value: &str) -> Result<BearerToken, ApiError> {
    // Auth schemes are case-insensitive
    let token = match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("Bearer") => token.trim(),
        _ => return Err(ApiError::BadRequest("Expected Bearer token".to_string())),
    };

    if token.is_empty() {
        return Err(ApiError::Unauthorized("Empty bearer token".to_string()));
    }

    Ok(BearerToken(token.to_string()))
}

pub async fn bearer_token_layer(mut req: Request, next: Next) -> Result<Response, ApiError> {
    let token = match req.headers().get(AUTHORIZATION) {
        Some(value) => {
            let value = value
                .to_str()
                .map_err(|_| ApiError::BadRequest("Invalid authorization header".to_string()))?;
            Some(parse_bearer(value)?)
        }
        None => None,
    };

    if let Some(token) = token {
        req.extensions_mut().insert(token);
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bearer() {
        assert_eq!(
            parse_bearer("Bearer abc.def.ghi").unwrap(),
            BearerToken("abc.def.ghi".to_string())
        );
        assert!(matches!(parse_bearer("Basic Zm9vOmJhcg=="), Err(ApiError::BadRequest(_))));
        assert!(matches!(parse_bearer("Bearer   "), Err(ApiError::Unauthorized(_))));
        assert!(matches!(parse_bearer("Bearer"), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        for header in ["bearer abc", "BEARER abc", "BeArEr abc"] {
            assert_eq!(parse_bearer(header).unwrap(), BearerToken("abc".to_string()));
        }
    }
}
