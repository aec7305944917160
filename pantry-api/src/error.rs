/// Error handling for the API server
///
/// Every handler returns `Result<T, ApiError>`. Service errors map one to one
/// onto HTTP statuses; the transport adds `BadRequest` for undecodable
/// envelopes and `ValidationError` for arguments that fail validation.
///
/// Bodies always have the same shape:
///
/// ```json
/// { "error": "not_found", "message": "Item with id: ... not found" }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pantry_shared::error::ServiceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::{Validate, ValidationErrors};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    /// 400: malformed envelope or unknown operation
    BadRequest(String),

    /// 401
    Unauthorized(String),

    /// 403
    Forbidden(String),

    /// 404, also for rows owned by someone else
    NotFound(String),

    /// 409: duplicate email or list/item pair
    Conflict(String),

    /// 422
    ValidationError(Vec<ValidationErrorDetail>),

    /// 500; the message is logged, never returned
    InternalError(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    pub field: String,
    pub message: String,
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable code ("not_found", "validation_error", ...)
    pub error: String,

    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::ValidationError(_) => "validation_error",
            ApiError::InternalError(_) => "internal_error",
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = self.code().to_string();

        let (message, details) = match self {
            ApiError::ValidationError(errors) => {
                ("Request validation failed".to_string(), Some(errors))
            }
            ApiError::InternalError(msg) => {
                // Logged server side only
                tracing::error!("Internal error: {}", msg);
                ("Please check server logs".to_string(), None)
            }
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg) => (msg, None),
        };

        let body = Json(ErrorResponse {
            error,
            message,
            details,
        });

        (status, body).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(msg) => ApiError::NotFound(msg),
            ServiceError::Conflict(msg) => ApiError::Conflict(msg),
            ServiceError::Unauthorized(msg) => ApiError::Unauthorized(msg),
            ServiceError::Forbidden(msg) => ApiError::Forbidden(msg),
            ServiceError::InternalError(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut details: Vec<ValidationErrorDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: wire_name(field),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();

        // HashMap order is random
        details.sort_by(|a, b| a.field.cmp(&b.field));
        ApiError::ValidationError(details)
    }
}

/// Struct field name as the client sent it (`full_name` -> `fullName`)
fn wire_name(field: &str) -> String {
    let mut name = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            name.extend(c.to_uppercase());
            upper = false;
        } else {
            name.push(c);
        }
    }
    name
}

/// Validates `value`, handing it back unchanged on success
pub fn validated<T: Validate>(value: T) -> ApiResult<T> {
    value.validate()?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pantry_shared::inputs::{PaginationArgs, SignupInput};

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("User not found".to_string());
        assert_eq!(err.to_string(), "Not found: User not found");
    }

    #[test]
    fn test_service_errors_map_to_statuses() {
        let cases = [
            (ServiceError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ServiceError::Conflict("x".into()), StatusCode::CONFLICT),
            (ServiceError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (ServiceError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (ServiceError::InternalError("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (service_error, status) in cases {
            let code = service_error.code();
            let api_error = ApiError::from(service_error);
            assert_eq!(api_error.status(), status);
            assert_eq!(api_error.code(), code);
        }
    }

    #[test]
    fn test_validation_details_are_collected() {
        let err = validated(SignupInput {
            email: "nope".to_string(),
            full_name: "Someone".to_string(),
            password: "123".to_string(),
        })
        .unwrap_err();

        match err {
            ApiError::ValidationError(details) => {
                let fields: Vec<_> = details.iter().map(|d| d.field.as_str()).collect();
                assert_eq!(fields, vec!["email", "password"]);
                assert_eq!(details[0].message, "Invalid email format");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_fields_use_wire_names() {
        let err = validated(SignupInput {
            email: "someone@example.com".to_string(),
            full_name: String::new(),
            password: "123456".to_string(),
        })
        .unwrap_err();

        let ApiError::ValidationError(details) = err else {
            panic!("expected validation error");
        };
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].field, "fullName");

        assert_eq!(wire_name("quantity_units"), "quantityUnits");
        assert_eq!(wire_name("limit"), "limit");
    }

    #[test]
    fn test_valid_value_passes_through() {
        let args = validated(PaginationArgs::new(5, 10)).unwrap();
        assert_eq!(args.limit, 5);
        assert_eq!(args.offset, 10);
    }

    #[test]
    fn test_internal_error_is_hidden() {
        let response = ApiError::InternalError("connection reset".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
