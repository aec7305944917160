/// Operation gateway endpoint
///
/// # Endpoint
///
/// ```text
/// POST /v1/operations
/// Authorization: Bearer <token>   (optional for signup, login, executeSeed)
/// ```
///
/// # Response
///
/// ```json
/// { "operation": "itemCount", "data": 3 }
/// ```

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::Serialize;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::bearer::BearerToken,
    operations::{self, Operation, OperationOutput},
};

#[derive(Debug, Serialize)]
pub struct OperationResponse {
    pub operation: &'static str,
    pub data: OperationOutput,
}

pub async fn handle_operation(
    State(state): State<AppState>,
    token: Option<Extension<BearerToken>>,
    payload: Result<Json<Operation>, JsonRejection>,
) -> ApiResult<Json<OperationResponse>> {
    let Json(operation) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let name = operation.name();

    let token = token.as_ref().map(|Extension(BearerToken(token))| token.as_str());
    let data = operations::execute(&state, operation, token).await?;

    Ok(Json(OperationResponse {
        operation: name,
        data,
    }))
}
