use actix_web::error::{InternalError, JsonPayloadError, QueryPayloadError};
use actix_web::{Error, HttpRequest, HttpResponse};
use tracing::debug;

use crate::models::{ApiResponse, ErrorCode};

/// JSON 请求体解析失败时返回统一格式
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> Error {
    debug!("Invalid JSON payload on {}: {}", req.path(), err);

    let (code, status) = match &err {
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => (
            ErrorCode::PayloadTooLarge,
            actix_web::http::StatusCode::PAYLOAD_TOO_LARGE,
        ),
        _ => (ErrorCode::BadRequest, actix_web::http::StatusCode::BAD_REQUEST),
    };

    let message = format!("Invalid request body: {err}");
    let response = HttpResponse::build(status).json(ApiResponse::error_empty(code, message));
    InternalError::from_response(err, response).into()
}

/// 查询参数解析失败时返回统一格式
pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> Error {
    debug!("Invalid query string on {}: {}", req.path(), err);

    let message = format!("Invalid query parameters: {err}");
    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message));
    InternalError::from_response(err, response).into()
}
