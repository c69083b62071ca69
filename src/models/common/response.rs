use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::errors::EduError;
use crate::models::ErrorCode;

// 统一的API响应结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error(code: ErrorCode, data: T, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    /// 将业务错误转换为 HTTP 响应
    ///
    /// 内部错误只记录日志，对外返回通用信息。
    pub fn from_error(err: &EduError) -> HttpResponse {
        let (status, code) = match err {
            EduError::Validation(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadRequest),
            EduError::Import(_) => (StatusCode::BAD_REQUEST, ErrorCode::ImportFileParseFailed),
            EduError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NotFound),
            EduError::Authentication(_) => (StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized),
            EduError::Authorization(_) => (StatusCode::FORBIDDEN, ErrorCode::Forbidden),
            EduError::InvalidCode(_) => (StatusCode::BAD_REQUEST, ErrorCode::SubjectCodeInvalid),
            EduError::AlreadySubmitted(_) => {
                (StatusCode::CONFLICT, ErrorCode::SubmissionAlreadyExists)
            }
            EduError::Conflict(_) => (StatusCode::CONFLICT, ErrorCode::Conflict),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
            ),
        };

        if err.is_internal() {
            tracing::error!("{}", err);
            return HttpResponse::build(status)
                .json(Self::error_empty(code, "Internal server error"));
        }

        HttpResponse::build(status).json(Self::error_empty(code, err.message()))
    }
}
