//! 路径参数提取器
//!
//! 校验路径中的 ID 为正整数，失败时直接返回统一格式的 400 响应。

use actix_web::error::InternalError;
use actix_web::{Error, FromRequest, HttpRequest, HttpResponse, dev::Payload};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn extract_positive_id(req: &HttpRequest, name: &str) -> Result<i64, Error> {
    let raw = req.match_info().get(name).unwrap_or_default();
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => {
            let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                format!("Invalid path parameter {name}: '{raw}'"),
            ));
            Err(InternalError::from_response(format!("invalid {name}"), response).into())
        }
    }
}

macro_rules! define_safe_id_extractor {
    ($($name:ident => $param:literal),* $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy)]
            pub struct $name(pub i64);

            impl FromRequest for $name {
                type Error = Error;
                type Future = Ready<Result<Self, Self::Error>>;

                fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                    ready(extract_positive_id(req, $param).map($name))
                }
            }
        )*
    };
}

define_safe_id_extractor! {
    SafeSubjectIdI64 => "subject_id",
    SafeAssignmentIdI64 => "assignment_id",
    SafeSubmissionIdI64 => "submission_id",
}
