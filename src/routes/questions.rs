use std::sync::Arc;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use futures_util::StreamExt;

use super::{current_identity, respond};
use crate::config::AppConfig;
use crate::middlewares;
use crate::models::questions::requests::{CreateQuestionRequest, ImportQuestionsQuery};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::QuestionService;
use crate::storage::Storage;

/// 读取 multipart 中名为 file 的字段
enum UploadError {
    Missing,
    TooLarge(usize),
    Read(String),
}

async fn read_file_from_multipart(
    payload: &mut Multipart,
    max_size: usize,
) -> Result<Vec<u8>, UploadError> {
    let mut file_bytes = Vec::new();
    let mut found = false;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| UploadError::Read(format!("读取字段失败: {e}")))?;
        if field.name() != Some("file") {
            continue;
        }
        found = true;

        while let Some(chunk) = field.next().await {
            let data = chunk.map_err(|e| UploadError::Read(format!("读取数据失败: {e}")))?;
            if file_bytes.len() + data.len() > max_size {
                return Err(UploadError::TooLarge(max_size));
            }
            file_bytes.extend_from_slice(&data);
        }
    }

    if !found || file_bytes.is_empty() {
        return Err(UploadError::Missing);
    }
    Ok(file_bytes)
}

// 新建题目
pub async fn create_question(
    req: HttpRequest,
    storage: web::Data<Arc<dyn Storage>>,
    body: web::Json<CreateQuestionRequest>,
) -> ActixResult<HttpResponse> {
    let identity = match current_identity(&req) {
        Ok(identity) => identity,
        Err(resp) => return Ok(resp),
    };
    let result = QuestionService::new(storage.get_ref().clone())
        .create_question(&identity, body.into_inner())
        .await;
    Ok(respond(result, "Question saved"))
}

// 导入题库 CSV
pub async fn import_questions(
    req: HttpRequest,
    storage: web::Data<Arc<dyn Storage>>,
    query: web::Query<ImportQuestionsQuery>,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let identity = match current_identity(&req) {
        Ok(identity) => identity,
        Err(resp) => return Ok(resp),
    };

    let max_size = AppConfig::get().upload.max_size;
    let data = match read_file_from_multipart(&mut payload, max_size).await {
        Ok(data) => data,
        Err(UploadError::Missing) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::ImportFileMissing,
                "No file uploaded",
            )));
        }
        Err(UploadError::TooLarge(limit)) => {
            return Ok(HttpResponse::PayloadTooLarge().json(ApiResponse::error_empty(
                ErrorCode::PayloadTooLarge,
                format!("File exceeds {limit} bytes"),
            )));
        }
        Err(UploadError::Read(e)) => {
            tracing::warn!("{}", e);
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::ImportFileParseFailed,
                format!("文件读取失败: {e}"),
            )));
        }
    };

    let result = QuestionService::new(storage.get_ref().clone())
        .import_csv(&identity, &data, query.clear)
        .await;
    Ok(respond(result, "Import finished"))
}

// 配置路由
pub fn configure_questions_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/questions")
            .wrap(middlewares::RequireRole::new(UserRole::Teacher))
            .wrap(middlewares::RequireJWT)
            .route("", web::post().to(create_question))
            .route("/import", web::post().to(import_questions)),
    );
}
