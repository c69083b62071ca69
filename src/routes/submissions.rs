use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use super::{current_identity, respond};
use crate::middlewares;
use crate::models::submissions::requests::GradeSubmissionRequest;
use crate::models::users::entities::UserRole;
use crate::services::SubmissionService;
use crate::storage::Storage;
use crate::utils::SafeSubmissionIdI64;

// 评分
pub async fn grade_submission(
    req: HttpRequest,
    storage: web::Data<Arc<dyn Storage>>,
    submission_id: SafeSubmissionIdI64,
    body: web::Json<GradeSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    let identity = match current_identity(&req) {
        Ok(identity) => identity,
        Err(resp) => return Ok(resp),
    };
    let result = SubmissionService::new(storage.get_ref().clone())
        .grade_submission(&identity, submission_id.0, body.into_inner())
        .await;
    Ok(respond(result, "Graded"))
}

// 删除本人的提交
pub async fn delete_submission(
    req: HttpRequest,
    storage: web::Data<Arc<dyn Storage>>,
    submission_id: SafeSubmissionIdI64,
) -> ActixResult<HttpResponse> {
    let identity = match current_identity(&req) {
        Ok(identity) => identity,
        Err(resp) => return Ok(resp),
    };
    let result = SubmissionService::new(storage.get_ref().clone())
        .delete_submission(&identity, submission_id.0)
        .await;
    Ok(respond(result, "Submission deleted successfully."))
}

// 配置路由
pub fn configure_submissions_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/submissions")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/{submission_id}")
                    .route(web::delete().to(delete_submission))
                    .wrap(middlewares::RequireRole::new(UserRole::Student)),
            )
            .service(
                web::resource("/{submission_id}/grade")
                    .route(web::post().to(grade_submission))
                    .wrap(middlewares::RequireRole::new(UserRole::Teacher)),
            ),
    );
}
