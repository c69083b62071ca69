use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use super::{current_identity, respond};
use crate::middlewares;
use crate::models::submissions::requests::SubmitAssignmentRequest;
use crate::models::users::entities::UserRole;
use crate::services::{AssignmentService, SubmissionService};
use crate::storage::Storage;
use crate::utils::SafeAssignmentIdI64;

// 作答页
pub async fn get_worksheet(
    req: HttpRequest,
    storage: web::Data<Arc<dyn Storage>>,
    assignment_id: SafeAssignmentIdI64,
) -> ActixResult<HttpResponse> {
    let identity = match current_identity(&req) {
        Ok(identity) => identity,
        Err(resp) => return Ok(resp),
    };
    let result = AssignmentService::new(storage.get_ref().clone())
        .worksheet(&identity, assignment_id.0)
        .await;
    Ok(respond(result, "查询成功"))
}

// 删除作业
pub async fn delete_assignment(
    req: HttpRequest,
    storage: web::Data<Arc<dyn Storage>>,
    assignment_id: SafeAssignmentIdI64,
) -> ActixResult<HttpResponse> {
    let identity = match current_identity(&req) {
        Ok(identity) => identity,
        Err(resp) => return Ok(resp),
    };
    let result = AssignmentService::new(storage.get_ref().clone())
        .delete_assignment(&identity, assignment_id.0)
        .await;
    Ok(respond(result, "Assignment deleted"))
}

// 提交作业
pub async fn submit_assignment(
    req: HttpRequest,
    storage: web::Data<Arc<dyn Storage>>,
    assignment_id: SafeAssignmentIdI64,
    body: web::Json<SubmitAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    let identity = match current_identity(&req) {
        Ok(identity) => identity,
        Err(resp) => return Ok(resp),
    };
    let result = SubmissionService::new(storage.get_ref().clone())
        .submit(&identity, assignment_id.0, body.into_inner())
        .await;
    Ok(respond(result, "Submission saved"))
}

// 配置路由
pub fn configure_assignments_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/assignments")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/{assignment_id}")
                    .route(
                        web::get()
                            .to(get_worksheet)
                            .wrap(middlewares::RequireRole::new(UserRole::Student)),
                    )
                    .route(
                        web::delete()
                            .to(delete_assignment)
                            .wrap(middlewares::RequireRole::new(UserRole::Teacher)),
                    ),
            )
            .service(
                web::resource("/{assignment_id}/submission")
                    .route(web::post().to(submit_assignment))
                    .wrap(middlewares::RequireRole::new(UserRole::Student)),
            ),
    );
}
