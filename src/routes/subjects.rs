use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use super::{current_identity, respond};
use crate::middlewares;
use crate::models::assignments::requests::CreateAssignmentRequest;
use crate::models::questions::requests::QuestionTopicQuery;
use crate::models::subjects::requests::{CreateSubjectRequest, EnrollRequest};
use crate::models::users::entities::UserRole;
use crate::services::{AssignmentService, EnrollmentService, QuestionService, SubjectService};
use crate::storage::Storage;
use crate::utils::SafeSubjectIdI64;

// 列出课程
pub async fn list_subjects(
    req: HttpRequest,
    storage: web::Data<Arc<dyn Storage>>,
) -> ActixResult<HttpResponse> {
    let identity = match current_identity(&req) {
        Ok(identity) => identity,
        Err(resp) => return Ok(resp),
    };
    let result = SubjectService::new(storage.get_ref().clone())
        .list_subjects(&identity)
        .await;
    Ok(respond(result, "查询成功"))
}

// 创建课程
pub async fn create_subject(
    req: HttpRequest,
    storage: web::Data<Arc<dyn Storage>>,
    body: web::Json<CreateSubjectRequest>,
) -> ActixResult<HttpResponse> {
    let identity = match current_identity(&req) {
        Ok(identity) => identity,
        Err(resp) => return Ok(resp),
    };
    let result = SubjectService::new(storage.get_ref().clone())
        .create_subject(&identity, body.into_inner())
        .await;
    Ok(respond(result, "Subject created successfully!"))
}

// 通过选课码选课
pub async fn enroll(
    req: HttpRequest,
    storage: web::Data<Arc<dyn Storage>>,
    body: web::Json<EnrollRequest>,
) -> ActixResult<HttpResponse> {
    let identity = match current_identity(&req) {
        Ok(identity) => identity,
        Err(resp) => return Ok(resp),
    };
    let result = EnrollmentService::new(storage.get_ref().clone())
        .enroll(&identity, &body.code)
        .await;
    Ok(respond(result, "Enrolled successfully!"))
}

// 课程详情（按角色返回不同视图）
pub async fn get_subject(
    req: HttpRequest,
    storage: web::Data<Arc<dyn Storage>>,
    subject_id: SafeSubjectIdI64,
) -> ActixResult<HttpResponse> {
    let identity = match current_identity(&req) {
        Ok(identity) => identity,
        Err(resp) => return Ok(resp),
    };
    let service = SubjectService::new(storage.get_ref().clone());
    let resp = if identity.is_teacher() {
        respond(service.teacher_detail(&identity, subject_id.0).await, "查询成功")
    } else {
        respond(service.student_detail(&identity, subject_id.0).await, "查询成功")
    };
    Ok(resp)
}

// 删除课程
pub async fn delete_subject(
    req: HttpRequest,
    storage: web::Data<Arc<dyn Storage>>,
    subject_id: SafeSubjectIdI64,
) -> ActixResult<HttpResponse> {
    let identity = match current_identity(&req) {
        Ok(identity) => identity,
        Err(resp) => return Ok(resp),
    };
    let result = SubjectService::new(storage.get_ref().clone())
        .delete_subject(&identity, subject_id.0)
        .await;
    Ok(respond(result, "Subject deleted successfully."))
}

// 为课程布置作业
pub async fn create_assignment(
    req: HttpRequest,
    storage: web::Data<Arc<dyn Storage>>,
    subject_id: SafeSubjectIdI64,
    body: web::Json<CreateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    let identity = match current_identity(&req) {
        Ok(identity) => identity,
        Err(resp) => return Ok(resp),
    };
    let result = AssignmentService::new(storage.get_ref().clone())
        .create_assignment(&identity, subject_id.0, body.into_inner())
        .await;
    Ok(respond(result, "Assignment created"))
}

// 按主题列出课程题目选项
pub async fn list_topic_questions(
    req: HttpRequest,
    storage: web::Data<Arc<dyn Storage>>,
    subject_id: SafeSubjectIdI64,
    query: web::Query<QuestionTopicQuery>,
) -> ActixResult<HttpResponse> {
    let identity = match current_identity(&req) {
        Ok(identity) => identity,
        Err(resp) => return Ok(resp),
    };
    let result = QuestionService::new(storage.get_ref().clone())
        .list_topic_options(&identity, subject_id.0, &query.topic)
        .await;
    Ok(respond(result, "查询成功"))
}

// 配置路由
pub fn configure_subjects_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/subjects")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    // 列出课程 - 教师为本人课程，学生为已选课程
                    .route(web::get().to(list_subjects))
                    // 创建课程 - 仅教师
                    .route(
                        web::post()
                            .to(create_subject)
                            .wrap(middlewares::RequireRole::new(UserRole::Teacher)),
                    ),
            )
            // 选课 - 仅学生（需在 /{subject_id} 之前注册）
            .service(
                web::resource("/enroll")
                    .route(web::post().to(enroll))
                    .wrap(middlewares::RequireRole::new(UserRole::Student)),
            )
            .service(
                web::resource("/{subject_id}")
                    .route(web::get().to(get_subject))
                    .route(
                        web::delete()
                            .to(delete_subject)
                            .wrap(middlewares::RequireRole::new(UserRole::Teacher)),
                    ),
            )
            .service(
                web::resource("/{subject_id}/assignments")
                    .route(web::post().to(create_assignment))
                    .wrap(middlewares::RequireRole::new(UserRole::Teacher)),
            )
            .service(
                web::resource("/{subject_id}/questions")
                    .route(web::get().to(list_topic_questions))
                    .wrap(middlewares::RequireRole::new(UserRole::Teacher)),
            ),
    );
}
