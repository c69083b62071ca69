pub mod assignments;
pub mod dashboard;
pub mod questions;
pub mod subjects;
pub mod submissions;
pub mod system;

pub use assignments::configure_assignments_routes;
pub use dashboard::configure_dashboard_routes;
pub use questions::configure_questions_routes;
pub use subjects::configure_subjects_routes;
pub use submissions::configure_submissions_routes;
pub use system::configure_system_routes;

use actix_web::{HttpRequest, HttpResponse};
use serde::Serialize;

use crate::errors::Result;
use crate::middlewares::RequireJWT;
use crate::models::users::entities::Identity;
use crate::models::{ApiResponse, ErrorCode};

/// 取出认证中间件放入的身份
pub(crate) fn current_identity(req: &HttpRequest) -> std::result::Result<Identity, HttpResponse> {
    RequireJWT::extract_identity(req).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "无法获取用户信息",
        ))
    })
}

/// 业务结果转为统一响应
pub(crate) fn respond<T: Serialize>(result: Result<T>, message: &str) -> HttpResponse {
    match result {
        Ok(data) => HttpResponse::Ok().json(ApiResponse::success(data, message)),
        Err(e) => ApiResponse::from_error(&e),
    }
}

/// 配置全部业务路由
pub fn configure_api_routes(cfg: &mut actix_web::web::ServiceConfig) {
    configure_subjects_routes(cfg);
    configure_assignments_routes(cfg);
    configure_submissions_routes(cfg);
    configure_questions_routes(cfg);
    configure_dashboard_routes(cfg);
    configure_system_routes(cfg);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, test, web};
    use serde_json::{Value, json};

    use super::*;
    use crate::cache::{MokaCacheWrapper, ObjectCache};
    use crate::config::{CacheConfig, JwtConfig};
    use crate::models::questions::entities::QuestionLevel;
    use crate::services::test_support;
    use crate::utils::jwt::{ACCESS_TOKEN_TYPE, JwtUtils};

    const SECRET: &str = "route-secret";

    fn bearer(identity: &Identity) -> (&'static str, String) {
        let token = JwtUtils::generate_token_with_expiry(
            SECRET,
            identity.id,
            &identity.role.to_string(),
            ACCESS_TOKEN_TYPE,
            chrono::Duration::minutes(5),
        )
        .unwrap();
        ("Authorization", format!("Bearer {token}"))
    }

    #[actix_web::test]
    async fn test_grading_low_score_assigns_follow_up() {
        let storage = test_support::storage().await;
        let teacher = test_support::teacher(&storage, "teach").await;
        let student = test_support::student(&storage, "stud").await;
        let q = test_support::question(&storage, None, "Fractions", QuestionLevel::Low, "1/2?")
            .await;
        let cache: Arc<dyn ObjectCache> =
            Arc::new(MokaCacheWrapper::new(&CacheConfig::default()));

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .app_data(web::Data::new(cache))
                .app_data(web::Data::new(JwtConfig {
                    secret: SECRET.to_string(),
                    leeway: 0,
                }))
                .configure(configure_subjects_routes)
                .configure(configure_assignments_routes)
                .configure(configure_submissions_routes)
                .configure(configure_dashboard_routes),
        )
        .await;

        // 学生不能创建课程
        let req = test::TestRequest::post()
            .uri("/api/v1/subjects")
            .insert_header(bearer(&student))
            .set_json(json!({"name": "Maths", "code": "MATH01"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 403);

        let req = test::TestRequest::post()
            .uri("/api/v1/subjects")
            .insert_header(bearer(&teacher))
            .set_json(json!({"name": "Maths", "code": "math01"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["code"], "MATH01");
        let subject_id = body["data"]["id"].as_i64().unwrap();

        let req = test::TestRequest::post()
            .uri("/api/v1/subjects/enroll")
            .insert_header(bearer(&student))
            .set_json(json!({"code": " MATH01 "}))
            .to_request();
        assert!(test::call_service(&app, req).await.status().is_success());

        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/subjects/{subject_id}/assignments"))
            .insert_header(bearer(&teacher))
            .set_json(json!({
                "topic": "Fractions",
                "due_at": chrono::Utc::now() + chrono::Duration::days(3),
                "question_ids": [q.id],
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let assignment_id = body["data"]["id"].as_i64().unwrap();

        let mut answers = serde_json::Map::new();
        answers.insert(q.id.to_string(), json!("3/4"));
        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/assignments/{assignment_id}/submission"))
            .insert_header(bearer(&student))
            .set_json(json!({"answers": answers}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let submission_id = body["data"]["id"].as_i64().unwrap();

        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/submissions/{submission_id}/grade"))
            .insert_header(bearer(&teacher))
            .set_json(json!({"score": "2", "feedback": "Review fractions"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["submission"]["score"], 2);
        assert_eq!(body["data"]["recommendation"]["status"], "created");
        assert_eq!(body["data"]["recommendation"]["level"], "low");

        let req = test::TestRequest::get()
            .uri("/api/v1/dashboard")
            .insert_header(bearer(&student))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["role"], "student");
        // 原作业三天后截止，后续练习七天后截止
        let open = body["data"]["assignments"].as_array().unwrap();
        assert_eq!(open.len(), 2);
        assert_eq!(open[0]["assignment"]["id"], assignment_id);
        assert_eq!(
            open[1]["assignment"]["description"],
            "Adaptive follow-up on Fractions (Level: low)"
        );
        assert_eq!(open[1]["preview"]["question"], "1/2?");
    }

    #[actix_web::test]
    async fn test_missing_token_is_rejected() {
        let storage = test_support::storage().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage))
                .app_data(web::Data::new(JwtConfig {
                    secret: SECRET.to_string(),
                    leeway: 0,
                }))
                .configure(configure_dashboard_routes),
        )
        .await;
        let req = test::TestRequest::get().uri("/api/v1/dashboard").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 401);
    }
}
