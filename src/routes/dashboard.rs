use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use super::{current_identity, respond};
use crate::middlewares;
use crate::models::users::entities::UserRole;
use crate::services::DashboardService;
use crate::storage::Storage;

// 首页
pub async fn get_dashboard(
    req: HttpRequest,
    storage: web::Data<Arc<dyn Storage>>,
) -> ActixResult<HttpResponse> {
    let identity = match current_identity(&req) {
        Ok(identity) => identity,
        Err(resp) => return Ok(resp),
    };
    let result = DashboardService::new(storage.get_ref().clone())
        .dashboard(&identity)
        .await;
    Ok(respond(result, "查询成功"))
}

// 配置路由
pub fn configure_dashboard_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/dashboard")
            .wrap(middlewares::RequireRole::new_any(UserRole::all_roles()))
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(get_dashboard)),
    );
}
