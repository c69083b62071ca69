use actix_web::{HttpResponse, Result as ActixResult, web};
use serde::Serialize;

use crate::config::AppConfig;
use crate::models::{ApiResponse, AppStartTime};

#[derive(Debug, Serialize)]
struct HealthInfo {
    system_name: String,
    version: &'static str,
    started_at: chrono::DateTime<chrono::Utc>,
    uptime_seconds: i64,
}

// 健康检查
pub async fn health(start_time: web::Data<AppStartTime>) -> ActixResult<HttpResponse> {
    let now = chrono::Utc::now();
    let info = HealthInfo {
        system_name: AppConfig::get().app.system_name.clone(),
        version: env!("CARGO_PKG_VERSION"),
        started_at: start_time.start_datetime,
        uptime_seconds: now
            .signed_duration_since(start_time.start_datetime)
            .num_seconds(),
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(info, "ok")))
}

// 配置路由
pub fn configure_system_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api/v1/system").route("/health", web::get().to(health)));
}
