/*!
 * JWT 认证中间件
 *
 * 校验认证服务签发的 access token，并把当前操作者的 `Identity` 放入请求扩展。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::{web, App};
 * use crate::middlewares::RequireJWT;
 *
 * App::new().service(
 *     web::scope("/api/v1")
 *         .wrap(RequireJWT)
 *         .route("/dashboard", web::get().to(handler)),
 * );
 *
 * async fn handler(req: HttpRequest) -> HttpResponse {
 *     match RequireJWT::extract_identity(&req) {
 *         Some(identity) => { /* ... */ }
 *         None => { /* 401 */ }
 *     }
 * }
 * ```
 *
 * ## 认证流程
 *
 * 1. 客户端在请求头中包含 `Authorization: Bearer <JWT_TOKEN>`
 * 2. 中间件校验签名、过期时间和令牌类型
 * 3. 按令牌查缓存，未命中时从存储层加载用户镜像并写入缓存
 * 4. 令牌无效、用户不存在时返回 401
 *
 * 校验密钥优先取 app data 中的 `JwtConfig`，否则使用全局配置。
 */

use std::{rc::Rc, sync::Arc};

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{debug, info, warn};

use super::create_error_response;
use crate::cache::{CacheResult, ObjectCache};
use crate::config::{AppConfig, JwtConfig};
use crate::models::ErrorCode;
use crate::models::users::entities::{Identity, UserRole};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";

#[derive(Clone)]
pub struct RequireJWT;

fn cache_key(token: &str) -> String {
    format!("identity:{token}")
}

// 辅助函数：提取并验证 JWT access token
async fn extract_and_validate_jwt(req: &ServiceRequest) -> Result<Identity, String> {
    let token = req
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .ok_or_else(|| "Missing or invalid Authorization header".to_string())?;

    let jwt_config = match req.app_data::<web::Data<JwtConfig>>() {
        Some(config) => config.get_ref().clone(),
        None => AppConfig::get().jwt.clone(),
    };

    let claims = JwtUtils::verify_access_token(token, &jwt_config).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        "Invalid JWT token".to_string()
    })?;

    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|c| c.get_ref().clone());

    // 从缓存中获取身份
    if let Some(cache) = &cache {
        if let CacheResult::Found(json) = cache.get_raw(&cache_key(token)).await {
            match serde_json::from_str::<Identity>(&json) {
                Ok(identity) => return Ok(identity),
                Err(_) => {
                    cache.remove(&cache_key(token)).await;
                    info!("Failed to deserialize identity from cache");
                }
            }
        }
    }

    let user_id = claims
        .user_id()
        .ok_or_else(|| "Invalid user ID in JWT".to_string())?;

    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|s| s.get_ref().clone())
        .ok_or_else(|| {
            warn!("Storage not found in app data");
            "Authentication backend unavailable".to_string()
        })?;

    let user = storage
        .get_user_by_id(user_id)
        .await
        .map_err(|_| "Failed to retrieve user from storage".to_string())?
        .ok_or_else(|| "User not found".to_string())?;

    // 令牌中的角色必须与用户镜像一致
    if claims.role.parse::<UserRole>().ok() != Some(user.role) {
        return Err("Role in token does not match user".to_string());
    }

    let identity = Identity::from(&user);
    if let Some(cache) = &cache
        && let Ok(json) = serde_json::to_string(&identity)
    {
        cache.insert_raw(cache_key(token), json).await;
    }

    Ok(identity)
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 处理 OPTIONS 请求
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    actix_web::HttpResponse::NoContent()
                        .finish()
                        .map_into_right_body(),
                ));
            }

            match extract_and_validate_jwt(&req).await {
                Ok(identity) => {
                    debug!("JWT authentication successful for ID: {}", identity.id);
                    req.extensions_mut().insert(identity);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            &format!("Unauthorized: {err}"),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

impl RequireJWT {
    /// 从请求扩展中提取当前身份
    /// 此函数应该在应用了RequireJWT中间件的路由处理程序中使用
    pub fn extract_identity(req: &actix_web::HttpRequest) -> Option<Identity> {
        req.extensions().get::<Identity>().copied()
    }

    /// 从请求扩展中提取用户角色
    pub fn extract_user_role(req: &actix_web::HttpRequest) -> Option<UserRole> {
        req.extensions().get::<Identity>().map(|identity| identity.role)
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{App, HttpRequest, HttpResponse, test};

    use super::*;
    use crate::cache::MokaCacheWrapper;
    use crate::config::CacheConfig;
    use crate::services::test_support;
    use crate::utils::jwt::ACCESS_TOKEN_TYPE;

    const SECRET: &str = "test-secret";

    async fn whoami(req: HttpRequest) -> HttpResponse {
        match RequireJWT::extract_identity(&req) {
            Some(identity) => HttpResponse::Ok().json(identity),
            None => HttpResponse::InternalServerError().finish(),
        }
    }

    fn token(user_id: i64, role: &str, token_type: &str) -> String {
        JwtUtils::generate_token_with_expiry(
            SECRET,
            user_id,
            role,
            token_type,
            chrono::Duration::minutes(5),
        )
        .unwrap()
    }

    #[actix_web::test]
    async fn test_valid_token_sets_identity() {
        let storage = test_support::storage().await;
        let teacher = test_support::teacher(&storage, "teach").await;
        let cache: Arc<dyn ObjectCache> =
            Arc::new(MokaCacheWrapper::new(&CacheConfig::default()));
        let jwt = JwtConfig {
            secret: SECRET.to_string(),
            leeway: 0,
        };

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .app_data(web::Data::new(cache))
                .app_data(web::Data::new(jwt))
                .service(
                    web::scope("/api")
                        .wrap(RequireJWT)
                        .route("/me", web::get().to(whoami)),
                ),
        )
        .await;

        let good = token(teacher.id, "teacher", ACCESS_TOKEN_TYPE);
        let req = test::TestRequest::get()
            .uri("/api/me")
            .insert_header(("Authorization", format!("Bearer {good}")))
            .to_request();
        let identity: Identity = test::call_and_read_body_json(&app, req).await;
        assert_eq!(identity, teacher);

        // 第二次命中缓存
        let req = test::TestRequest::get()
            .uri("/api/me")
            .insert_header(("Authorization", format!("Bearer {good}")))
            .to_request();
        let identity: Identity = test::call_and_read_body_json(&app, req).await;
        assert_eq!(identity, teacher);

        for bad in [
            token(teacher.id, "teacher", "refresh"),
            token(teacher.id, "student", ACCESS_TOKEN_TYPE),
            token(9999, "teacher", ACCESS_TOKEN_TYPE),
            "garbage".to_string(),
        ] {
            let req = test::TestRequest::get()
                .uri("/api/me")
                .insert_header(("Authorization", format!("Bearer {bad}")))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        }

        let req = test::TestRequest::get().uri("/api/me").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
