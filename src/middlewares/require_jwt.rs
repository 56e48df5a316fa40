/*!
 * JWT 认证中间件
 *
 * 校验 `Authorization: Bearer <token>`，加载用户及其全部角色，
 * 以 [`CurrentUser`] 的形式放入请求扩展。
 *
 * ```rust,ignore
 * web::scope("/api/v1/evaluaciones")
 *     .wrap(RequireJWT)
 *     .route("", web::post().to(create_evaluation))
 * ```
 *
 * 处理函数中通过 `RequireJWT::extract_current_user(&req)` 取出当前用户。
 *
 * 用户信息按 token 缓存 `default_ttl` 秒，停用用户或修改角色后
 * 由对应的服务清空缓存。
 */

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::models::ErrorCode;
use crate::models::users::entities::CurrentUser;
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, info, warn};

use super::create_error_response;

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Clone)]
pub struct RequireJWT;

/// 缓存键
pub fn auth_cache_key(token: &str) -> String {
    format!("auth:{token}")
}

struct AuthFailure {
    code: ErrorCode,
    message: String,
}

impl AuthFailure {
    fn token(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::TokenInvalid,
            message: message.into(),
        }
    }
}

// 提取并验证 access token，返回当前用户
async fn extract_and_validate_jwt(req: &ServiceRequest) -> Result<CurrentUser, AuthFailure> {
    let token = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .ok_or_else(|| AuthFailure {
            code: ErrorCode::Unauthorized,
            message: "Missing or invalid Authorization header".to_string(),
        })?;

    let claims = JwtUtils::verify_access_token(token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        AuthFailure::token("Invalid JWT token")
    })?;

    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|c| c.get_ref().clone());
    let key = auth_cache_key(token);

    if let Some(cache) = &cache {
        match cache.get_raw(&key).await {
            CacheResult::Found(json) => match serde_json::from_str::<CurrentUser>(&json) {
                Ok(current) => return Ok(current),
                Err(_) => {
                    cache.remove(&key).await;
                    debug!("Discarded malformed cached user for token");
                }
            },
            CacheResult::NotFound => {}
        }
    }

    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|s| s.get_ref().clone())
        .ok_or_else(|| {
            warn!("Storage not found in app data");
            AuthFailure::token("Authentication unavailable")
        })?;

    let user_id = claims
        .user_id()
        .ok_or_else(|| AuthFailure::token("Invalid user ID in JWT"))?;

    let user = storage
        .get_user_by_id(user_id)
        .await
        .map_err(|e| {
            warn!("Failed to load user {}: {}", user_id, e);
            AuthFailure::token("Failed to retrieve user")
        })?
        .ok_or_else(|| AuthFailure::token("User not found"))?;

    if !user.is_active() {
        return Err(AuthFailure {
            code: ErrorCode::AccountInactive,
            message: "User is not active".to_string(),
        });
    }

    let roles = storage.list_user_roles(user.id).await.map_err(|e| {
        warn!("Failed to load roles for user {}: {}", user.id, e);
        AuthFailure::token("Failed to retrieve user roles")
    })?;

    let current = CurrentUser { user, roles };

    if let Some(cache) = &cache
        && let Ok(json) = serde_json::to_string(&current)
    {
        cache
            .insert_raw(key, json, AppConfig::get().cache.default_ttl)
            .await;
    }

    Ok(current)
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
            // 预检请求直接放行
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match extract_and_validate_jwt(&req).await {
                Ok(current) => {
                    debug!("JWT authentication successful for ID: {}", current.id());
                    req.extensions_mut().insert(current);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(failure) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        failure.message
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            failure.code,
                            &format!("Unauthorized: {}", failure.message),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

impl RequireJWT {
    /// 当前用户，只能在 RequireJWT 保护的路由中使用
    pub fn extract_current_user(req: &actix_web::HttpRequest) -> Option<CurrentUser> {
        req.extensions().get::<CurrentUser>().cloned()
    }

    pub fn extract_user_id(req: &actix_web::HttpRequest) -> Option<i64> {
        req.extensions().get::<CurrentUser>().map(|c| c.id())
    }
}
