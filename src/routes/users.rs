use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::users::entities::UserRole;
use crate::models::users::requests::{
    AssignRoleRequest, CreateUserRequest, UpdateUserRequest, UpdateUserStatusRequest,
    UserListParams,
};
use crate::services::UserService;
use crate::utils::{SafeIDI64, SafeRoleIdI64};

// 懒加载的全局 UserService 实例
static USER_SERVICE: Lazy<UserService> = Lazy::new(UserService::new_lazy);

// HTTP处理程序
pub async fn list_users(
    req: HttpRequest,
    query: web::Query<UserListParams>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE.list_users(query.into_inner(), &req).await
}

pub async fn create_user(
    req: HttpRequest,
    user_data: web::Json<CreateUserRequest>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE.create_user(user_data.into_inner(), &req).await
}

pub async fn get_user(req: HttpRequest, user_id: SafeIDI64) -> ActixResult<HttpResponse> {
    USER_SERVICE.get_user(user_id.0, &req).await
}

pub async fn update_user(
    req: HttpRequest,
    user_id: SafeIDI64,
    update_data: web::Json<UpdateUserRequest>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE
        .update_user(user_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn update_user_status(
    req: HttpRequest,
    user_id: SafeIDI64,
    status_data: web::Json<UpdateUserStatusRequest>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE
        .update_user_status(user_id.0, status_data.into_inner(), &req)
        .await
}

pub async fn list_roles(req: HttpRequest, user_id: SafeIDI64) -> ActixResult<HttpResponse> {
    USER_SERVICE.list_roles(user_id.0, &req).await
}

pub async fn assign_role(
    req: HttpRequest,
    user_id: SafeIDI64,
    role_data: web::Json<AssignRoleRequest>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE
        .assign_role(user_id.0, role_data.into_inner(), &req)
        .await
}

pub async fn remove_role(
    req: HttpRequest,
    user_id: SafeIDI64,
    role_id: SafeRoleIdI64,
) -> ActixResult<HttpResponse> {
    USER_SERVICE.remove_role(user_id.0, role_id.0, &req).await
}

// 配置路由
pub fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/users")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::management_roles()))
                    .route("", web::get().to(list_users))
                    .route("", web::post().to(create_user))
                    .route("/{id}", web::get().to(get_user))
                    .route("/{id}", web::put().to(update_user))
                    .route("/{id}/status", web::patch().to(update_user_status))
                    .route("/{id}/roles", web::get().to(list_roles))
                    .route("/{id}/roles", web::post().to(assign_role))
                    .route("/{id}/roles/{role_id}", web::delete().to(remove_role)),
            ),
    );
}
