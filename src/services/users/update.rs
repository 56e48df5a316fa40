use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{UserService, ensure_can_manage_user, invalidate_auth_cache};
use crate::errors::SchoolError;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{
        entities::UserStatus,
        requests::{UpdateUserRequest, UpdateUserStatusRequest},
        responses::UserResponse,
    },
};
use crate::services::{current_user, error_response};
use crate::utils::validate::validate_email;

fn user_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::UserNotFound,
        "User not found",
    ))
}

pub async fn update_user(
    service: &UserService,
    user_id: i64,
    update_data: UpdateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let current = match current_user(request) {
        Ok(current) => current,
        Err(resp) => return Ok(resp),
    };

    if let Some(ref email) = update_data.email
        && let Err(msg) = validate_email(email)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
    }

    if let Err(e) = ensure_can_manage_user(storage.as_ref(), &current, user_id).await {
        return Ok(error_response(&e));
    }

    let user = match storage.update_user(user_id, update_data).await {
        Ok(Some(user)) => user,
        Ok(None) => return Ok(user_not_found()),
        Err(SchoolError::Conflict(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::UserAlreadyExists,
                "Email already exists",
            )));
        }
        Err(e) => return Ok(error_response(&e)),
    };

    match storage.list_user_roles(user_id).await {
        Ok(roles) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserResponse { user, roles },
            "User information updated successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn update_user_status(
    service: &UserService,
    user_id: i64,
    status_data: UpdateUserStatusRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let current = match current_user(request) {
        Ok(current) => current,
        Err(resp) => return Ok(resp),
    };

    if user_id == current.id() && status_data.status == UserStatus::Inactive {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "You cannot deactivate your own account",
        )));
    }

    if let Err(e) = ensure_can_manage_user(storage.as_ref(), &current, user_id).await {
        return Ok(error_response(&e));
    }

    match storage.update_user_status(user_id, status_data.status).await {
        Ok(Some(user)) => {
            invalidate_auth_cache(request).await;
            tracing::info!("User {} set to {} by {}", user.id, user.status, current.id());
            let roles = storage.list_user_roles(user_id).await.unwrap_or_default();
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserResponse { user, roles },
                "User status updated successfully",
            )))
        }
        Ok(None) => Ok(user_not_found()),
        Err(e) => Ok(error_response(&e)),
    }
}
