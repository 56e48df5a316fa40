use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::auth::requests::ChangePasswordRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user;
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validate::validate_password_simple;

use super::AuthService;

pub async fn handle_change_password(
    service: &AuthService,
    change_request: ChangePasswordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let current = match current_user(request) {
        Ok(current) => current,
        Err(resp) => return Ok(resp),
    };

    // 缓存中的用户不带密码哈希，重新读取
    let user = match storage.get_user_by_id(current.id()).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "User not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get user information: {e}"),
                )),
            );
        }
    };

    if !verify_password(&change_request.current_password, &user.password_hash) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::UserPasswordInvalid,
            "Current password is incorrect",
        )));
    }

    if let Err(msg) = validate_password_simple(&change_request.new_password) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserPasswordInvalid, msg)));
    }

    let password_hash = match hash_password(&change_request.new_password) {
        Ok(hash) => hash,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Password hashing failed: {e}"),
                )),
            );
        }
    };

    match storage.update_user_password(user.id, &password_hash).await {
        Ok(_) => {
            tracing::info!("User {} changed password", user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Password changed successfully")))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to change password: {e}"),
            )),
        ),
    }
}
