use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::{UserService, ensure_can_grant};
use crate::errors::SchoolError;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{requests::CreateUserRequest, responses::UserResponse},
};
use crate::services::{current_user, error_response};
use crate::utils::password::hash_password;
use crate::utils::validate::{
    require_text, validate_document_number, validate_email, validate_password_simple,
};

pub async fn create_user(
    service: &UserService,
    mut user_data: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = match current_user(request) {
        Ok(current) => current,
        Err(resp) => return Ok(resp),
    };

    // 验证邮箱
    if let Err(msg) = validate_email(&user_data.email) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
    }

    if let Err(e) = require_text("first_name", &user_data.first_name)
        .and_then(|_| require_text("last_name", &user_data.last_name))
    {
        return Ok(error_response(&e));
    }
    if let Some(ref document) = user_data.document_number
        && let Err(msg) = validate_document_number(document)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }

    // 验证密码策略
    if let Err(msg) = validate_password_simple(&user_data.password) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserPasswordInvalid, msg)));
    }

    // 非 owner 创建的用户必须同时在其学校获得一个角色，否则之后无法管理
    let initial_role = match (user_data.role, user_data.school_id) {
        (Some(role), school_id) => Some((role, school_id)),
        (None, _) if current.is_owner() => None,
        (None, _) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                "school_id and role are required",
            )));
        }
    };
    if let Some((role, school_id)) = initial_role
        && let Err(e) = ensure_can_grant(&current, school_id, role)
    {
        return Ok(error_response(&e));
    }

    user_data.password = match hash_password(&user_data.password) {
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

    let storage = service.get_storage(request)?;

    let user = match storage.create_user(user_data).await {
        Ok(user) => user,
        Err(SchoolError::Conflict(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::UserAlreadyExists,
                "Email already exists",
            )));
        }
        Err(e) => {
            error!("User creation failed: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::UserCreationFailed,
                    format!("User creation failed: {e}"),
                )),
            );
        }
    };

    let mut roles = Vec::new();
    if let Some((role, school_id)) = initial_role {
        match storage.assign_role(user.id, school_id, role).await {
            Ok(assignment) => roles.push(assignment),
            Err(e) => {
                error!("Failed to grant initial role to user {}: {}", user.id, e);
                return Ok(error_response(&e));
            }
        }
    }

    tracing::info!("User {} created by {}", user.email, current.id());

    Ok(HttpResponse::Created().json(ApiResponse::success(
        UserResponse { user, roles },
        "User created successfully",
    )))
}
