use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{UserService, ensure_can_manage_user};
use crate::models::users::responses::UserResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, error_response};

pub async fn get_user(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let current = match current_user(request) {
        Ok(current) => current,
        Err(resp) => return Ok(resp),
    };

    let user = match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "User not found",
            )));
        }
        Err(e) => return Ok(error_response(&e)),
    };

    if let Err(e) = ensure_can_manage_user(storage.as_ref(), &current, user_id).await {
        return Ok(error_response(&e));
    }

    match storage.list_user_roles(user_id).await {
        Ok(roles) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserResponse { user, roles },
            "User information retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
