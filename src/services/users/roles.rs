use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{UserService, ensure_can_grant, ensure_can_manage_user, invalidate_auth_cache};
use crate::errors::SchoolError;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{entities::UserRole, requests::AssignRoleRequest},
};
use crate::services::{current_user, error_response};

pub async fn list_roles(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let current = match current_user(request) {
        Ok(current) => current,
        Err(resp) => return Ok(resp),
    };

    if let Err(e) = ensure_can_manage_user(storage.as_ref(), &current, user_id).await {
        return Ok(error_response(&e));
    }

    match storage.list_user_roles(user_id).await {
        Ok(roles) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            roles,
            "Roles retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn assign_role(
    service: &UserService,
    user_id: i64,
    role_data: AssignRoleRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let current = match current_user(request) {
        Ok(current) => current,
        Err(resp) => return Ok(resp),
    };

    if let Err(e) = ensure_can_grant(&current, role_data.school_id, role_data.role) {
        return Ok(error_response(&e));
    }

    match storage.get_user_by_id(user_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "User not found",
            )));
        }
        Err(e) => return Ok(error_response(&e)),
    }

    if let Some(school_id) = role_data.school_id {
        match storage.get_school_by_id(school_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::SchoolNotFound,
                    "School not found",
                )));
            }
            Err(e) => return Ok(error_response(&e)),
        }
    }

    match storage
        .assign_role(user_id, role_data.school_id, role_data.role)
        .await
    {
        Ok(assignment) => {
            invalidate_auth_cache(request).await;
            tracing::info!(
                "Role {} granted to user {} by {}",
                assignment.role,
                user_id,
                current.id()
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                assignment,
                "Role assigned successfully",
            )))
        }
        Err(SchoolError::Conflict(_)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::RoleAlreadyAssigned, "Role already assigned"),
        )),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn remove_role(
    service: &UserService,
    user_id: i64,
    role_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let current = match current_user(request) {
        Ok(current) => current,
        Err(resp) => return Ok(resp),
    };

    let assignment = match storage.get_role_assignment(role_id).await {
        Ok(Some(assignment)) if assignment.user_id == user_id => assignment,
        Ok(_) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::RoleNotFound,
                "Role not found",
            )));
        }
        Err(e) => return Ok(error_response(&e)),
    };

    if assignment.role == UserRole::Owner && user_id == current.id() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "You cannot remove your own owner role",
        )));
    }

    if let Err(e) = ensure_can_grant(&current, assignment.school_id, assignment.role) {
        return Ok(error_response(&e));
    }

    match storage.remove_role(role_id).await {
        Ok(true) => {
            invalidate_auth_cache(request).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Role removed successfully")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::RoleNotFound,
            "Role not found",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
