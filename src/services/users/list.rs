use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{
        entities::UserRole,
        requests::{UserListParams, UserListQuery},
    },
};
use crate::services::current_user;

pub async fn list_users(
    service: &UserService,
    query: UserListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let current = match current_user(request) {
        Ok(current) => current,
        Err(resp) => return Ok(resp),
    };

    let mut list_query = UserListQuery::from(query);

    // 非 owner 只能看到自己管理的学校中的用户
    if !current.is_owner() {
        if let Some(school_id) = list_query.school_id
            && !current.has_role_in_school(school_id, UserRole::management_roles())
        {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::Forbidden,
                "You do not have permission for this school",
            )));
        }
        list_query.school_ids = Some(
            current
                .roles
                .iter()
                .filter(|r| r.active && UserRole::management_roles().contains(&r.role))
                .filter_map(|r| r.school_id)
                .collect(),
        );
    }

    match storage.list_users_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "User list retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve user list: {e}"),
            )),
        ),
    }
}
