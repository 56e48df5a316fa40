//! 业务逻辑层
//!
//! 每个领域一个无状态服务，处理函数从 `HttpRequest` 的 app data 中取得存储。
//! 业务逻辑写成接收 `&dyn Storage` 与当前用户的普通函数，测试直接调用。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use serde::Serialize;
use tracing::{error, info};

use crate::errors::{Resource, SchoolError};
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    users::entities::{CurrentUser, UserRole},
};

/// 生成服务结构体及其存储获取方法
macro_rules! define_service {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        pub struct $name;

        impl $name {
            pub fn new_lazy() -> Self {
                Self
            }

            pub(crate) fn get_storage(
                &self,
                request: &actix_web::HttpRequest,
            ) -> actix_web::Result<std::sync::Arc<dyn crate::storage::Storage>> {
                request
                    .app_data::<actix_web::web::Data<std::sync::Arc<dyn crate::storage::Storage>>>()
                    .map(|data| data.get_ref().clone())
                    .ok_or_else(|| {
                        actix_web::error::ErrorInternalServerError("Storage not found in app data")
                    })
            }
        }
    };
}

pub mod assignments;
pub mod auth;
pub mod classrooms;
pub mod courses;
pub mod evaluations;
pub mod guardians;
pub mod periods;
pub mod schools;
pub mod students;
pub mod users;

pub use assignments::AssignmentService;
pub use auth::AuthService;
pub use classrooms::ClassroomService;
pub use courses::CourseService;
pub use evaluations::EvaluationService;
pub use guardians::GuardianService;
pub use periods::PeriodService;
pub use schools::SchoolService;
pub use students::StudentService;
pub use users::UserService;

/// 当前用户；未经过 RequireJWT 时返回 401 响应
pub(crate) fn current_user(request: &HttpRequest) -> Result<CurrentUser, HttpResponse> {
    RequireJWT::extract_current_user(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentication required",
        ))
    })
}

pub(crate) const USER_NOT_FOUND: Resource = Resource::User;
pub(crate) const SCHOOL_NOT_FOUND: Resource = Resource::School;
pub(crate) const CLASSROOM_NOT_FOUND: Resource = Resource::Classroom;
pub(crate) const COURSE_NOT_FOUND: Resource = Resource::Course;
pub(crate) const ENROLLMENT_NOT_FOUND: Resource = Resource::Enrollment;
pub(crate) const GUARDIAN_LINK_NOT_FOUND: Resource = Resource::GuardianLink;

/// SchoolError 转换为统一响应，状态码与错误码由错误种类决定
pub(crate) fn error_response(err: &SchoolError) -> HttpResponse {
    let status = err.status_code();
    if status.is_server_error() {
        error!("{}", err);
    } else {
        info!("{}", err);
    }
    HttpResponse::build(status).json(ApiResponse::error_empty(ErrorCode::from(err), err.message()))
}

pub(crate) fn respond<T: Serialize>(
    result: crate::errors::Result<T>,
    message: &str,
) -> ActixResult<HttpResponse> {
    Ok(match result {
        Ok(data) => HttpResponse::Ok().json(ApiResponse::success(data, message)),
        Err(e) => error_response(&e),
    })
}

pub(crate) fn respond_created<T: Serialize>(
    result: crate::errors::Result<T>,
    message: &str,
) -> ActixResult<HttpResponse> {
    Ok(match result {
        Ok(data) => HttpResponse::Created().json(ApiResponse::success(data, message)),
        Err(e) => error_response(&e),
    })
}

pub(crate) fn respond_empty(
    result: crate::errors::Result<()>,
    message: &str,
) -> ActixResult<HttpResponse> {
    Ok(match result {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::success_empty(message)),
        Err(e) => error_response(&e),
    })
}

/// 调用者需要在该学校持有任一角色，owner 在 roles 包含 Owner 时处处通过
pub(crate) fn ensure_school_role(
    current: &CurrentUser,
    school_id: i64,
    roles: &[UserRole],
) -> crate::errors::Result<()> {
    if current.has_role_in_school(school_id, roles) {
        Ok(())
    } else {
        Err(SchoolError::authorization(
            "You do not have permission for this school",
        ))
    }
}

/// None 视为该实体的 404
pub(crate) fn found<T>(value: Option<T>, resource: Resource) -> crate::errors::Result<T> {
    value.ok_or(SchoolError::Missing(resource))
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use crate::models::users::entities::{CurrentUser, RoleAssignment, UserRole};
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::fixtures::Scenario;

    /// 从存储加载用户及角色，和 RequireJWT 放入请求扩展的内容一致
    pub(crate) async fn load_current_user(storage: &Arc<dyn Storage>, user_id: i64) -> CurrentUser {
        let user = storage
            .get_user_by_id(user_id)
            .await
            .expect("query user")
            .expect("user exists");
        let roles = storage.list_user_roles(user_id).await.expect("query roles");
        CurrentUser { user, roles }
    }

    pub(crate) fn shared(scenario: Scenario) -> (Arc<dyn Storage>, Scenario) {
        let storage: Arc<dyn Storage> = Arc::new(scenario.storage.clone());
        (storage, scenario)
    }

    pub(crate) fn role(user_id: i64, school_id: Option<i64>, role: UserRole) -> RoleAssignment {
        RoleAssignment {
            id: 0,
            user_id,
            school_id,
            role,
            active: true,
            created_at: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_error_response_status_follows_error_kind() {
        let resp = error_response(&SchoolError::missing(Resource::Assignment));
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let resp = error_response(&SchoolError::authorization("nope"));
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let resp = error_response(&SchoolError::conflict("dup"));
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_not_found_codes_name_the_missing_entity() {
        let body_code = |err: SchoolError| ErrorCode::from(&err);
        assert_eq!(
            body_code(SchoolError::missing(evaluations::ASSIGNMENT_NOT_FOUND)),
            ErrorCode::AssignmentNotFound
        );
        assert_eq!(
            body_code(SchoolError::missing(evaluations::PERIOD_NOT_FOUND)),
            ErrorCode::PeriodNotFound
        );
        assert_eq!(
            body_code(SchoolError::missing(SCHOOL_NOT_FOUND)),
            ErrorCode::SchoolNotFound
        );
        // 文案相同的普通 404 不会被当成具体实体
        assert_eq!(
            body_code(SchoolError::not_found("Assignment not found")),
            ErrorCode::NotFound
        );
        assert_eq!(
            body_code(SchoolError::authorization("nope")),
            ErrorCode::Forbidden
        );
    }

    #[test]
    fn test_found_maps_none_to_missing_resource() {
        assert_eq!(found(Some(3), Resource::Period).expect("present"), 3);
        let err = found::<i64>(None, Resource::Period).expect_err("absent");
        assert_eq!(err, SchoolError::missing(Resource::Period));
        assert_eq!(err.message(), "Academic period not found");
    }
}
