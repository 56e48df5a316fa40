pub mod create;
pub mod get;
pub mod list;
pub mod roles;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::errors::{Result, SchoolError};
use crate::models::users::{
    entities::{CurrentUser, UserRole},
    requests::{
        AssignRoleRequest, CreateUserRequest, UpdateUserRequest, UpdateUserStatusRequest,
        UserListParams,
    },
};
use crate::storage::Storage;

define_service!(UserService);

impl UserService {
    // 获取用户列表
    pub async fn list_users(
        &self,
        query: UserListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_users(self, query, request).await
    }

    // 创建用户
    pub async fn create_user(
        &self,
        user_data: CreateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_user(self, user_data, request).await
    }

    pub async fn get_user(&self, user_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_user(self, user_id, request).await
    }

    // 更新个人信息
    pub async fn update_user(
        &self,
        user_id: i64,
        update_data: UpdateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_user(self, user_id, update_data, request).await
    }

    // 启用/停用
    pub async fn update_user_status(
        &self,
        user_id: i64,
        status: UpdateUserStatusRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_user_status(self, user_id, status, request).await
    }

    pub async fn list_roles(&self, user_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        roles::list_roles(self, user_id, request).await
    }

    pub async fn assign_role(
        &self,
        user_id: i64,
        role_data: AssignRoleRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        roles::assign_role(self, user_id, role_data, request).await
    }

    pub async fn remove_role(
        &self,
        user_id: i64,
        role_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        roles::remove_role(self, user_id, role_id, request).await
    }
}

/// 授予或撤销角色的规则
///
/// 只有 owner 可以授予 owner 角色，且 owner 角色没有学校；其它角色必须指定
/// 学校，调用者需要是 owner，或者在该学校是校长/行政人员。
pub(crate) fn ensure_can_grant(
    current: &CurrentUser,
    school_id: Option<i64>,
    role: UserRole,
) -> Result<()> {
    match (role, school_id) {
        (UserRole::Owner, None) if current.is_owner() => Ok(()),
        (UserRole::Owner, None) => Err(SchoolError::authorization(
            "Only owners can grant the owner role",
        )),
        (UserRole::Owner, Some(_)) => Err(SchoolError::validation(
            "The owner role is not bound to a school",
        )),
        (_, None) => Err(SchoolError::validation("school_id is required for this role")),
        (_, Some(school_id)) => {
            if current.has_role_in_school(school_id, UserRole::management_roles()) {
                Ok(())
            } else {
                Err(SchoolError::authorization(
                    "You can only grant roles in your own schools",
                ))
            }
        }
    }
}

/// owner 可以管理所有用户；其他管理角色只能管理在其学校持有角色的用户
pub(crate) async fn ensure_can_manage_user(
    storage: &dyn Storage,
    current: &CurrentUser,
    user_id: i64,
) -> Result<()> {
    if current.is_owner() || current.id() == user_id {
        return Ok(());
    }
    let roles = storage.list_user_roles(user_id).await?;
    let shared_school = roles.iter().filter_map(|r| r.school_id).any(|school_id| {
        current.has_role_in_school(school_id, UserRole::management_roles())
    });
    if shared_school {
        Ok(())
    } else {
        Err(SchoolError::authorization(
            "You do not have permission to manage this user",
        ))
    }
}

/// 角色或状态变化后丢弃所有已缓存的认证信息
pub(crate) async fn invalidate_auth_cache(request: &HttpRequest) {
    if let Some(cache) = request.app_data::<web::Data<Arc<dyn ObjectCache>>>() {
        cache.invalidate_all().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{User, UserStatus};
    use crate::services::testing::role;

    fn current(roles: Vec<crate::models::users::RoleAssignment>) -> CurrentUser {
        let now = chrono::Utc::now();
        CurrentUser {
            user: User {
                id: 1,
                email: "staff@colegio.pe".to_string(),
                password_hash: String::new(),
                first_name: "Rosa".to_string(),
                last_name: "Quispe".to_string(),
                document_number: None,
                phone: None,
                status: UserStatus::Active,
                last_login: None,
                created_at: now,
                updated_at: now,
            },
            roles,
        }
    }

    #[test]
    fn test_only_owner_grants_owner() {
        let owner = current(vec![role(1, None, UserRole::Owner)]);
        let director = current(vec![role(1, Some(10), UserRole::Director)]);

        assert!(ensure_can_grant(&owner, None, UserRole::Owner).is_ok());
        assert!(matches!(
            ensure_can_grant(&director, None, UserRole::Owner),
            Err(SchoolError::Authorization(_))
        ));
        assert!(matches!(
            ensure_can_grant(&owner, Some(10), UserRole::Owner),
            Err(SchoolError::Validation(_))
        ));
    }

    #[test]
    fn test_school_staff_grant_only_in_own_school() {
        let administrative = current(vec![role(1, Some(10), UserRole::Administrative)]);
        let teacher = current(vec![role(1, Some(10), UserRole::Teacher)]);
        let owner = current(vec![role(1, None, UserRole::Owner)]);

        assert!(ensure_can_grant(&administrative, Some(10), UserRole::Teacher).is_ok());
        assert!(ensure_can_grant(&administrative, Some(10), UserRole::Director).is_ok());
        assert!(ensure_can_grant(&administrative, Some(11), UserRole::Teacher).is_err());
        assert!(ensure_can_grant(&teacher, Some(10), UserRole::Guardian).is_err());
        assert!(ensure_can_grant(&owner, Some(99), UserRole::Guardian).is_ok());
        assert!(matches!(
            ensure_can_grant(&owner, None, UserRole::Teacher),
            Err(SchoolError::Validation(_))
        ));
    }
}
