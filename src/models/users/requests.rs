use super::entities::{UserRole, UserStatus};
use crate::models::common::{PaginationQuery, pagination::deserialize_optional_from_str};
use serde::Deserialize;

// 用户查询参数（来自HTTP请求）
#[derive(Debug, Deserialize)]
pub struct UserListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub school_id: Option<i64>,
    pub search: Option<String>,
}

// 用户创建请求，可以同时在某个学校授予一个角色
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub document_number: Option<String>,
    pub phone: Option<String>,
    pub school_id: Option<i64>,
    pub role: Option<UserRole>,
}

// 用户更新请求，只修改提供的字段
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub document_number: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserStatusRequest {
    pub status: UserStatus,
}

#[derive(Debug, Deserialize)]
pub struct AssignRoleRequest {
    pub school_id: Option<i64>,
    pub role: UserRole,
}

// 用户列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct UserListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub school_id: Option<i64>,
    /// 非 owner 调用者只能看到这些学校的用户
    pub school_ids: Option<Vec<i64>>,
    pub search: Option<String>,
}

impl From<UserListParams> for UserListQuery {
    fn from(params: UserListParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            role: params.role,
            status: params.status,
            school_id: params.school_id,
            school_ids: None,
            search: params.search.filter(|s| !s.trim().is_empty()),
        }
    }
}
