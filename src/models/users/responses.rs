use super::entities::{RoleAssignment, User};
use crate::models::common::PaginationInfo;
use serde::Serialize;

// 用户及其角色
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: User,
    pub roles: Vec<RoleAssignment>,
}

// 用户列表响应
#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub items: Vec<User>,
    pub pagination: PaginationInfo,
}
