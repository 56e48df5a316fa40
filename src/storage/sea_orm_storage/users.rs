//! 用户与角色存储操作

use super::SeaOrmStorage;
use crate::entity::user_roles::{
    ActiveModel as RoleActiveModel, Column as RoleColumn, Entity as UserRoles,
};
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{SchoolError, Result};
use crate::models::{
    PaginationInfo,
    common::pagination::normalize_page,
    users::{
        entities::{RoleAssignment, User, UserRole, UserStatus},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::utils::contains_escaped;
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            email: Set(req.email.trim().to_lowercase()),
            password_hash: Set(req.password),
            first_name: Set(req.first_name),
            last_name: Set(req.last_name),
            document_number: Set(req.document_number),
            phone: Set(req.phone),
            status: Set(UserStatus::Active.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolError::from_db_err("创建用户失败", e))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过邮箱获取用户，邮箱不区分大小写
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Email.eq(email.trim().to_lowercase()))
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 分页列出用户
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<UserListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Users::find();

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let search = search.trim();
            select = select.filter(
                Condition::any()
                    .add(contains_escaped(Column::Email, search))
                    .add(contains_escaped(Column::FirstName, search))
                    .add(contains_escaped(Column::LastName, search))
                    .add(contains_escaped(Column::DocumentNumber, search)),
            );
        }

        // 状态筛选
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        // 角色、学校筛选通过 user_roles 子查询
        if query.role.is_some() || query.school_id.is_some() || query.school_ids.is_some() {
            let mut sub = Query::select();
            sub.column(RoleColumn::UserId)
                .from(UserRoles)
                .and_where(RoleColumn::Active.eq(true));
            if let Some(role) = query.role {
                sub.and_where(RoleColumn::Role.eq(role.to_string()));
            }
            if let Some(school_id) = query.school_id {
                sub.and_where(RoleColumn::SchoolId.eq(school_id));
            }
            if let Some(school_ids) = query.school_ids {
                sub.and_where(RoleColumn::SchoolId.is_in(school_ids));
            }
            select = select.filter(Column::Id.in_subquery(sub.to_owned()));
        }

        select = select
            .order_by_asc(Column::LastName)
            .order_by_asc(Column::FirstName)
            .order_by_asc(Column::Id);

        // 分页查询
        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询用户总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询用户页数失败: {e}")))?;

        let users = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询用户列表失败: {e}")))?;

        Ok(UserListResponse {
            items: users.into_iter().map(|m| m.into_user()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 更新用户个人信息
    pub async fn update_user_impl(
        &self,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<Option<User>> {
        // 先检查用户是否存在
        if self.get_user_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(email) = update.email {
            model.email = Set(email.trim().to_lowercase());
        }
        if let Some(first_name) = update.first_name {
            model.first_name = Set(first_name);
        }
        if let Some(last_name) = update.last_name {
            model.last_name = Set(last_name);
        }
        if let Some(document_number) = update.document_number {
            model.document_number = Set(Some(document_number));
        }
        if let Some(phone) = update.phone {
            model.phone = Set(Some(phone));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolError::from_db_err("更新用户失败", e))?;

        self.get_user_by_id_impl(id).await
    }

    /// 启用/停用用户，用户不会被物理删除
    pub async fn update_user_status_impl(
        &self,
        id: i64,
        status: UserStatus,
    ) -> Result<Option<User>> {
        if self.get_user_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        ActiveModel {
            id: Set(id),
            status: Set(status.to_string()),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| SchoolError::database_operation(format!("更新用户状态失败: {e}")))?;

        self.get_user_by_id_impl(id).await
    }

    /// 更新密码哈希
    pub async fn update_user_password_impl(&self, id: i64, password_hash: &str) -> Result<bool> {
        let result = Users::update_many()
            .col_expr(Column::PasswordHash, Expr::value(password_hash))
            .col_expr(
                Column::UpdatedAt,
                Expr::value(chrono::Utc::now().timestamp()),
            )
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("更新密码失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 更新用户最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::LastLogin, Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("更新最后登录时间失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 统计用户数量
    pub async fn count_users_impl(&self) -> Result<u64> {
        Users::find()
            .count(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("统计用户数量失败: {e}")))
    }

    /// 列出用户的全部角色
    pub async fn list_user_roles_impl(&self, user_id: i64) -> Result<Vec<RoleAssignment>> {
        let roles = UserRoles::find()
            .filter(RoleColumn::UserId.eq(user_id))
            .order_by_asc(RoleColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询用户角色失败: {e}")))?;

        Ok(roles
            .into_iter()
            .filter_map(|m| m.into_role_assignment())
            .collect())
    }

    /// 授予角色
    pub async fn assign_role_impl(
        &self,
        user_id: i64,
        school_id: Option<i64>,
        role: UserRole,
    ) -> Result<RoleAssignment> {
        let model = RoleActiveModel {
            user_id: Set(user_id),
            school_id: Set(school_id),
            role: Set(role.to_string()),
            active: Set(true),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolError::from_db_err("授予角色失败", e))?;

        result
            .into_role_assignment()
            .ok_or_else(|| SchoolError::database_operation(format!("无效的角色: {role}")))
    }

    pub async fn get_role_assignment_impl(&self, id: i64) -> Result<Option<RoleAssignment>> {
        let result = UserRoles::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询角色失败: {e}")))?;

        Ok(result.and_then(|m| m.into_role_assignment()))
    }

    /// 撤销角色
    pub async fn remove_role_impl(&self, id: i64) -> Result<bool> {
        let result = UserRoles::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("撤销角色失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn user_has_role_in_school_impl(
        &self,
        user_id: i64,
        school_id: i64,
        role: UserRole,
    ) -> Result<bool> {
        let count = UserRoles::find()
            .filter(RoleColumn::UserId.eq(user_id))
            .filter(RoleColumn::SchoolId.eq(school_id))
            .filter(RoleColumn::Role.eq(role.to_string()))
            .filter(RoleColumn::Active.eq(true))
            .count(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询用户角色失败: {e}")))?;

        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::scenario;
    use super::*;

    #[tokio::test]
    async fn test_list_users_filters_by_role_and_school() {
        let s = scenario().await;
        let teachers = s
            .storage
            .list_users_with_pagination_impl(UserListQuery {
                role: Some(UserRole::Teacher),
                school_id: Some(s.school_id),
                ..Default::default()
            })
            .await
            .expect("list teachers");
        assert_eq!(teachers.pagination.total, 2);

        let guardians = s
            .storage
            .list_users_with_pagination_impl(UserListQuery {
                role: Some(UserRole::Guardian),
                ..Default::default()
            })
            .await
            .expect("list guardians");
        assert!(guardians.items.is_empty());

        let searched = s
            .storage
            .list_users_with_pagination_impl(UserListQuery {
                search: Some("teacher.y".to_string()),
                ..Default::default()
            })
            .await
            .expect("search");
        assert_eq!(searched.items.len(), 1);
        assert_eq!(searched.items[0].id, s.other_teacher_id);
    }

    #[tokio::test]
    async fn test_email_lookup_is_case_insensitive_and_unique() {
        let s = scenario().await;
        let found = s
            .storage
            .get_user_by_email_impl("Teacher.X@School.test")
            .await
            .expect("lookup");
        assert_eq!(found.map(|u| u.id), Some(s.teacher_id));

        let err = s
            .storage
            .create_user_impl(CreateUserRequest {
                email: "TEACHER.X@school.test".to_string(),
                password: "hash".to_string(),
                first_name: "Dup".to_string(),
                last_name: "Dup".to_string(),
                document_number: None,
                phone: None,
                school_id: None,
                role: None,
            })
            .await
            .expect_err("duplicate email");
        assert!(matches!(err, SchoolError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_role_checks_ignore_inactive_or_other_schools() {
        let s = scenario().await;
        assert!(
            s.storage
                .user_has_role_in_school_impl(s.teacher_id, s.school_id, UserRole::Teacher)
                .await
                .expect("check")
        );
        assert!(
            !s.storage
                .user_has_role_in_school_impl(s.teacher_id, s.school_id + 1, UserRole::Teacher)
                .await
                .expect("check")
        );
        assert!(
            !s.storage
                .user_has_role_in_school_impl(s.teacher_id, s.school_id, UserRole::Director)
                .await
                .expect("check")
        );
    }
}
