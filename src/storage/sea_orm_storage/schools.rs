//! 学校存储操作

use super::SeaOrmStorage;
use crate::entity::schools::{ActiveModel, Column, Entity as Schools};
use crate::errors::{Result, SchoolError};
use crate::models::schools::{
    entities::School,
    requests::{CreateSchoolRequest, UpdateSchoolRequest},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建学校
    pub async fn create_school_impl(&self, req: CreateSchoolRequest) -> Result<School> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name.trim().to_string()),
            code: Set(req.code),
            address: Set(req.address),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolError::from_db_err("创建学校失败", e))?;

        Ok(result.into_school())
    }

    pub async fn get_school_by_id_impl(&self, id: i64) -> Result<Option<School>> {
        let result = Schools::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询学校失败: {e}")))?;

        Ok(result.map(|m| m.into_school()))
    }

    /// 列出学校，ids 为 None 时不过滤
    pub async fn list_schools_impl(&self, ids: Option<Vec<i64>>) -> Result<Vec<School>> {
        let mut select = Schools::find();
        if let Some(ids) = ids {
            select = select.filter(Column::Id.is_in(ids));
        }

        let schools = select
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询学校列表失败: {e}")))?;

        Ok(schools.into_iter().map(|m| m.into_school()).collect())
    }

    pub async fn update_school_impl(
        &self,
        id: i64,
        update: UpdateSchoolRequest,
    ) -> Result<Option<School>> {
        if self.get_school_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name.trim().to_string());
        }
        if let Some(code) = update.code {
            model.code = Set(Some(code));
        }
        if let Some(address) = update.address {
            model.address = Set(Some(address));
        }
        if let Some(active) = update.active {
            model.active = Set(active);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolError::from_db_err("更新学校失败", e))?;

        self.get_school_by_id_impl(id).await
    }
}
