//! 学期存储操作

use super::SeaOrmStorage;
use crate::entity::academic_periods::{ActiveModel, Column, Entity as AcademicPeriods};
use crate::errors::{Result, SchoolError};
use crate::models::periods::{
    entities::AcademicPeriod,
    requests::{CreatePeriodRequest, PeriodListQuery, UpdatePeriodRequest},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建学期
    pub async fn create_period_impl(&self, req: CreatePeriodRequest) -> Result<AcademicPeriod> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            school_id: Set(req.school_id),
            name: Set(req.name),
            academic_year: Set(req.academic_year),
            period_type: Set(req.period_type.to_string()),
            display_order: Set(req.display_order),
            start_date: Set(req.start_date.map(|d| d.timestamp())),
            end_date: Set(req.end_date.map(|d| d.timestamp())),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolError::from_db_err("创建学期失败", e))?;

        Ok(result.into_period())
    }

    pub async fn get_period_by_id_impl(&self, id: i64) -> Result<Option<AcademicPeriod>> {
        let result = AcademicPeriods::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询学期失败: {e}")))?;

        Ok(result.map(|m| m.into_period()))
    }

    /// 按学年、display_order 排序
    pub async fn list_periods_impl(&self, query: PeriodListQuery) -> Result<Vec<AcademicPeriod>> {
        let mut select = AcademicPeriods::find().filter(Column::SchoolId.eq(query.school_id));

        if let Some(year) = query.academic_year {
            select = select.filter(Column::AcademicYear.eq(year));
        }
        if let Some(active) = query.active {
            select = select.filter(Column::Active.eq(active));
        }

        let periods = select
            .order_by_desc(Column::AcademicYear)
            .order_by_asc(Column::DisplayOrder)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询学期列表失败: {e}")))?;

        Ok(periods.into_iter().map(|m| m.into_period()).collect())
    }

    pub async fn list_active_periods_impl(&self, school_id: i64) -> Result<Vec<AcademicPeriod>> {
        let periods = AcademicPeriods::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::Active.eq(true))
            .order_by_asc(Column::DisplayOrder)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询启用学期失败: {e}")))?;

        Ok(periods.into_iter().map(|m| m.into_period()).collect())
    }

    pub async fn update_period_impl(
        &self,
        id: i64,
        update: UpdatePeriodRequest,
    ) -> Result<Option<AcademicPeriod>> {
        if self.get_period_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(academic_year) = update.academic_year {
            model.academic_year = Set(academic_year);
        }
        if let Some(period_type) = update.period_type {
            model.period_type = Set(period_type.to_string());
        }
        if let Some(display_order) = update.display_order {
            model.display_order = Set(display_order);
        }
        if let Some(start_date) = update.start_date {
            model.start_date = Set(Some(start_date.timestamp()));
        }
        if let Some(end_date) = update.end_date {
            model.end_date = Set(Some(end_date.timestamp()));
        }
        if let Some(active) = update.active {
            model.active = Set(active);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolError::from_db_err("更新学期失败", e))?;

        self.get_period_by_id_impl(id).await
    }

    pub async fn delete_period_impl(&self, id: i64) -> Result<bool> {
        let result = AcademicPeriods::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("删除学期失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
