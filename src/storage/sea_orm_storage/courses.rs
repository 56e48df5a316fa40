//! 课程与能力项存储操作

use super::SeaOrmStorage;
use crate::entity::competencies::{
    ActiveModel as CompetencyActiveModel, Column as CompetencyColumn, Entity as Competencies,
};
use crate::entity::courses::{ActiveModel, Column, Entity as Courses};
use crate::errors::{Result, SchoolError};
use crate::models::courses::{
    entities::{Competency, Course},
    requests::{
        CourseListQuery, CreateCompetencyRequest, CreateCourseRequest, UpdateCompetencyRequest,
        UpdateCourseRequest,
    },
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建课程
    pub async fn create_course_impl(&self, req: CreateCourseRequest) -> Result<Course> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            school_id: Set(req.school_id),
            name: Set(req.name.trim().to_string()),
            code: Set(req.code),
            description: Set(req.description),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolError::from_db_err("创建课程失败", e))?;

        Ok(result.into_course())
    }

    pub async fn get_course_by_id_impl(&self, id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    pub async fn list_courses_impl(&self, query: CourseListQuery) -> Result<Vec<Course>> {
        let mut select = Courses::find().filter(Column::SchoolId.eq(query.school_id));
        if let Some(active) = query.active {
            select = select.filter(Column::Active.eq(active));
        }

        let courses = select
            .order_by_asc(Column::Name)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询课程列表失败: {e}")))?;

        Ok(courses.into_iter().map(|m| m.into_course()).collect())
    }

    pub async fn update_course_impl(
        &self,
        id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        if self.get_course_by_id_impl(id).await?.is_none() {
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
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(active) = update.active {
            model.active = Set(active);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolError::from_db_err("更新课程失败", e))?;

        self.get_course_by_id_impl(id).await
    }

    pub async fn delete_course_impl(&self, id: i64) -> Result<bool> {
        let result = Courses::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("删除课程失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 创建能力项
    pub async fn create_competency_impl(&self, req: CreateCompetencyRequest) -> Result<Competency> {
        let now = chrono::Utc::now().timestamp();

        let model = CompetencyActiveModel {
            course_id: Set(req.course_id),
            name: Set(req.name.trim().to_string()),
            description: Set(req.description),
            display_order: Set(req.display_order),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolError::from_db_err("创建能力项失败", e))?;

        Ok(result.into_competency())
    }

    pub async fn get_competency_by_id_impl(&self, id: i64) -> Result<Option<Competency>> {
        let result = Competencies::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询能力项失败: {e}")))?;

        Ok(result.map(|m| m.into_competency()))
    }

    pub async fn list_competencies_impl(
        &self,
        course_id: i64,
        active_only: bool,
    ) -> Result<Vec<Competency>> {
        let mut select = Competencies::find().filter(CompetencyColumn::CourseId.eq(course_id));
        if active_only {
            select = select.filter(CompetencyColumn::Active.eq(true));
        }

        let competencies = select
            .order_by_asc(CompetencyColumn::DisplayOrder)
            .order_by_asc(CompetencyColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询能力项列表失败: {e}")))?;

        Ok(competencies
            .into_iter()
            .map(|m| m.into_competency())
            .collect())
    }

    pub async fn update_competency_impl(
        &self,
        id: i64,
        update: UpdateCompetencyRequest,
    ) -> Result<Option<Competency>> {
        if self.get_competency_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = CompetencyActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name.trim().to_string());
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(display_order) = update.display_order {
            model.display_order = Set(display_order);
        }
        if let Some(active) = update.active {
            model.active = Set(active);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolError::from_db_err("更新能力项失败", e))?;

        self.get_competency_by_id_impl(id).await
    }

    pub async fn delete_competency_impl(&self, id: i64) -> Result<bool> {
        let result = Competencies::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("删除能力项失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
