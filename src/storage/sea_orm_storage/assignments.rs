//! 教师分配存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::classrooms::{self, Entity as Classrooms};
use crate::entity::courses::{self, Entity as Courses};
use crate::entity::teacher_assignments::{ActiveModel, Column, Entity as TeacherAssignments, Model};
use crate::entity::users::{self, Entity as Users};
use crate::errors::{Result, SchoolError};
use crate::models::{
    assignments::{
        entities::{AssignmentDetail, TeacherAssignment, TeacherSummary},
        requests::{AssignmentListQuery, CreateAssignmentRequest, UpdateAssignmentRequest},
    },
    classrooms::entities::ClassroomSummary,
    courses::entities::CourseSummary,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建分配
    pub async fn create_assignment_impl(
        &self,
        req: CreateAssignmentRequest,
    ) -> Result<TeacherAssignment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            teacher_id: Set(req.teacher_id),
            course_id: Set(req.course_id),
            classroom_id: Set(req.classroom_id),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolError::from_db_err("创建教师分配失败", e))?;

        Ok(result.into_assignment())
    }

    /// 带教师、课程、班级摘要的分配
    pub async fn get_assignment_detail_impl(&self, id: i64) -> Result<Option<AssignmentDetail>> {
        let result = TeacherAssignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询教师分配失败: {e}")))?;

        match result {
            Some(model) => Ok(self.hydrate_assignments(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    pub async fn list_assignment_details_impl(
        &self,
        query: AssignmentListQuery,
    ) -> Result<Vec<AssignmentDetail>> {
        let mut select = TeacherAssignments::find();

        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }
        if let Some(course_id) = query.course_id {
            select = select.filter(Column::CourseId.eq(course_id));
        }
        if let Some(classroom_id) = query.classroom_id {
            select = select.filter(Column::ClassroomId.eq(classroom_id));
        }
        if let Some(active) = query.active {
            select = select.filter(Column::Active.eq(active));
        }
        if let Some(school_id) = query.school_id {
            select = select
                .inner_join(Classrooms)
                .filter(classrooms::Column::SchoolId.eq(school_id));
        }

        let assignments = select
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询教师分配列表失败: {e}")))?;

        self.hydrate_assignments(assignments).await
    }

    pub async fn update_assignment_impl(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<TeacherAssignment>> {
        let existing = TeacherAssignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询教师分配失败: {e}")))?;
        if existing.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(teacher_id) = update.teacher_id {
            model.teacher_id = Set(teacher_id);
        }
        if let Some(active) = update.active {
            model.active = Set(active);
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| SchoolError::from_db_err("更新教师分配失败", e))?;

        Ok(Some(result.into_assignment()))
    }

    pub async fn delete_assignment_impl(&self, id: i64) -> Result<bool> {
        let result = TeacherAssignments::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("删除教师分配失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 批量加载关联的教师、课程、班级，每种实体一次查询
    async fn hydrate_assignments(&self, models: Vec<Model>) -> Result<Vec<AssignmentDetail>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let teacher_ids: Vec<i64> = models.iter().map(|m| m.teacher_id).collect();
        let course_ids: Vec<i64> = models.iter().map(|m| m.course_id).collect();
        let classroom_ids: Vec<i64> = models.iter().map(|m| m.classroom_id).collect();

        let teachers: HashMap<i64, TeacherSummary> = Users::find()
            .filter(users::Column::Id.is_in(teacher_ids))
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询分配教师失败: {e}")))?
            .into_iter()
            .map(|m| {
                let user = m.into_user();
                (user.id, TeacherSummary::from(&user))
            })
            .collect();

        let courses: HashMap<i64, CourseSummary> = Courses::find()
            .filter(courses::Column::Id.is_in(course_ids))
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询分配课程失败: {e}")))?
            .into_iter()
            .map(|m| {
                let course = m.into_course();
                (course.id, CourseSummary::from(&course))
            })
            .collect();

        let classrooms: HashMap<i64, ClassroomSummary> = Classrooms::find()
            .filter(classrooms::Column::Id.is_in(classroom_ids))
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询分配班级失败: {e}")))?
            .into_iter()
            .map(|m| {
                let classroom = m.into_classroom();
                (classroom.id, ClassroomSummary::from(&classroom))
            })
            .collect();

        let mut details = Vec::with_capacity(models.len());
        for model in models {
            let (Some(teacher), Some(course), Some(classroom)) = (
                teachers.get(&model.teacher_id),
                courses.get(&model.course_id),
                classrooms.get(&model.classroom_id),
            ) else {
                tracing::warn!("教师分配 {} 的关联数据缺失，已跳过", model.id);
                continue;
            };
            details.push(AssignmentDetail {
                teacher: teacher.clone(),
                course: course.clone(),
                classroom: classroom.clone(),
                assignment: model.into_assignment(),
            });
        }

        Ok(details)
    }
}
