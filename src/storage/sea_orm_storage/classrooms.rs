//! 班级存储操作

use super::SeaOrmStorage;
use crate::entity::classrooms::{ActiveModel, Column, Entity as Classrooms};
use crate::entity::enrollments::{self, Entity as Enrollments};
use crate::entity::students::{self, Entity as Students};
use crate::errors::{Result, SchoolError};
use crate::models::{
    classrooms::{
        entities::Classroom,
        requests::{ClassroomListQuery, CreateClassroomRequest, UpdateClassroomRequest},
    },
    students::entities::Student,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建班级
    pub async fn create_classroom_impl(&self, req: CreateClassroomRequest) -> Result<Classroom> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            school_id: Set(req.school_id),
            name: Set(req.display_name()),
            grade_level: Set(req.grade_level.trim().to_string()),
            section: Set(req.section.trim().to_string()),
            academic_year: Set(req.academic_year),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolError::from_db_err("创建班级失败", e))?;

        Ok(result.into_classroom())
    }

    pub async fn get_classroom_by_id_impl(&self, id: i64) -> Result<Option<Classroom>> {
        let result = Classrooms::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_classroom()))
    }

    pub async fn list_classrooms_impl(&self, query: ClassroomListQuery) -> Result<Vec<Classroom>> {
        let mut select = Classrooms::find().filter(Column::SchoolId.eq(query.school_id));

        if let Some(year) = query.academic_year {
            select = select.filter(Column::AcademicYear.eq(year));
        }
        if let Some(active) = query.active {
            select = select.filter(Column::Active.eq(active));
        }

        let classrooms = select
            .order_by_desc(Column::AcademicYear)
            .order_by_asc(Column::GradeLevel)
            .order_by_asc(Column::Section)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询班级列表失败: {e}")))?;

        Ok(classrooms.into_iter().map(|m| m.into_classroom()).collect())
    }

    pub async fn update_classroom_impl(
        &self,
        id: i64,
        update: UpdateClassroomRequest,
    ) -> Result<Option<Classroom>> {
        if self.get_classroom_by_id_impl(id).await?.is_none() {
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
        if let Some(grade_level) = update.grade_level {
            model.grade_level = Set(grade_level);
        }
        if let Some(section) = update.section {
            model.section = Set(section);
        }
        if let Some(academic_year) = update.academic_year {
            model.academic_year = Set(academic_year);
        }
        if let Some(active) = update.active {
            model.active = Set(active);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolError::from_db_err("更新班级失败", e))?;

        self.get_classroom_by_id_impl(id).await
    }

    pub async fn delete_classroom_impl(&self, id: i64) -> Result<bool> {
        let result = Classrooms::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("删除班级失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 班级的注册学生，不论是否已有评价
    pub async fn list_classroom_students_impl(&self, classroom_id: i64) -> Result<Vec<Student>> {
        let students = Students::find()
            .inner_join(Enrollments)
            .filter(enrollments::Column::ClassroomId.eq(classroom_id))
            .order_by_asc(students::Column::LastName)
            .order_by_asc(students::Column::FirstName)
            .order_by_asc(students::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询班级学生失败: {e}")))?;

        Ok(students.into_iter().map(|m| m.into_student()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::scenario;

    #[tokio::test]
    async fn test_classroom_students_sorted_by_name() {
        let s = scenario().await;
        let students = s
            .storage
            .list_classroom_students_impl(s.classroom_id)
            .await
            .expect("list students");
        let ids: Vec<i64> = students.iter().map(|st| st.id).collect();
        assert_eq!(ids, s.student_ids);
        assert!(!ids.contains(&s.outsider_student_id));
        assert_eq!(students[1].first_name, "Ana");
        assert_eq!(students[2].first_name, "Bruno");
    }

    #[tokio::test]
    async fn test_duplicate_enrollment_is_conflict() {
        let s = scenario().await;
        let err = s
            .storage
            .create_enrollment_impl(s.student_ids[0], s.classroom_id)
            .await
            .expect_err("duplicate enrollment");
        assert!(matches!(err, crate::errors::SchoolError::Conflict(_)));
    }
}
