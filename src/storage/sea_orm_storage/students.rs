//! 学生、注册与监护人关联存储操作

use super::SeaOrmStorage;
use crate::entity::enrollments::{ActiveModel as EnrollmentActiveModel, Entity as Enrollments};
use crate::entity::student_guardians::{
    ActiveModel as GuardianActiveModel, Column as GuardianColumn, Entity as StudentGuardians,
};
use crate::entity::students::{ActiveModel, Column, Entity as Students, date_to_timestamp};
use crate::entity::users::Entity as Users;
use crate::errors::{Result, SchoolError};
use crate::models::{
    PaginationInfo,
    common::{PaginatedResponse, pagination::normalize_page},
    students::{
        entities::{Enrollment, GuardianLink, GuardianLinkDetail, Student},
        requests::{
            CreateStudentRequest, LinkGuardianRequest, StudentListQuery, UpdateStudentRequest,
        },
    },
    users::UserSummary,
};
use crate::utils::contains_escaped;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 创建学生
    pub async fn create_student_impl(&self, req: CreateStudentRequest) -> Result<Student> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            school_id: Set(req.school_id),
            first_name: Set(req.first_name.trim().to_string()),
            last_name: Set(req.last_name.trim().to_string()),
            document_number: Set(req.document_number),
            birth_date: Set(req.birth_date.map(date_to_timestamp)),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolError::from_db_err("创建学生失败", e))?;

        Ok(result.into_student())
    }

    pub async fn get_student_by_id_impl(&self, id: i64) -> Result<Option<Student>> {
        let result = Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    /// 分页列出学生
    pub async fn list_students_with_pagination_impl(
        &self,
        query: StudentListQuery,
    ) -> Result<PaginatedResponse<Student>> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Students::find();

        if let Some(school_ids) = query.school_ids {
            select = select.filter(Column::SchoolId.is_in(school_ids));
        }
        if let Some(school_id) = query.school_id {
            select = select.filter(Column::SchoolId.eq(school_id));
        }
        if let Some(active) = query.active {
            select = select.filter(Column::Active.eq(active));
        }
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let search = search.trim();
            select = select.filter(
                Condition::any()
                    .add(contains_escaped(Column::FirstName, search))
                    .add(contains_escaped(Column::LastName, search))
                    .add(contains_escaped(Column::DocumentNumber, search)),
            );
        }

        select = select
            .order_by_asc(Column::LastName)
            .order_by_asc(Column::FirstName)
            .order_by_asc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询学生总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询学生页数失败: {e}")))?;

        let students = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询学生列表失败: {e}")))?;

        Ok(PaginatedResponse {
            items: students.into_iter().map(|m| m.into_student()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_student_impl(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        if self.get_student_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(first_name) = update.first_name {
            model.first_name = Set(first_name.trim().to_string());
        }
        if let Some(last_name) = update.last_name {
            model.last_name = Set(last_name.trim().to_string());
        }
        if let Some(document_number) = update.document_number {
            model.document_number = Set(Some(document_number));
        }
        if let Some(birth_date) = update.birth_date {
            model.birth_date = Set(Some(date_to_timestamp(birth_date)));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolError::from_db_err("更新学生失败", e))?;

        self.get_student_by_id_impl(id).await
    }

    pub async fn update_student_status_impl(
        &self,
        id: i64,
        active: bool,
    ) -> Result<Option<Student>> {
        if self.get_student_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        ActiveModel {
            id: Set(id),
            active: Set(active),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| SchoolError::database_operation(format!("更新学生状态失败: {e}")))?;

        self.get_student_by_id_impl(id).await
    }

    /// 学生注册到班级
    pub async fn create_enrollment_impl(
        &self,
        student_id: i64,
        classroom_id: i64,
    ) -> Result<Enrollment> {
        let model = EnrollmentActiveModel {
            student_id: Set(student_id),
            classroom_id: Set(classroom_id),
            enrolled_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolError::from_db_err("学生注册失败", e))?;

        Ok(result.into_enrollment())
    }

    pub async fn get_enrollment_by_id_impl(&self, id: i64) -> Result<Option<Enrollment>> {
        let result = Enrollments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询注册记录失败: {e}")))?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    pub async fn delete_enrollment_impl(&self, id: i64) -> Result<bool> {
        let result = Enrollments::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("删除注册记录失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 关联监护人
    pub async fn link_guardian_impl(
        &self,
        student_id: i64,
        req: LinkGuardianRequest,
    ) -> Result<GuardianLink> {
        let model = GuardianActiveModel {
            student_id: Set(student_id),
            guardian_id: Set(req.guardian_id),
            relationship: Set(req.relationship),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolError::from_db_err("关联监护人失败", e))?;

        Ok(result.into_guardian_link())
    }

    pub async fn get_guardian_link_impl(
        &self,
        student_id: i64,
        guardian_id: i64,
    ) -> Result<Option<GuardianLink>> {
        let result = StudentGuardians::find()
            .filter(GuardianColumn::StudentId.eq(student_id))
            .filter(GuardianColumn::GuardianId.eq(guardian_id))
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询监护人关联失败: {e}")))?;

        Ok(result.map(|m| m.into_guardian_link()))
    }

    pub async fn unlink_guardian_impl(&self, student_id: i64, guardian_id: i64) -> Result<bool> {
        let result = StudentGuardians::delete_many()
            .filter(GuardianColumn::StudentId.eq(student_id))
            .filter(GuardianColumn::GuardianId.eq(guardian_id))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("解除监护人关联失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn list_student_guardians_impl(
        &self,
        student_id: i64,
    ) -> Result<Vec<GuardianLinkDetail>> {
        let rows = StudentGuardians::find()
            .filter(GuardianColumn::StudentId.eq(student_id))
            .order_by_asc(GuardianColumn::Id)
            .find_also_related(Users)
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询学生监护人失败: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|(link, user)| {
                let user = user?.into_user();
                Some(GuardianLinkDetail {
                    link: link.into_guardian_link(),
                    guardian: UserSummary::from(&user),
                })
            })
            .collect())
    }

    /// 监护人关联的学生
    pub async fn list_guardian_students_impl(&self, guardian_id: i64) -> Result<Vec<Student>> {
        let students = Students::find()
            .inner_join(StudentGuardians)
            .filter(GuardianColumn::GuardianId.eq(guardian_id))
            .order_by_asc(Column::LastName)
            .order_by_asc(Column::FirstName)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询监护学生失败: {e}")))?;

        Ok(students.into_iter().map(|m| m.into_student()).collect())
    }
}
