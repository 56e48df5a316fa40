use std::sync::Arc;

use crate::models::{
    assignments::{
        entities::{AssignmentDetail, TeacherAssignment},
        requests::{AssignmentListQuery, CreateAssignmentRequest, UpdateAssignmentRequest},
    },
    classrooms::{
        entities::Classroom,
        requests::{ClassroomListQuery, CreateClassroomRequest, UpdateClassroomRequest},
    },
    common::PaginatedResponse,
    courses::{
        entities::{Competency, Course},
        requests::{
            CourseListQuery, CreateCompetencyRequest, CreateCourseRequest,
            UpdateCompetencyRequest, UpdateCourseRequest,
        },
    },
    evaluations::{
        entities::{Evaluation, EvaluationDetail},
        requests::{ByContextQuery, CreateEvaluationRequest, UpdateEvaluationRequest},
    },
    periods::{
        entities::AcademicPeriod,
        requests::{CreatePeriodRequest, PeriodListQuery, UpdatePeriodRequest},
    },
    schools::{
        entities::School,
        requests::{CreateSchoolRequest, UpdateSchoolRequest},
    },
    students::{
        entities::{Enrollment, GuardianLink, GuardianLinkDetail, Student},
        requests::{
            CreateStudentRequest, LinkGuardianRequest, StudentListQuery, UpdateStudentRequest,
        },
    },
    users::{
        entities::{RoleAssignment, User, UserRole, UserStatus},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户，password 字段必须已经是哈希
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 启用/停用用户
    async fn update_user_status(&self, id: i64, status: UserStatus) -> Result<Option<User>>;
    // 更新密码哈希
    async fn update_user_password(&self, id: i64, password_hash: &str) -> Result<bool>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;

    /// 角色管理方法
    async fn list_user_roles(&self, user_id: i64) -> Result<Vec<RoleAssignment>>;
    async fn assign_role(
        &self,
        user_id: i64,
        school_id: Option<i64>,
        role: UserRole,
    ) -> Result<RoleAssignment>;
    async fn get_role_assignment(&self, id: i64) -> Result<Option<RoleAssignment>>;
    async fn remove_role(&self, id: i64) -> Result<bool>;
    // 用户是否在学校持有某个有效角色
    async fn user_has_role_in_school(
        &self,
        user_id: i64,
        school_id: i64,
        role: UserRole,
    ) -> Result<bool>;

    /// 学校管理方法
    async fn create_school(&self, school: CreateSchoolRequest) -> Result<School>;
    async fn get_school_by_id(&self, id: i64) -> Result<Option<School>>;
    // ids 为 None 时列出全部
    async fn list_schools(&self, ids: Option<Vec<i64>>) -> Result<Vec<School>>;
    async fn update_school(&self, id: i64, update: UpdateSchoolRequest) -> Result<Option<School>>;

    /// 学期管理方法
    async fn create_period(&self, period: CreatePeriodRequest) -> Result<AcademicPeriod>;
    async fn get_period_by_id(&self, id: i64) -> Result<Option<AcademicPeriod>>;
    async fn list_periods(&self, query: PeriodListQuery) -> Result<Vec<AcademicPeriod>>;
    // 学校的启用学期，按 display_order 排序
    async fn list_active_periods(&self, school_id: i64) -> Result<Vec<AcademicPeriod>>;
    async fn update_period(
        &self,
        id: i64,
        update: UpdatePeriodRequest,
    ) -> Result<Option<AcademicPeriod>>;
    async fn delete_period(&self, id: i64) -> Result<bool>;

    /// 班级管理方法
    async fn create_classroom(&self, classroom: CreateClassroomRequest) -> Result<Classroom>;
    async fn get_classroom_by_id(&self, id: i64) -> Result<Option<Classroom>>;
    async fn list_classrooms(&self, query: ClassroomListQuery) -> Result<Vec<Classroom>>;
    async fn update_classroom(
        &self,
        id: i64,
        update: UpdateClassroomRequest,
    ) -> Result<Option<Classroom>>;
    async fn delete_classroom(&self, id: i64) -> Result<bool>;
    // 班级的全部注册学生，按姓、名、ID 排序
    async fn list_classroom_students(&self, classroom_id: i64) -> Result<Vec<Student>>;

    /// 课程管理方法
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course>;
    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>>;
    async fn list_courses(&self, query: CourseListQuery) -> Result<Vec<Course>>;
    async fn update_course(&self, id: i64, update: UpdateCourseRequest) -> Result<Option<Course>>;
    async fn delete_course(&self, id: i64) -> Result<bool>;

    /// 能力项管理方法
    async fn create_competency(&self, competency: CreateCompetencyRequest) -> Result<Competency>;
    async fn get_competency_by_id(&self, id: i64) -> Result<Option<Competency>>;
    // 按 display_order、ID 排序
    async fn list_competencies(&self, course_id: i64, active_only: bool)
    -> Result<Vec<Competency>>;
    async fn update_competency(
        &self,
        id: i64,
        update: UpdateCompetencyRequest,
    ) -> Result<Option<Competency>>;
    async fn delete_competency(&self, id: i64) -> Result<bool>;

    /// 教师分配管理方法
    async fn create_assignment(
        &self,
        assignment: CreateAssignmentRequest,
    ) -> Result<TeacherAssignment>;
    async fn get_assignment_detail(&self, id: i64) -> Result<Option<AssignmentDetail>>;
    async fn list_assignment_details(
        &self,
        query: AssignmentListQuery,
    ) -> Result<Vec<AssignmentDetail>>;
    async fn update_assignment(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<TeacherAssignment>>;
    async fn delete_assignment(&self, id: i64) -> Result<bool>;

    /// 学生管理方法
    async fn create_student(&self, student: CreateStudentRequest) -> Result<Student>;
    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>>;
    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<PaginatedResponse<Student>>;
    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>>;
    async fn update_student_status(&self, id: i64, active: bool) -> Result<Option<Student>>;

    /// 注册管理方法
    async fn create_enrollment(&self, student_id: i64, classroom_id: i64) -> Result<Enrollment>;
    async fn get_enrollment_by_id(&self, id: i64) -> Result<Option<Enrollment>>;
    async fn delete_enrollment(&self, id: i64) -> Result<bool>;

    /// 监护人关联方法
    async fn link_guardian(
        &self,
        student_id: i64,
        link: LinkGuardianRequest,
    ) -> Result<GuardianLink>;
    async fn get_guardian_link(
        &self,
        student_id: i64,
        guardian_id: i64,
    ) -> Result<Option<GuardianLink>>;
    async fn unlink_guardian(&self, student_id: i64, guardian_id: i64) -> Result<bool>;
    async fn list_student_guardians(&self, student_id: i64) -> Result<Vec<GuardianLinkDetail>>;
    async fn list_guardian_students(&self, guardian_id: i64) -> Result<Vec<Student>>;

    /// 评价管理方法
    async fn create_evaluation(
        &self,
        created_by: i64,
        evaluation: CreateEvaluationRequest,
    ) -> Result<Evaluation>;
    async fn get_evaluation_by_id(&self, id: i64) -> Result<Option<Evaluation>>;
    // 按能力项 display_order、创建时间、ID 排序
    async fn list_evaluations_by_context(
        &self,
        query: ByContextQuery,
    ) -> Result<Vec<EvaluationDetail>>;
    async fn list_student_evaluations(
        &self,
        student_id: i64,
        period_id: Option<i64>,
    ) -> Result<Vec<EvaluationDetail>>;
    async fn update_evaluation(
        &self,
        id: i64,
        update: UpdateEvaluationRequest,
    ) -> Result<Option<Evaluation>>;
    async fn delete_evaluation(&self, id: i64) -> Result<bool>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
