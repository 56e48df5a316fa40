//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod assignments;
mod classrooms;
mod courses;
mod evaluations;
mod periods;
mod schools;
mod students;
mod users;

#[cfg(test)]
pub(crate) mod fixtures;

use crate::config::AppConfig;
use crate::errors::{SchoolError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| SchoolError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| SchoolError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| SchoolError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| SchoolError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 测试用内存数据库，单连接保证所有查询看到同一个库
    #[cfg(test)]
    pub(crate) async fn new_in_memory() -> Result<Self> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| SchoolError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opt)
            .await
            .map_err(|e| SchoolError::database_connection(format!("SQLite 连接失败: {e}")))?;

        let db = SqlxSqliteConnector::from_sqlx_sqlite_pool(pool);
        Migrator::up(&db, None)
            .await
            .map_err(|e| SchoolError::database_operation(format!("数据库迁移失败: {e}")))?;

        Ok(Self { db })
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(SchoolError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}


// Storage trait 实现
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
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn update_user_status(&self, id: i64, status: UserStatus) -> Result<Option<User>> {
        self.update_user_status_impl(id, status).await
    }

    async fn update_user_password(&self, id: i64, password_hash: &str) -> Result<bool> {
        self.update_user_password_impl(id, password_hash).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 角色模块
    async fn list_user_roles(&self, user_id: i64) -> Result<Vec<RoleAssignment>> {
        self.list_user_roles_impl(user_id).await
    }

    async fn assign_role(
        &self,
        user_id: i64,
        school_id: Option<i64>,
        role: UserRole,
    ) -> Result<RoleAssignment> {
        self.assign_role_impl(user_id, school_id, role).await
    }

    async fn get_role_assignment(&self, id: i64) -> Result<Option<RoleAssignment>> {
        self.get_role_assignment_impl(id).await
    }

    async fn remove_role(&self, id: i64) -> Result<bool> {
        self.remove_role_impl(id).await
    }

    async fn user_has_role_in_school(
        &self,
        user_id: i64,
        school_id: i64,
        role: UserRole,
    ) -> Result<bool> {
        self.user_has_role_in_school_impl(user_id, school_id, role)
            .await
    }

    // 学校模块
    async fn create_school(&self, school: CreateSchoolRequest) -> Result<School> {
        self.create_school_impl(school).await
    }

    async fn get_school_by_id(&self, id: i64) -> Result<Option<School>> {
        self.get_school_by_id_impl(id).await
    }

    async fn list_schools(&self, ids: Option<Vec<i64>>) -> Result<Vec<School>> {
        self.list_schools_impl(ids).await
    }

    async fn update_school(&self, id: i64, update: UpdateSchoolRequest) -> Result<Option<School>> {
        self.update_school_impl(id, update).await
    }

    // 学期模块
    async fn create_period(&self, period: CreatePeriodRequest) -> Result<AcademicPeriod> {
        self.create_period_impl(period).await
    }

    async fn get_period_by_id(&self, id: i64) -> Result<Option<AcademicPeriod>> {
        self.get_period_by_id_impl(id).await
    }

    async fn list_periods(&self, query: PeriodListQuery) -> Result<Vec<AcademicPeriod>> {
        self.list_periods_impl(query).await
    }

    async fn list_active_periods(&self, school_id: i64) -> Result<Vec<AcademicPeriod>> {
        self.list_active_periods_impl(school_id).await
    }

    async fn update_period(
        &self,
        id: i64,
        update: UpdatePeriodRequest,
    ) -> Result<Option<AcademicPeriod>> {
        self.update_period_impl(id, update).await
    }

    async fn delete_period(&self, id: i64) -> Result<bool> {
        self.delete_period_impl(id).await
    }

    // 班级模块
    async fn create_classroom(&self, classroom: CreateClassroomRequest) -> Result<Classroom> {
        self.create_classroom_impl(classroom).await
    }

    async fn get_classroom_by_id(&self, id: i64) -> Result<Option<Classroom>> {
        self.get_classroom_by_id_impl(id).await
    }

    async fn list_classrooms(&self, query: ClassroomListQuery) -> Result<Vec<Classroom>> {
        self.list_classrooms_impl(query).await
    }

    async fn update_classroom(
        &self,
        id: i64,
        update: UpdateClassroomRequest,
    ) -> Result<Option<Classroom>> {
        self.update_classroom_impl(id, update).await
    }

    async fn delete_classroom(&self, id: i64) -> Result<bool> {
        self.delete_classroom_impl(id).await
    }

    async fn list_classroom_students(&self, classroom_id: i64) -> Result<Vec<Student>> {
        self.list_classroom_students_impl(classroom_id).await
    }

    // 课程模块
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course> {
        self.create_course_impl(course).await
    }

    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(id).await
    }

    async fn list_courses(&self, query: CourseListQuery) -> Result<Vec<Course>> {
        self.list_courses_impl(query).await
    }

    async fn update_course(&self, id: i64, update: UpdateCourseRequest) -> Result<Option<Course>> {
        self.update_course_impl(id, update).await
    }

    async fn delete_course(&self, id: i64) -> Result<bool> {
        self.delete_course_impl(id).await
    }

    // 能力项模块
    async fn create_competency(&self, competency: CreateCompetencyRequest) -> Result<Competency> {
        self.create_competency_impl(competency).await
    }

    async fn get_competency_by_id(&self, id: i64) -> Result<Option<Competency>> {
        self.get_competency_by_id_impl(id).await
    }

    async fn list_competencies(
        &self,
        course_id: i64,
        active_only: bool,
    ) -> Result<Vec<Competency>> {
        self.list_competencies_impl(course_id, active_only).await
    }

    async fn update_competency(
        &self,
        id: i64,
        update: UpdateCompetencyRequest,
    ) -> Result<Option<Competency>> {
        self.update_competency_impl(id, update).await
    }

    async fn delete_competency(&self, id: i64) -> Result<bool> {
        self.delete_competency_impl(id).await
    }

    // 教师分配模块
    async fn create_assignment(
        &self,
        assignment: CreateAssignmentRequest,
    ) -> Result<TeacherAssignment> {
        self.create_assignment_impl(assignment).await
    }

    async fn get_assignment_detail(&self, id: i64) -> Result<Option<AssignmentDetail>> {
        self.get_assignment_detail_impl(id).await
    }

    async fn list_assignment_details(
        &self,
        query: AssignmentListQuery,
    ) -> Result<Vec<AssignmentDetail>> {
        self.list_assignment_details_impl(query).await
    }

    async fn update_assignment(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<TeacherAssignment>> {
        self.update_assignment_impl(id, update).await
    }

    async fn delete_assignment(&self, id: i64) -> Result<bool> {
        self.delete_assignment_impl(id).await
    }

    // 学生模块
    async fn create_student(&self, student: CreateStudentRequest) -> Result<Student> {
        self.create_student_impl(student).await
    }

    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>> {
        self.get_student_by_id_impl(id).await
    }

    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<PaginatedResponse<Student>> {
        self.list_students_with_pagination_impl(query).await
    }

    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        self.update_student_impl(id, update).await
    }

    async fn update_student_status(&self, id: i64, active: bool) -> Result<Option<Student>> {
        self.update_student_status_impl(id, active).await
    }

    // 注册模块
    async fn create_enrollment(&self, student_id: i64, classroom_id: i64) -> Result<Enrollment> {
        self.create_enrollment_impl(student_id, classroom_id).await
    }

    async fn get_enrollment_by_id(&self, id: i64) -> Result<Option<Enrollment>> {
        self.get_enrollment_by_id_impl(id).await
    }

    async fn delete_enrollment(&self, id: i64) -> Result<bool> {
        self.delete_enrollment_impl(id).await
    }

    // 监护人模块
    async fn link_guardian(
        &self,
        student_id: i64,
        link: LinkGuardianRequest,
    ) -> Result<GuardianLink> {
        self.link_guardian_impl(student_id, link).await
    }

    async fn get_guardian_link(
        &self,
        student_id: i64,
        guardian_id: i64,
    ) -> Result<Option<GuardianLink>> {
        self.get_guardian_link_impl(student_id, guardian_id).await
    }

    async fn unlink_guardian(&self, student_id: i64, guardian_id: i64) -> Result<bool> {
        self.unlink_guardian_impl(student_id, guardian_id).await
    }

    async fn list_student_guardians(&self, student_id: i64) -> Result<Vec<GuardianLinkDetail>> {
        self.list_student_guardians_impl(student_id).await
    }

    async fn list_guardian_students(&self, guardian_id: i64) -> Result<Vec<Student>> {
        self.list_guardian_students_impl(guardian_id).await
    }

    // 评价模块
    async fn create_evaluation(
        &self,
        created_by: i64,
        evaluation: CreateEvaluationRequest,
    ) -> Result<Evaluation> {
        self.create_evaluation_impl(created_by, evaluation).await
    }

    async fn get_evaluation_by_id(&self, id: i64) -> Result<Option<Evaluation>> {
        self.get_evaluation_by_id_impl(id).await
    }

    async fn list_evaluations_by_context(
        &self,
        query: ByContextQuery,
    ) -> Result<Vec<EvaluationDetail>> {
        self.list_evaluations_by_context_impl(query).await
    }

    async fn list_student_evaluations(
        &self,
        student_id: i64,
        period_id: Option<i64>,
    ) -> Result<Vec<EvaluationDetail>> {
        self.list_student_evaluations_impl(student_id, period_id)
            .await
    }

    async fn update_evaluation(
        &self,
        id: i64,
        update: UpdateEvaluationRequest,
    ) -> Result<Option<Evaluation>> {
        self.update_evaluation_impl(id, update).await
    }

    async fn delete_evaluation(&self, id: i64) -> Result<bool> {
        self.delete_evaluation_impl(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("schooldesk.db").ok().as_deref(),
            Some("sqlite://schooldesk.db?mode=rwc")
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("postgres://u:p@localhost/school")
                .ok()
                .as_deref(),
            Some("postgres://u:p@localhost/school")
        );
        assert!(matches!(
            SeaOrmStorage::build_database_url("redis://localhost"),
            Err(SchoolError::DatabaseConfig(_))
        ));
    }
}
