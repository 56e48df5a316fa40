//! 数据模型定义
//!
//! 这里是业务层与 HTTP 层共用的实体、请求与响应结构，与 `entity` 模块中的
//! 数据库实体分离。

pub mod assignments;
pub mod auth;
pub mod classrooms;
pub mod common;
pub mod courses;
pub mod evaluations;
pub mod periods;
pub mod schools;
pub mod students;
pub mod users;

pub use common::{ApiResponse, PaginatedResponse, PaginationInfo, PaginationQuery};

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务错误码，随 `ApiResponse.code` 返回
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    InternalServerError = 1500,

    // 认证
    AuthFailed = 2000,
    AccountInactive = 2001,
    TokenInvalid = 2002,

    // 用户
    UserNotFound = 3000,
    UserAlreadyExists = 3001,
    UserEmailInvalid = 3002,
    UserPasswordInvalid = 3003,
    UserCreationFailed = 3004,
    RoleNotFound = 3010,
    RoleAlreadyAssigned = 3011,

    // 学校目录
    SchoolNotFound = 4000,
    PeriodNotFound = 4010,
    ClassroomNotFound = 4020,
    CourseNotFound = 4030,
    CompetencyNotFound = 4040,

    // 分配、学生
    AssignmentNotFound = 5000,
    StudentNotFound = 5100,
    EnrollmentNotFound = 5110,
    GuardianLinkNotFound = 5120,

    // 评价
    EvaluationNotFound = 6000,
}

impl From<&crate::errors::SchoolError> for ErrorCode {
    fn from(err: &crate::errors::SchoolError) -> Self {
        use crate::errors::{Resource, SchoolError};
        match err {
            SchoolError::Validation(_) | SchoolError::DateParse(_) => ErrorCode::BadRequest,
            SchoolError::NotFound(_) => ErrorCode::NotFound,
            SchoolError::Missing(resource) => match resource {
                Resource::User => ErrorCode::UserNotFound,
                Resource::School => ErrorCode::SchoolNotFound,
                Resource::Period => ErrorCode::PeriodNotFound,
                Resource::Classroom => ErrorCode::ClassroomNotFound,
                Resource::Course => ErrorCode::CourseNotFound,
                Resource::Competency => ErrorCode::CompetencyNotFound,
                Resource::Assignment => ErrorCode::AssignmentNotFound,
                Resource::Student => ErrorCode::StudentNotFound,
                Resource::Enrollment => ErrorCode::EnrollmentNotFound,
                Resource::GuardianLink => ErrorCode::GuardianLinkNotFound,
                Resource::Evaluation => ErrorCode::EvaluationNotFound,
            },
            SchoolError::Conflict(_) => ErrorCode::Conflict,
            SchoolError::Authentication(_) => ErrorCode::Unauthorized,
            SchoolError::Authorization(_) => ErrorCode::Forbidden,
            _ => ErrorCode::InternalServerError,
        }
    }
}
