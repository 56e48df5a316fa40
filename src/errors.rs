//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use actix_web::http::StatusCode;
use sea_orm::{DbErr, SqlErr};
use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
///
/// 另外固定生成 `Missing(Resource)`，表示某个已知实体不存在。
macro_rules! define_school_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum SchoolError {
            $($variant(String),)*
            Missing(Resource),
        }

        impl SchoolError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(SchoolError::$variant(_) => $code,)*
                    SchoolError::Missing(_) => "E007",
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(SchoolError::$variant(_) => $type_name,)*
                    SchoolError::Missing(_) => "Resource Not Found",
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(SchoolError::$variant(msg) => msg,)*
                    SchoolError::Missing(resource) => resource.not_found_message(),
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl SchoolError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        SchoolError::$variant(msg.into())
                    }
                )*

                pub fn missing(resource: Resource) -> Self {
                    SchoolError::Missing(resource)
                }
            }
        }
    };
}

/// 404 时可以指明的实体
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    User,
    School,
    Period,
    Classroom,
    Course,
    Competency,
    Assignment,
    Student,
    Enrollment,
    GuardianLink,
    Evaluation,
}

impl Resource {
    pub fn not_found_message(self) -> &'static str {
        match self {
            Resource::User => "User not found",
            Resource::School => "School not found",
            Resource::Period => "Academic period not found",
            Resource::Classroom => "Classroom not found",
            Resource::Course => "Course not found",
            Resource::Competency => "Competency not found",
            Resource::Assignment => "Assignment not found",
            Resource::Student => "Student not found",
            Resource::Enrollment => "Enrollment not found",
            Resource::GuardianLink => "Guardian link not found",
            Resource::Evaluation => "Evaluation not found",
        }
    }
}

define_school_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    DatabaseConfig("E002", "Database Configuration Error"),
    DatabaseConnection("E003", "Database Connection Error"),
    DatabaseOperation("E004", "Database Operation Error"),
    FileOperation("E005", "File Operation Error"),
    Validation("E006", "Validation Error"),
    NotFound("E007", "Resource Not Found"),
    Conflict("E008", "Resource Conflict"),
    Serialization("E009", "Serialization Error"),
    DateParse("E010", "Date Parse Error"),
    Authentication("E011", "Authentication Error"),
    Authorization("E012", "Authorization Error"),
}

impl SchoolError {
    /// 把数据库错误按约束类型归类，附带上下文
    pub fn from_db_err(context: &str, err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                SchoolError::Conflict(format!("{context}: {detail}"))
            }
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                SchoolError::Validation(format!("{context}: {detail}"))
            }
            _ => SchoolError::DatabaseOperation(format!("{context}: {err}")),
        }
    }

    /// 对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            SchoolError::Validation(_) | SchoolError::DateParse(_) => StatusCode::BAD_REQUEST,
            SchoolError::NotFound(_) | SchoolError::Missing(_) => StatusCode::NOT_FOUND,
            SchoolError::Conflict(_) => StatusCode::CONFLICT,
            SchoolError::Authentication(_) => StatusCode::UNAUTHORIZED,
            SchoolError::Authorization(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for SchoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for SchoolError {}

// 为常见的错误类型实现 From trait
impl From<DbErr> for SchoolError {
    fn from(err: DbErr) -> Self {
        SchoolError::from_db_err("Database error", err)
    }
}

impl From<std::io::Error> for SchoolError {
    fn from(err: std::io::Error) -> Self {
        SchoolError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for SchoolError {
    fn from(err: serde_json::Error) -> Self {
        SchoolError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for SchoolError {
    fn from(err: chrono::ParseError) -> Self {
        SchoolError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SchoolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SchoolError::cache_connection("test").code(), "E001");
        assert_eq!(SchoolError::database_config("test").code(), "E002");
        assert_eq!(SchoolError::validation("test").code(), "E006");
        assert_eq!(SchoolError::not_found("test").code(), "E007");
        assert_eq!(SchoolError::authorization("test").code(), "E012");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            SchoolError::not_found("Assignment not found").error_type(),
            "Resource Not Found"
        );
        assert_eq!(
            SchoolError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            SchoolError::not_found("x").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            SchoolError::authorization("x").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            SchoolError::validation("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(SchoolError::conflict("x").status_code(), StatusCode::CONFLICT);
        assert_eq!(
            SchoolError::database_operation("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_plain_db_error_is_database_operation() {
        let err = SchoolError::from_db_err("查询失败", DbErr::Custom("boom".into()));
        assert_eq!(err.code(), "E004");
        assert!(err.message().contains("查询失败"));
    }

    #[test]
    fn test_missing_resource_reads_like_not_found() {
        let err = SchoolError::missing(Resource::Period);
        assert_eq!(err.code(), "E007");
        assert_eq!(err.error_type(), "Resource Not Found");
        assert_eq!(err.message(), "Academic period not found");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_ne!(err, SchoolError::not_found("Academic period not found"));
    }

    #[test]
    fn test_format_simple() {
        let err = SchoolError::not_found("Academic period not found");
        let formatted = err.format_simple();
        assert!(formatted.contains("Resource Not Found"));
        assert!(formatted.contains("Academic period not found"));
    }
}
