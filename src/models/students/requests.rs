use crate::models::common::{PaginationQuery, pagination::deserialize_optional_from_str};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct StudentListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub school_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub active: Option<bool>,
    pub search: Option<String>,
}

// 学生列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct StudentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    /// 非 owner 调用者可见的学校
    pub school_ids: Option<Vec<i64>>,
    pub school_id: Option<i64>,
    pub active: Option<bool>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateStudentRequest {
    pub school_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub document_number: Option<String>,
    pub birth_date: Option<chrono::NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateStudentRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub document_number: Option<String>,
    pub birth_date: Option<chrono::NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStudentStatusRequest {
    pub active: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateEnrollmentRequest {
    pub student_id: i64,
    pub classroom_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct LinkGuardianRequest {
    pub guardian_id: i64,
    pub relationship: Option<String>,
}
