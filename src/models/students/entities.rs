use serde::{Deserialize, Serialize};

use crate::models::users::UserSummary;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub school_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub document_number: Option<String>,
    pub birth_date: Option<chrono::NaiveDate>,
    pub active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentSummary {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub document_number: Option<String>,
}

impl From<&Student> for StudentSummary {
    fn from(student: &Student) -> Self {
        Self {
            id: student.id,
            first_name: student.first_name.clone(),
            last_name: student.last_name.clone(),
            document_number: student.document_number.clone(),
        }
    }
}

// 学生在班级的注册记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: i64,
    pub student_id: i64,
    pub classroom_id: i64,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
}

// 学生与监护人的关联
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardianLink {
    pub id: i64,
    pub student_id: i64,
    pub guardian_id: i64,
    pub relationship: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardianLinkDetail {
    #[serde(flatten)]
    pub link: GuardianLink,
    pub guardian: UserSummary,
}
