use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classroom {
    pub id: i64,
    pub school_id: i64,
    // 例如 "5 A"
    pub name: String,
    pub grade_level: String,
    pub section: String,
    pub academic_year: i32,
    pub active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassroomSummary {
    pub id: i64,
    pub school_id: i64,
    pub name: String,
    pub grade_level: String,
    pub section: String,
}

impl From<&Classroom> for ClassroomSummary {
    fn from(classroom: &Classroom) -> Self {
        Self {
            id: classroom.id,
            school_id: classroom.school_id,
            name: classroom.name.clone(),
            grade_level: classroom.grade_level.clone(),
            section: classroom.section.clone(),
        }
    }
}
