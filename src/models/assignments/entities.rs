use serde::{Deserialize, Serialize};

use crate::models::classrooms::ClassroomSummary;
use crate::models::courses::CourseSummary;
use crate::models::users::UserSummary;

// 教师在某个班级教授某门课程
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherAssignment {
    pub id: i64,
    pub teacher_id: i64,
    pub course_id: i64,
    pub classroom_id: i64,
    pub active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

pub type TeacherSummary = UserSummary;

// 带教师、课程、班级摘要的分配
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentDetail {
    #[serde(flatten)]
    pub assignment: TeacherAssignment,
    pub teacher: TeacherSummary,
    pub course: CourseSummary,
    pub classroom: ClassroomSummary,
}

impl AssignmentDetail {
    pub fn school_id(&self) -> i64 {
        self.classroom.school_id
    }

    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.assignment.teacher_id == user_id
    }
}
