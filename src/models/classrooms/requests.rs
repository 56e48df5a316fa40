use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ClassroomListQuery {
    pub school_id: i64,
    pub academic_year: Option<i32>,
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CreateClassroomRequest {
    pub school_id: i64,
    /// 为空时由 grade_level 与 section 组成
    pub name: Option<String>,
    pub grade_level: String,
    pub section: String,
    pub academic_year: i32,
}

impl CreateClassroomRequest {
    pub fn display_name(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("{} {}", self.grade_level.trim(), self.section.trim()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateClassroomRequest {
    pub name: Option<String>,
    pub grade_level: Option<String>,
    pub section: Option<String>,
    pub academic_year: Option<i32>,
    pub active: Option<bool>,
}
