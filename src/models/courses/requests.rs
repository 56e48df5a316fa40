use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CourseListQuery {
    pub school_id: i64,
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    pub school_id: i64,
    pub name: String,
    pub code: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCourseRequest {
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CompetencyListQuery {
    /// 只返回启用的能力项
    #[serde(default)]
    pub active_only: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateCompetencyRequest {
    pub course_id: i64,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub display_order: i32,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCompetencyRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub display_order: Option<i32>,
    pub active: Option<bool>,
}
