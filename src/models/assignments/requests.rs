use serde::Deserialize;

// 分配列表过滤条件
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssignmentListQuery {
    pub school_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub course_id: Option<i64>,
    pub classroom_id: Option<i64>,
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CreateAssignmentRequest {
    pub teacher_id: i64,
    pub course_id: i64,
    pub classroom_id: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateAssignmentRequest {
    pub teacher_id: Option<i64>,
    pub active: Option<bool>,
}
