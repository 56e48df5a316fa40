use crate::errors::Result;
use crate::models::{
    assignments::{AssignmentDetail, requests::AssignmentListQuery},
    periods::AcademicPeriod,
    users::entities::{CurrentUser, UserRole},
};
use crate::services::ensure_school_role;
use crate::storage::Storage;

/// 调用者自己的启用分配（mis-asignaciones）
pub async fn my_assignments(
    storage: &dyn Storage,
    current: &CurrentUser,
) -> Result<Vec<AssignmentDetail>> {
    storage
        .list_assignment_details(AssignmentListQuery {
            teacher_id: Some(current.id()),
            active: Some(true),
            ..Default::default()
        })
        .await
}

/// 学校的启用学期（periodos-activos），调用者需在该学校持有角色
pub async fn active_periods(
    storage: &dyn Storage,
    current: &CurrentUser,
    school_id: i64,
) -> Result<Vec<AcademicPeriod>> {
    ensure_school_role(current, school_id, UserRole::all_roles())?;
    storage.list_active_periods(school_id).await
}
