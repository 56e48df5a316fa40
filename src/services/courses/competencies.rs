use crate::errors::{Result, SchoolError};
use crate::models::{
    courses::{
        Competency, Course,
        requests::{CreateCompetencyRequest, UpdateCompetencyRequest},
    },
    users::entities::{CurrentUser, UserRole},
};
use crate::services::evaluations::COMPETENCY_NOT_FOUND;
use crate::services::{COURSE_NOT_FOUND, ensure_school_role, found};
use crate::storage::Storage;
use crate::utils::validate::require_text;

// 能力项通过所属课程确定学校
async fn load_with_course(storage: &dyn Storage, id: i64) -> Result<(Competency, Course)> {
    let competency = found(storage.get_competency_by_id(id).await?, COMPETENCY_NOT_FOUND)?;
    let course = found(
        storage.get_course_by_id(competency.course_id).await?,
        COURSE_NOT_FOUND,
    )?;
    Ok((competency, course))
}

/// 按 display_order 排列
pub async fn list_competencies(
    storage: &dyn Storage,
    current: &CurrentUser,
    course_id: i64,
    active_only: bool,
) -> Result<Vec<Competency>> {
    let course = found(storage.get_course_by_id(course_id).await?, COURSE_NOT_FOUND)?;
    ensure_school_role(current, course.school_id, UserRole::all_roles())?;
    storage.list_competencies(course_id, active_only).await
}

pub async fn create_competency(
    storage: &dyn Storage,
    current: &CurrentUser,
    req: CreateCompetencyRequest,
) -> Result<Competency> {
    let course = found(storage.get_course_by_id(req.course_id).await?, COURSE_NOT_FOUND)?;
    ensure_school_role(current, course.school_id, UserRole::school_admin_roles())?;
    require_text("name", &req.name)?;
    storage.create_competency(req).await
}

pub async fn get_competency(
    storage: &dyn Storage,
    current: &CurrentUser,
    id: i64,
) -> Result<Competency> {
    let (competency, course) = load_with_course(storage, id).await?;
    ensure_school_role(current, course.school_id, UserRole::all_roles())?;
    Ok(competency)
}

pub async fn update_competency(
    storage: &dyn Storage,
    current: &CurrentUser,
    id: i64,
    update: UpdateCompetencyRequest,
) -> Result<Competency> {
    let (_, course) = load_with_course(storage, id).await?;
    ensure_school_role(current, course.school_id, UserRole::school_admin_roles())?;
    found(
        storage.update_competency(id, update).await?,
        COMPETENCY_NOT_FOUND,
    )
}

pub async fn delete_competency(
    storage: &dyn Storage,
    current: &CurrentUser,
    id: i64,
) -> Result<()> {
    let (_, course) = load_with_course(storage, id).await?;
    ensure_school_role(current, course.school_id, UserRole::school_admin_roles())?;
    if storage.delete_competency(id).await? {
        Ok(())
    } else {
        Err(SchoolError::missing(COMPETENCY_NOT_FOUND))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{load_current_user, shared};
    use crate::storage::sea_orm_storage::fixtures::{create_user, scenario};

    #[tokio::test]
    async fn test_competency_listing_respects_active_flag() {
        let (storage, s) = shared(scenario().await);
        let teacher = load_current_user(&storage, s.teacher_id).await;

        let active = list_competencies(storage.as_ref(), &teacher, s.course_id, true)
            .await
            .expect("active");
        let ids: Vec<i64> = active.iter().map(|c| c.id).collect();
        assert_eq!(ids, s.competency_ids);

        let all = list_competencies(storage.as_ref(), &teacher, s.course_id, false)
            .await
            .expect("all");
        assert_eq!(all.len(), s.competency_ids.len() + 1);
        assert_eq!(all[0].id, s.inactive_competency_id);
    }

    #[tokio::test]
    async fn test_director_edits_competency_of_own_school() {
        let (storage, s) = shared(scenario().await);
        let director_id = create_user(
            &s.storage,
            "director@school.test",
            Some(s.school_id),
            UserRole::Director,
        )
        .await;
        let director = load_current_user(&storage, director_id).await;
        let teacher = load_current_user(&storage, s.teacher_id).await;

        let err = update_competency(
            storage.as_ref(),
            &teacher,
            s.competency_ids[0],
            UpdateCompetencyRequest {
                display_order: Some(9),
                ..Default::default()
            },
        )
        .await
        .expect_err("teacher refused");
        assert!(matches!(err, SchoolError::Authorization(_)));

        let updated = update_competency(
            storage.as_ref(),
            &director,
            s.competency_ids[0],
            UpdateCompetencyRequest {
                display_order: Some(9),
                ..Default::default()
            },
        )
        .await
        .expect("director updates");
        assert_eq!(updated.display_order, 9);
        assert_eq!(updated.name, "Numbers");

        let err = get_competency(storage.as_ref(), &teacher, s.competency_ids[0] + 100)
            .await
            .expect_err("missing");
        assert_eq!(err, SchoolError::missing(COMPETENCY_NOT_FOUND));
    }
}
