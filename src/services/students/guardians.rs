use super::manage::load_student;
use crate::errors::{Result, SchoolError};
use crate::models::{
    students::{GuardianLink, GuardianLinkDetail, requests::LinkGuardianRequest},
    users::entities::{CurrentUser, UserRole},
};
use crate::services::{GUARDIAN_LINK_NOT_FOUND, USER_NOT_FOUND, ensure_school_role, found};
use crate::storage::Storage;

pub async fn list_guardians(
    storage: &dyn Storage,
    current: &CurrentUser,
    student_id: i64,
) -> Result<Vec<GuardianLinkDetail>> {
    let student = load_student(storage, student_id).await?;
    ensure_school_role(current, student.school_id, UserRole::staff_roles())?;
    storage.list_student_guardians(student_id).await
}

/// 被关联的用户必须在学生所在学校持有监护人角色
pub async fn link_guardian(
    storage: &dyn Storage,
    current: &CurrentUser,
    student_id: i64,
    link: LinkGuardianRequest,
) -> Result<GuardianLink> {
    let student = load_student(storage, student_id).await?;
    ensure_school_role(current, student.school_id, UserRole::management_roles())?;
    found(storage.get_user_by_id(link.guardian_id).await?, USER_NOT_FOUND)?;

    if !storage
        .user_has_role_in_school(link.guardian_id, student.school_id, UserRole::Guardian)
        .await?
    {
        return Err(SchoolError::validation(
            "The user is not a guardian of this school",
        ));
    }

    storage.link_guardian(student_id, link).await
}

pub async fn unlink_guardian(
    storage: &dyn Storage,
    current: &CurrentUser,
    student_id: i64,
    guardian_id: i64,
) -> Result<()> {
    let student = load_student(storage, student_id).await?;
    ensure_school_role(current, student.school_id, UserRole::management_roles())?;

    if storage.unlink_guardian(student_id, guardian_id).await? {
        Ok(())
    } else {
        Err(SchoolError::missing(GUARDIAN_LINK_NOT_FOUND))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{load_current_user, shared};
    use crate::storage::sea_orm_storage::fixtures::{create_user, scenario};

    #[tokio::test]
    async fn test_link_requires_guardian_role() {
        let (storage, s) = shared(scenario().await);
        let staff_id = create_user(
            &s.storage,
            "admin@school.test",
            Some(s.school_id),
            UserRole::Administrative,
        )
        .await;
        let staff = load_current_user(&storage, staff_id).await;
        let guardian_id = create_user(
            &s.storage,
            "parent@school.test",
            Some(s.school_id),
            UserRole::Guardian,
        )
        .await;

        let err = link_guardian(
            storage.as_ref(),
            &staff,
            s.student_ids[0],
            LinkGuardianRequest {
                guardian_id: s.teacher_id,
                relationship: None,
            },
        )
        .await
        .expect_err("teacher is not a guardian");
        assert!(matches!(err, SchoolError::Validation(_)));

        link_guardian(
            storage.as_ref(),
            &staff,
            s.student_ids[0],
            LinkGuardianRequest {
                guardian_id,
                relationship: Some("mother".to_string()),
            },
        )
        .await
        .expect("link");

        let guardians = list_guardians(storage.as_ref(), &staff, s.student_ids[0])
            .await
            .expect("list");
        assert_eq!(guardians.len(), 1);
        assert_eq!(guardians[0].guardian.id, guardian_id);
        assert_eq!(guardians[0].link.relationship.as_deref(), Some("mother"));

        unlink_guardian(storage.as_ref(), &staff, s.student_ids[0], guardian_id)
            .await
            .expect("unlink");
        let err = unlink_guardian(storage.as_ref(), &staff, s.student_ids[0], guardian_id)
            .await
            .expect_err("already unlinked");
        assert_eq!(err, SchoolError::missing(GUARDIAN_LINK_NOT_FOUND));
    }
}
