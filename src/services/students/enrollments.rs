use super::manage::load_student;
use crate::errors::{Result, SchoolError};
use crate::models::{
    students::{Enrollment, requests::CreateEnrollmentRequest},
    users::entities::{CurrentUser, UserRole},
};
use crate::services::{CLASSROOM_NOT_FOUND, ENROLLMENT_NOT_FOUND, ensure_school_role, found};
use crate::storage::Storage;

/// 学生与班级必须属于同一学校
pub async fn create_enrollment(
    storage: &dyn Storage,
    current: &CurrentUser,
    req: CreateEnrollmentRequest,
) -> Result<Enrollment> {
    let student = load_student(storage, req.student_id).await?;
    let classroom = found(
        storage.get_classroom_by_id(req.classroom_id).await?,
        CLASSROOM_NOT_FOUND,
    )?;
    ensure_school_role(current, classroom.school_id, UserRole::management_roles())?;

    if student.school_id != classroom.school_id {
        return Err(SchoolError::validation(
            "Student and classroom belong to different schools",
        ));
    }

    storage
        .create_enrollment(req.student_id, req.classroom_id)
        .await
}

pub async fn delete_enrollment(storage: &dyn Storage, current: &CurrentUser, id: i64) -> Result<()> {
    let enrollment = found(storage.get_enrollment_by_id(id).await?, ENROLLMENT_NOT_FOUND)?;
    let classroom = found(
        storage.get_classroom_by_id(enrollment.classroom_id).await?,
        CLASSROOM_NOT_FOUND,
    )?;
    ensure_school_role(current, classroom.school_id, UserRole::management_roles())?;

    if storage.delete_enrollment(id).await? {
        Ok(())
    } else {
        Err(SchoolError::missing(ENROLLMENT_NOT_FOUND))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{load_current_user, shared};
    use crate::storage::sea_orm_storage::fixtures::{create_user, scenario};

    #[tokio::test]
    async fn test_enroll_then_remove() {
        let (storage, s) = shared(scenario().await);
        let director_id = create_user(
            &s.storage,
            "director@school.test",
            Some(s.school_id),
            UserRole::Director,
        )
        .await;
        let director = load_current_user(&storage, director_id).await;

        let enrollment = create_enrollment(
            storage.as_ref(),
            &director,
            CreateEnrollmentRequest {
                student_id: s.outsider_student_id,
                classroom_id: s.classroom_id,
            },
        )
        .await
        .expect("enroll");
        let students = storage
            .list_classroom_students(s.classroom_id)
            .await
            .expect("students");
        assert_eq!(students.len(), s.student_ids.len() + 1);

        let err = create_enrollment(
            storage.as_ref(),
            &director,
            CreateEnrollmentRequest {
                student_id: s.outsider_student_id,
                classroom_id: s.classroom_id,
            },
        )
        .await
        .expect_err("duplicate");
        assert!(matches!(err, SchoolError::Conflict(_)));

        delete_enrollment(storage.as_ref(), &director, enrollment.id)
            .await
            .expect("delete");
        let err = delete_enrollment(storage.as_ref(), &director, enrollment.id)
            .await
            .expect_err("already gone");
        assert_eq!(err, SchoolError::missing(ENROLLMENT_NOT_FOUND));
    }
}
