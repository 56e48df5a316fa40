use crate::errors::{Result, SchoolError};
use crate::models::{
    common::PaginatedResponse,
    students::{
        Student,
        requests::{CreateStudentRequest, StudentListParams, StudentListQuery, UpdateStudentRequest},
    },
    users::entities::{CurrentUser, UserRole},
};
use crate::services::evaluations::STUDENT_NOT_FOUND;
use crate::services::{SCHOOL_NOT_FOUND, ensure_school_role, found};
use crate::storage::Storage;
use crate::utils::validate::{require_text, validate_document_number};

pub(crate) async fn load_student(storage: &dyn Storage, id: i64) -> Result<Student> {
    found(storage.get_student_by_id(id).await?, STUDENT_NOT_FOUND)
}

fn check_document(document: Option<&str>) -> Result<()> {
    match document {
        Some(document) => validate_document_number(document).map_err(SchoolError::validation),
        None => Ok(()),
    }
}

/// 非 owner 只能看到自己任职学校的学生
pub async fn list_students(
    storage: &dyn Storage,
    current: &CurrentUser,
    params: StudentListParams,
) -> Result<PaginatedResponse<Student>> {
    let mut query = StudentListQuery {
        page: Some(params.pagination.page),
        size: Some(params.pagination.size),
        school_ids: None,
        school_id: params.school_id,
        active: params.active,
        search: params.search.filter(|s| !s.trim().is_empty()),
    };

    if !current.is_owner() {
        if let Some(school_id) = query.school_id {
            ensure_school_role(current, school_id, UserRole::staff_roles())?;
        }
        query.school_ids = Some(
            current
                .roles
                .iter()
                .filter(|r| r.active && UserRole::staff_roles().contains(&r.role))
                .filter_map(|r| r.school_id)
                .collect(),
        );
    }

    storage.list_students_with_pagination(query).await
}

pub async fn create_student(
    storage: &dyn Storage,
    current: &CurrentUser,
    req: CreateStudentRequest,
) -> Result<Student> {
    found(storage.get_school_by_id(req.school_id).await?, SCHOOL_NOT_FOUND)?;
    ensure_school_role(current, req.school_id, UserRole::management_roles())?;
    require_text("first_name", &req.first_name)?;
    require_text("last_name", &req.last_name)?;
    check_document(req.document_number.as_deref())?;
    storage.create_student(req).await
}

pub async fn get_student(storage: &dyn Storage, current: &CurrentUser, id: i64) -> Result<Student> {
    let student = load_student(storage, id).await?;
    ensure_school_role(current, student.school_id, UserRole::staff_roles())?;
    Ok(student)
}

pub async fn update_student(
    storage: &dyn Storage,
    current: &CurrentUser,
    id: i64,
    update: UpdateStudentRequest,
) -> Result<Student> {
    let student = load_student(storage, id).await?;
    ensure_school_role(current, student.school_id, UserRole::management_roles())?;
    if let Some(first_name) = &update.first_name {
        require_text("first_name", first_name)?;
    }
    if let Some(last_name) = &update.last_name {
        require_text("last_name", last_name)?;
    }
    check_document(update.document_number.as_deref())?;
    found(storage.update_student(id, update).await?, STUDENT_NOT_FOUND)
}

pub async fn update_student_status(
    storage: &dyn Storage,
    current: &CurrentUser,
    id: i64,
    active: bool,
) -> Result<Student> {
    let student = load_student(storage, id).await?;
    ensure_school_role(current, student.school_id, UserRole::management_roles())?;
    found(
        storage.update_student_status(id, active).await?,
        STUDENT_NOT_FOUND,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaginationQuery;
    use crate::services::testing::{load_current_user, shared};
    use crate::storage::sea_orm_storage::fixtures::{create_user, scenario};

    fn params(search: Option<&str>) -> StudentListParams {
        StudentListParams {
            pagination: PaginationQuery { page: 1, size: 50 },
            school_id: None,
            active: None,
            search: search.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_listing_limited_to_callers_schools() {
        let (storage, s) = shared(scenario().await);
        let teacher = load_current_user(&storage, s.teacher_id).await;
        let outsider_id = create_user(&s.storage, "outsider@school.test", None, UserRole::Guardian)
            .await;
        let outsider = load_current_user(&storage, outsider_id).await;

        let page = list_students(storage.as_ref(), &teacher, params(None))
            .await
            .expect("list");
        assert_eq!(page.items.len(), s.student_ids.len() + 1);

        let page = list_students(storage.as_ref(), &teacher, params(Some("mendoza")))
            .await
            .expect("search");
        assert_eq!(page.items.len(), 2);

        let page = list_students(storage.as_ref(), &outsider, params(None))
            .await
            .expect("list");
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn test_administrative_toggles_student_teacher_cannot() {
        let (storage, s) = shared(scenario().await);
        let staff_id = create_user(
            &s.storage,
            "admin@school.test",
            Some(s.school_id),
            UserRole::Administrative,
        )
        .await;
        let staff = load_current_user(&storage, staff_id).await;
        let teacher = load_current_user(&storage, s.teacher_id).await;

        let err = update_student_status(storage.as_ref(), &teacher, s.student_ids[0], false)
            .await
            .expect_err("teacher refused");
        assert!(matches!(err, SchoolError::Authorization(_)));

        let student = update_student_status(storage.as_ref(), &staff, s.student_ids[0], false)
            .await
            .expect("toggle");
        assert!(!student.active);

        let err = get_student(storage.as_ref(), &teacher, s.outsider_student_id + 100)
            .await
            .expect_err("missing");
        assert_eq!(err, SchoolError::missing(STUDENT_NOT_FOUND));
    }
}
