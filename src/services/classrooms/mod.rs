//! 班级服务

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{
    CLASSROOM_NOT_FOUND, SCHOOL_NOT_FOUND, current_user, ensure_school_role, found, respond,
    respond_created, respond_empty,
};
use crate::errors::{Result, SchoolError};
use crate::models::{
    classrooms::{
        Classroom,
        requests::{ClassroomListQuery, CreateClassroomRequest, UpdateClassroomRequest},
    },
    students::Student,
    users::entities::{CurrentUser, UserRole},
};
use crate::storage::Storage;
use crate::utils::validate::{require_text, validate_academic_year};

define_service!(ClassroomService);

impl ClassroomService {
    pub async fn list_classrooms(
        &self,
        query: ClassroomListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond(
            list_classrooms(storage.as_ref(), &current, query).await,
            "Classrooms retrieved successfully",
        )
    }

    pub async fn create_classroom(
        &self,
        req: CreateClassroomRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond_created(
            create_classroom(storage.as_ref(), &current, req).await,
            "Classroom created successfully",
        )
    }

    pub async fn get_classroom(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond(
            get_classroom(storage.as_ref(), &current, id).await,
            "Classroom retrieved successfully",
        )
    }

    pub async fn update_classroom(
        &self,
        id: i64,
        update: UpdateClassroomRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond(
            update_classroom(storage.as_ref(), &current, id, update).await,
            "Classroom updated successfully",
        )
    }

    pub async fn delete_classroom(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond_empty(
            delete_classroom(storage.as_ref(), &current, id).await,
            "Classroom deleted successfully",
        )
    }

    // 班级注册学生
    pub async fn list_students(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond(
            list_students(storage.as_ref(), &current, id).await,
            "Classroom students retrieved successfully",
        )
    }
}

pub async fn list_classrooms(
    storage: &dyn Storage,
    current: &CurrentUser,
    query: ClassroomListQuery,
) -> Result<Vec<Classroom>> {
    ensure_school_role(current, query.school_id, UserRole::staff_roles())?;
    storage.list_classrooms(query).await
}

pub async fn create_classroom(
    storage: &dyn Storage,
    current: &CurrentUser,
    req: CreateClassroomRequest,
) -> Result<Classroom> {
    found(storage.get_school_by_id(req.school_id).await?, SCHOOL_NOT_FOUND)?;
    ensure_school_role(current, req.school_id, UserRole::school_admin_roles())?;
    require_text("grade_level", &req.grade_level)?;
    require_text("section", &req.section)?;
    validate_academic_year(req.academic_year)?;
    storage.create_classroom(req).await
}

pub async fn get_classroom(
    storage: &dyn Storage,
    current: &CurrentUser,
    id: i64,
) -> Result<Classroom> {
    let classroom = found(storage.get_classroom_by_id(id).await?, CLASSROOM_NOT_FOUND)?;
    ensure_school_role(current, classroom.school_id, UserRole::staff_roles())?;
    Ok(classroom)
}

pub async fn update_classroom(
    storage: &dyn Storage,
    current: &CurrentUser,
    id: i64,
    update: UpdateClassroomRequest,
) -> Result<Classroom> {
    let classroom = found(storage.get_classroom_by_id(id).await?, CLASSROOM_NOT_FOUND)?;
    ensure_school_role(current, classroom.school_id, UserRole::school_admin_roles())?;
    if let Some(year) = update.academic_year {
        validate_academic_year(year)?;
    }
    found(
        storage.update_classroom(id, update).await?,
        CLASSROOM_NOT_FOUND,
    )
}

pub async fn delete_classroom(storage: &dyn Storage, current: &CurrentUser, id: i64) -> Result<()> {
    let classroom = found(storage.get_classroom_by_id(id).await?, CLASSROOM_NOT_FOUND)?;
    ensure_school_role(current, classroom.school_id, UserRole::school_admin_roles())?;
    if storage.delete_classroom(id).await? {
        Ok(())
    } else {
        Err(SchoolError::missing(CLASSROOM_NOT_FOUND))
    }
}

pub async fn list_students(
    storage: &dyn Storage,
    current: &CurrentUser,
    id: i64,
) -> Result<Vec<Student>> {
    let classroom = found(storage.get_classroom_by_id(id).await?, CLASSROOM_NOT_FOUND)?;
    ensure_school_role(current, classroom.school_id, UserRole::staff_roles())?;
    storage.list_classroom_students(id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{load_current_user, shared};
    use crate::storage::sea_orm_storage::fixtures::{create_user, scenario};

    #[tokio::test]
    async fn test_classroom_students_visible_to_school_staff_only() {
        let (storage, s) = shared(scenario().await);
        let teacher = load_current_user(&storage, s.teacher_id).await;
        let guardian_id = create_user(
            &s.storage,
            "guardian@school.test",
            Some(s.school_id),
            UserRole::Guardian,
        )
        .await;
        let guardian = load_current_user(&storage, guardian_id).await;

        let students = list_students(storage.as_ref(), &teacher, s.classroom_id)
            .await
            .expect("teacher lists");
        let ids: Vec<i64> = students.iter().map(|st| st.id).collect();
        assert_eq!(ids, s.student_ids);

        let err = list_students(storage.as_ref(), &guardian, s.classroom_id)
            .await
            .expect_err("guardian refused");
        assert!(matches!(err, SchoolError::Authorization(_)));

        let err = list_students(storage.as_ref(), &teacher, s.classroom_id + 100)
            .await
            .expect_err("missing");
        assert_eq!(err, SchoolError::missing(CLASSROOM_NOT_FOUND));
    }

    #[tokio::test]
    async fn test_classroom_name_defaults_to_grade_and_section() {
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

        let new_classroom = || CreateClassroomRequest {
            school_id: s.school_id,
            name: None,
            grade_level: "6".to_string(),
            section: "B".to_string(),
            academic_year: 2025,
        };
        let err = create_classroom(storage.as_ref(), &teacher, new_classroom())
            .await
            .expect_err("teacher cannot create");
        assert!(matches!(err, SchoolError::Authorization(_)));

        let created = create_classroom(storage.as_ref(), &director, new_classroom())
            .await
            .expect("director creates");
        assert_eq!(created.name, "6 B");

        let updated = update_classroom(
            storage.as_ref(),
            &director,
            created.id,
            UpdateClassroomRequest {
                active: Some(false),
                ..Default::default()
            },
        )
        .await
        .expect("deactivate");
        assert!(!updated.active);
        assert_eq!(updated.name, "6 B");
    }
}
