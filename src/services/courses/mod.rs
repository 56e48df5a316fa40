//! 课程与能力项服务

pub mod competencies;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{
    COURSE_NOT_FOUND, SCHOOL_NOT_FOUND, current_user, ensure_school_role, found, respond,
    respond_created, respond_empty,
};
use crate::errors::{Result, SchoolError};
use crate::models::{
    courses::{
        Course,
        requests::{
            CompetencyListQuery, CourseListQuery, CreateCompetencyRequest, CreateCourseRequest,
            UpdateCompetencyRequest, UpdateCourseRequest,
        },
    },
    users::entities::{CurrentUser, UserRole},
};
use crate::storage::Storage;
use crate::utils::validate::require_text;

define_service!(CourseService);

impl CourseService {
    pub async fn list_courses(
        &self,
        query: CourseListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond(
            list_courses(storage.as_ref(), &current, query).await,
            "Courses retrieved successfully",
        )
    }

    pub async fn create_course(
        &self,
        req: CreateCourseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond_created(
            create_course(storage.as_ref(), &current, req).await,
            "Course created successfully",
        )
    }

    pub async fn get_course(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond(
            get_course(storage.as_ref(), &current, id).await,
            "Course retrieved successfully",
        )
    }

    pub async fn update_course(
        &self,
        id: i64,
        update: UpdateCourseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond(
            update_course(storage.as_ref(), &current, id, update).await,
            "Course updated successfully",
        )
    }

    pub async fn delete_course(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond_empty(
            delete_course(storage.as_ref(), &current, id).await,
            "Course deleted successfully",
        )
    }

    // 课程的能力项
    pub async fn list_competencies(
        &self,
        course_id: i64,
        query: CompetencyListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond(
            competencies::list_competencies(storage.as_ref(), &current, course_id, query.active_only)
                .await,
            "Competencies retrieved successfully",
        )
    }

    pub async fn create_competency(
        &self,
        req: CreateCompetencyRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond_created(
            competencies::create_competency(storage.as_ref(), &current, req).await,
            "Competency created successfully",
        )
    }

    pub async fn get_competency(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond(
            competencies::get_competency(storage.as_ref(), &current, id).await,
            "Competency retrieved successfully",
        )
    }

    pub async fn update_competency(
        &self,
        id: i64,
        update: UpdateCompetencyRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond(
            competencies::update_competency(storage.as_ref(), &current, id, update).await,
            "Competency updated successfully",
        )
    }

    pub async fn delete_competency(
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
            competencies::delete_competency(storage.as_ref(), &current, id).await,
            "Competency deleted successfully",
        )
    }
}

pub async fn list_courses(
    storage: &dyn Storage,
    current: &CurrentUser,
    query: CourseListQuery,
) -> Result<Vec<Course>> {
    ensure_school_role(current, query.school_id, UserRole::all_roles())?;
    storage.list_courses(query).await
}

pub async fn create_course(
    storage: &dyn Storage,
    current: &CurrentUser,
    req: CreateCourseRequest,
) -> Result<Course> {
    found(storage.get_school_by_id(req.school_id).await?, SCHOOL_NOT_FOUND)?;
    ensure_school_role(current, req.school_id, UserRole::school_admin_roles())?;
    require_text("name", &req.name)?;
    storage.create_course(req).await
}

pub async fn get_course(storage: &dyn Storage, current: &CurrentUser, id: i64) -> Result<Course> {
    let course = found(storage.get_course_by_id(id).await?, COURSE_NOT_FOUND)?;
    ensure_school_role(current, course.school_id, UserRole::all_roles())?;
    Ok(course)
}

pub async fn update_course(
    storage: &dyn Storage,
    current: &CurrentUser,
    id: i64,
    update: UpdateCourseRequest,
) -> Result<Course> {
    let course = found(storage.get_course_by_id(id).await?, COURSE_NOT_FOUND)?;
    ensure_school_role(current, course.school_id, UserRole::school_admin_roles())?;
    found(storage.update_course(id, update).await?, COURSE_NOT_FOUND)
}

pub async fn delete_course(storage: &dyn Storage, current: &CurrentUser, id: i64) -> Result<()> {
    let course = found(storage.get_course_by_id(id).await?, COURSE_NOT_FOUND)?;
    ensure_school_role(current, course.school_id, UserRole::school_admin_roles())?;
    if storage.delete_course(id).await? {
        Ok(())
    } else {
        Err(SchoolError::missing(COURSE_NOT_FOUND))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{load_current_user, shared};
    use crate::storage::sea_orm_storage::fixtures::{create_user, scenario};

    #[tokio::test]
    async fn test_course_listing_scoped_to_school() {
        let (storage, s) = shared(scenario().await);
        let teacher = load_current_user(&storage, s.teacher_id).await;

        let courses = list_courses(
            storage.as_ref(),
            &teacher,
            CourseListQuery {
                school_id: s.school_id,
                active: None,
            },
        )
        .await
        .expect("list");
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].name, "Math");

        let err = list_courses(
            storage.as_ref(),
            &teacher,
            CourseListQuery {
                school_id: s.school_id + 1,
                active: None,
            },
        )
        .await
        .expect_err("other school");
        assert!(matches!(err, SchoolError::Authorization(_)));
    }

    #[tokio::test]
    async fn test_administrative_cannot_edit_catalog() {
        let (storage, s) = shared(scenario().await);
        let staff_id = create_user(
            &s.storage,
            "admin@school.test",
            Some(s.school_id),
            UserRole::Administrative,
        )
        .await;
        let staff = load_current_user(&storage, staff_id).await;

        let err = update_course(
            storage.as_ref(),
            &staff,
            s.course_id,
            UpdateCourseRequest {
                name: Some("Matematica".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect_err("administrative refused");
        assert!(matches!(err, SchoolError::Authorization(_)));

        let err = get_course(storage.as_ref(), &staff, s.course_id + 100)
            .await
            .expect_err("missing");
        assert_eq!(err, SchoolError::missing(COURSE_NOT_FOUND));
    }
}
