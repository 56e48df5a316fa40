//! 教师分配服务
//!
//! 分配把一名教师绑定到某个班级的某门课程。课程与班级必须属于同一学校，
//! 被分配的用户必须在该学校持有教师角色。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::evaluations::ASSIGNMENT_NOT_FOUND;
use super::{
    CLASSROOM_NOT_FOUND, COURSE_NOT_FOUND, current_user, ensure_school_role, found, respond,
    respond_created, respond_empty,
};
use crate::errors::{Result, SchoolError};
use crate::models::{
    assignments::{
        AssignmentDetail,
        requests::{AssignmentListQuery, CreateAssignmentRequest, UpdateAssignmentRequest},
    },
    users::entities::{CurrentUser, UserRole},
};
use crate::storage::Storage;

define_service!(AssignmentService);

impl AssignmentService {
    pub async fn list_assignments(
        &self,
        query: AssignmentListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond(
            list_assignments(storage.as_ref(), &current, query).await,
            "Assignments retrieved successfully",
        )
    }

    pub async fn create_assignment(
        &self,
        req: CreateAssignmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond_created(
            create_assignment(storage.as_ref(), &current, req).await,
            "Assignment created successfully",
        )
    }

    pub async fn get_assignment(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond(
            get_assignment(storage.as_ref(), &current, id).await,
            "Assignment retrieved successfully",
        )
    }

    pub async fn update_assignment(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond(
            update_assignment(storage.as_ref(), &current, id, update).await,
            "Assignment updated successfully",
        )
    }

    pub async fn delete_assignment(
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
            delete_assignment(storage.as_ref(), &current, id).await,
            "Assignment deleted successfully",
        )
    }
}

async fn ensure_teacher_of_school(
    storage: &dyn Storage,
    teacher_id: i64,
    school_id: i64,
) -> Result<()> {
    if storage
        .user_has_role_in_school(teacher_id, school_id, UserRole::Teacher)
        .await?
    {
        Ok(())
    } else {
        Err(SchoolError::validation(
            "The user is not a teacher of this school",
        ))
    }
}

/// 非 owner 必须指定学校
pub async fn list_assignments(
    storage: &dyn Storage,
    current: &CurrentUser,
    query: AssignmentListQuery,
) -> Result<Vec<AssignmentDetail>> {
    match query.school_id {
        Some(school_id) => ensure_school_role(current, school_id, UserRole::staff_roles())?,
        None if current.is_owner() => {}
        None => return Err(SchoolError::validation("school_id is required")),
    }
    storage.list_assignment_details(query).await
}

pub async fn create_assignment(
    storage: &dyn Storage,
    current: &CurrentUser,
    req: CreateAssignmentRequest,
) -> Result<AssignmentDetail> {
    let course = found(storage.get_course_by_id(req.course_id).await?, COURSE_NOT_FOUND)?;
    let classroom = found(
        storage.get_classroom_by_id(req.classroom_id).await?,
        CLASSROOM_NOT_FOUND,
    )?;
    ensure_school_role(current, classroom.school_id, UserRole::school_admin_roles())?;

    if course.school_id != classroom.school_id {
        return Err(SchoolError::validation(
            "Course and classroom belong to different schools",
        ));
    }
    ensure_teacher_of_school(storage, req.teacher_id, classroom.school_id).await?;

    let assignment = storage.create_assignment(req).await?;
    tracing::info!(
        "Assignment {} created: teacher {} course {} classroom {}",
        assignment.id,
        assignment.teacher_id,
        assignment.course_id,
        assignment.classroom_id
    );
    found(
        storage.get_assignment_detail(assignment.id).await?,
        ASSIGNMENT_NOT_FOUND,
    )
}

/// 分配的教师本人或学校员工
pub async fn get_assignment(
    storage: &dyn Storage,
    current: &CurrentUser,
    id: i64,
) -> Result<AssignmentDetail> {
    let detail = found(storage.get_assignment_detail(id).await?, ASSIGNMENT_NOT_FOUND)?;
    if !detail.is_owned_by(current.id()) {
        ensure_school_role(current, detail.school_id(), UserRole::staff_roles())?;
    }
    Ok(detail)
}

pub async fn update_assignment(
    storage: &dyn Storage,
    current: &CurrentUser,
    id: i64,
    update: UpdateAssignmentRequest,
) -> Result<AssignmentDetail> {
    let detail = found(storage.get_assignment_detail(id).await?, ASSIGNMENT_NOT_FOUND)?;
    ensure_school_role(current, detail.school_id(), UserRole::school_admin_roles())?;
    if let Some(teacher_id) = update.teacher_id {
        ensure_teacher_of_school(storage, teacher_id, detail.school_id()).await?;
    }
    found(storage.update_assignment(id, update).await?, ASSIGNMENT_NOT_FOUND)?;
    found(storage.get_assignment_detail(id).await?, ASSIGNMENT_NOT_FOUND)
}

pub async fn delete_assignment(storage: &dyn Storage, current: &CurrentUser, id: i64) -> Result<()> {
    let detail = found(storage.get_assignment_detail(id).await?, ASSIGNMENT_NOT_FOUND)?;
    ensure_school_role(current, detail.school_id(), UserRole::school_admin_roles())?;
    if storage.delete_assignment(id).await? {
        Ok(())
    } else {
        Err(SchoolError::missing(ASSIGNMENT_NOT_FOUND))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schools::requests::CreateSchoolRequest;
    use crate::services::testing::{load_current_user, shared};
    use crate::storage::sea_orm_storage::fixtures::{create_user, scenario};

    #[tokio::test]
    async fn test_create_requires_teacher_role_in_school() {
        let (storage, s) = shared(scenario().await);
        let director_id = create_user(
            &s.storage,
            "director@school.test",
            Some(s.school_id),
            UserRole::Director,
        )
        .await;
        let director = load_current_user(&storage, director_id).await;

        let other_school = storage
            .create_school(CreateSchoolRequest {
                name: "Colegio Grau".to_string(),
                code: None,
                address: None,
            })
            .await
            .expect("school");
        let foreign_teacher = create_user(
            &s.storage,
            "foreign@school.test",
            Some(other_school.id),
            UserRole::Teacher,
        )
        .await;

        let err = create_assignment(
            storage.as_ref(),
            &director,
            CreateAssignmentRequest {
                teacher_id: foreign_teacher,
                course_id: s.course_id,
                classroom_id: s.classroom_id,
            },
        )
        .await
        .expect_err("teacher of another school");
        assert!(matches!(err, SchoolError::Validation(_)));

        let created = create_assignment(
            storage.as_ref(),
            &director,
            CreateAssignmentRequest {
                teacher_id: s.other_teacher_id,
                course_id: s.course_id,
                classroom_id: s.classroom_id,
            },
        )
        .await
        .expect("create");
        assert_eq!(created.teacher.id, s.other_teacher_id);
        assert_eq!(created.classroom.name, "5 A");
    }

    #[tokio::test]
    async fn test_teacher_reads_own_assignment_only_staff_edits() {
        let (storage, s) = shared(scenario().await);
        let teacher = load_current_user(&storage, s.teacher_id).await;

        let detail = get_assignment(storage.as_ref(), &teacher, s.assignment_id)
            .await
            .expect("own assignment");
        assert_eq!(detail.course.name, "Math");

        let err = update_assignment(
            storage.as_ref(),
            &teacher,
            s.assignment_id,
            UpdateAssignmentRequest {
                active: Some(false),
                ..Default::default()
            },
        )
        .await
        .expect_err("teacher cannot edit");
        assert!(matches!(err, SchoolError::Authorization(_)));

        let err = list_assignments(storage.as_ref(), &teacher, AssignmentListQuery::default())
            .await
            .expect_err("school required");
        assert!(matches!(err, SchoolError::Validation(_)));
    }
}
