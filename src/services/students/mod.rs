//! 学生服务，包括班级注册与监护人关联

pub mod enrollments;
pub mod guardians;
pub mod manage;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{current_user, respond, respond_created, respond_empty};
use crate::models::students::requests::{
    CreateEnrollmentRequest, CreateStudentRequest, LinkGuardianRequest, StudentListParams,
    UpdateStudentRequest, UpdateStudentStatusRequest,
};

define_service!(StudentService);

impl StudentService {
    pub async fn list_students(
        &self,
        query: StudentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond(
            manage::list_students(storage.as_ref(), &current, query).await,
            "Students retrieved successfully",
        )
    }

    pub async fn create_student(
        &self,
        req: CreateStudentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond_created(
            manage::create_student(storage.as_ref(), &current, req).await,
            "Student created successfully",
        )
    }

    pub async fn get_student(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond(
            manage::get_student(storage.as_ref(), &current, id).await,
            "Student retrieved successfully",
        )
    }

    pub async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond(
            manage::update_student(storage.as_ref(), &current, id, update).await,
            "Student updated successfully",
        )
    }

    pub async fn update_student_status(
        &self,
        id: i64,
        status: UpdateStudentStatusRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond(
            manage::update_student_status(storage.as_ref(), &current, id, status.active).await,
            "Student status updated successfully",
        )
    }

    pub async fn list_guardians(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond(
            guardians::list_guardians(storage.as_ref(), &current, id).await,
            "Guardians retrieved successfully",
        )
    }

    pub async fn link_guardian(
        &self,
        id: i64,
        link: LinkGuardianRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond_created(
            guardians::link_guardian(storage.as_ref(), &current, id, link).await,
            "Guardian linked successfully",
        )
    }

    pub async fn unlink_guardian(
        &self,
        id: i64,
        guardian_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond_empty(
            guardians::unlink_guardian(storage.as_ref(), &current, id, guardian_id).await,
            "Guardian unlinked successfully",
        )
    }

    pub async fn create_enrollment(
        &self,
        req: CreateEnrollmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond_created(
            enrollments::create_enrollment(storage.as_ref(), &current, req).await,
            "Student enrolled successfully",
        )
    }

    pub async fn delete_enrollment(
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
            enrollments::delete_enrollment(storage.as_ref(), &current, id).await,
            "Enrollment deleted successfully",
        )
    }
}
