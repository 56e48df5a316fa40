use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::students::requests::{
    CreateEnrollmentRequest, CreateStudentRequest, LinkGuardianRequest, StudentListParams,
    UpdateStudentRequest, UpdateStudentStatusRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::StudentService;
use crate::utils::{SafeGuardianIdI64, SafeIDI64};

// 懒加载的全局 StudentService 实例，同时处理注册记录
static STUDENT_SERVICE: Lazy<StudentService> = Lazy::new(StudentService::new_lazy);

pub async fn list_students(
    req: HttpRequest,
    query: web::Query<StudentListParams>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.list_students(query.into_inner(), &req).await
}

pub async fn create_student(
    req: HttpRequest,
    student_data: web::Json<CreateStudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .create_student(student_data.into_inner(), &req)
        .await
}

pub async fn get_student(req: HttpRequest, student_id: SafeIDI64) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_student(student_id.0, &req).await
}

pub async fn update_student(
    req: HttpRequest,
    student_id: SafeIDI64,
    update_data: web::Json<UpdateStudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .update_student(student_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn update_student_status(
    req: HttpRequest,
    student_id: SafeIDI64,
    status_data: web::Json<UpdateStudentStatusRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .update_student_status(student_id.0, status_data.into_inner(), &req)
        .await
}

pub async fn list_guardians(req: HttpRequest, student_id: SafeIDI64) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.list_guardians(student_id.0, &req).await
}

pub async fn link_guardian(
    req: HttpRequest,
    student_id: SafeIDI64,
    link_data: web::Json<LinkGuardianRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .link_guardian(student_id.0, link_data.into_inner(), &req)
        .await
}

pub async fn unlink_guardian(
    req: HttpRequest,
    student_id: SafeIDI64,
    guardian_id: SafeGuardianIdI64,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .unlink_guardian(student_id.0, guardian_id.0, &req)
        .await
}

pub async fn create_enrollment(
    req: HttpRequest,
    enrollment_data: web::Json<CreateEnrollmentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .create_enrollment(enrollment_data.into_inner(), &req)
        .await
}

pub async fn delete_enrollment(
    req: HttpRequest,
    enrollment_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .delete_enrollment(enrollment_id.0, &req)
        .await
}

// 配置路由
pub fn configure_student_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/students")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                    .route("", web::get().to(list_students))
                    .route("", web::post().to(create_student))
                    .route("/{id}", web::get().to(get_student))
                    .route("/{id}", web::put().to(update_student))
                    .route("/{id}/status", web::patch().to(update_student_status))
                    .route("/{id}/guardians", web::get().to(list_guardians))
                    .route("/{id}/guardians", web::post().to(link_guardian))
                    .route(
                        "/{id}/guardians/{guardian_id}",
                        web::delete().to(unlink_guardian),
                    ),
            ),
    )
    .service(
        web::scope("/api/enrollments")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::management_roles()))
                    .route("", web::post().to(create_enrollment))
                    .route("/{id}", web::delete().to(delete_enrollment)),
            ),
    );
}
