use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::courses::requests::{
    CompetencyListQuery, CourseListQuery, CreateCompetencyRequest, CreateCourseRequest,
    UpdateCompetencyRequest, UpdateCourseRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::CourseService;
use crate::utils::SafeIDI64;

// 懒加载的全局 CourseService 实例，同时处理能力项
static COURSE_SERVICE: Lazy<CourseService> = Lazy::new(CourseService::new_lazy);

pub async fn list_courses(
    req: HttpRequest,
    query: web::Query<CourseListQuery>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.list_courses(query.into_inner(), &req).await
}

pub async fn create_course(
    req: HttpRequest,
    course_data: web::Json<CreateCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .create_course(course_data.into_inner(), &req)
        .await
}

pub async fn get_course(req: HttpRequest, course_id: SafeIDI64) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.get_course(course_id.0, &req).await
}

pub async fn update_course(
    req: HttpRequest,
    course_id: SafeIDI64,
    update_data: web::Json<UpdateCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .update_course(course_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_course(req: HttpRequest, course_id: SafeIDI64) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.delete_course(course_id.0, &req).await
}

pub async fn list_competencies(
    req: HttpRequest,
    course_id: SafeIDI64,
    query: web::Query<CompetencyListQuery>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .list_competencies(course_id.0, query.into_inner(), &req)
        .await
}

pub async fn create_competency(
    req: HttpRequest,
    competency_data: web::Json<CreateCompetencyRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .create_competency(competency_data.into_inner(), &req)
        .await
}

pub async fn get_competency(
    req: HttpRequest,
    competency_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.get_competency(competency_id.0, &req).await
}

pub async fn update_competency(
    req: HttpRequest,
    competency_id: SafeIDI64,
    update_data: web::Json<UpdateCompetencyRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .update_competency(competency_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_competency(
    req: HttpRequest,
    competency_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .delete_competency(competency_id.0, &req)
        .await
}

// 配置路由
pub fn configure_course_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/courses")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_courses))
            .route("/{id}", web::get().to(get_course))
            .route("/{id}/competencies", web::get().to(list_competencies))
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::school_admin_roles()))
                    .route("", web::post().to(create_course))
                    .route("/{id}", web::put().to(update_course))
                    .route("/{id}", web::delete().to(delete_course)),
            ),
    )
    .service(
        web::scope("/api/competencies")
            .wrap(middlewares::RequireJWT)
            .route("/{id}", web::get().to(get_competency))
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::school_admin_roles()))
                    .route("", web::post().to(create_competency))
                    .route("/{id}", web::put().to(update_competency))
                    .route("/{id}", web::delete().to(delete_competency)),
            ),
    );
}
