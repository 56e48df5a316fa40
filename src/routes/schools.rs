use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::schools::requests::{CreateSchoolRequest, UpdateSchoolRequest};
use crate::models::users::entities::UserRole;
use crate::services::SchoolService;
use crate::utils::SafeIDI64;

// 懒加载的全局 SchoolService 实例
static SCHOOL_SERVICE: Lazy<SchoolService> = Lazy::new(SchoolService::new_lazy);

pub async fn list_schools(req: HttpRequest) -> ActixResult<HttpResponse> {
    SCHOOL_SERVICE.list_schools(&req).await
}

pub async fn create_school(
    req: HttpRequest,
    school_data: web::Json<CreateSchoolRequest>,
) -> ActixResult<HttpResponse> {
    SCHOOL_SERVICE
        .create_school(school_data.into_inner(), &req)
        .await
}

pub async fn get_school(req: HttpRequest, school_id: SafeIDI64) -> ActixResult<HttpResponse> {
    SCHOOL_SERVICE.get_school(school_id.0, &req).await
}

pub async fn update_school(
    req: HttpRequest,
    school_id: SafeIDI64,
    update_data: web::Json<UpdateSchoolRequest>,
) -> ActixResult<HttpResponse> {
    SCHOOL_SERVICE
        .update_school(school_id.0, update_data.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_school_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/schools")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_schools))
            .route("/{id}", web::get().to(get_school))
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::school_admin_roles()))
                    .route("", web::post().to(create_school))
                    .route("/{id}", web::put().to(update_school)),
            ),
    );
}
