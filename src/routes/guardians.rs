use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::evaluations::requests::StudentEvaluationsQuery;
use crate::models::users::entities::UserRole;
use crate::services::GuardianService;
use crate::utils::SafeStudentIdI64;

// 懒加载的全局 GuardianService 实例
static GUARDIAN_SERVICE: Lazy<GuardianService> = Lazy::new(GuardianService::new_lazy);

pub async fn my_students(req: HttpRequest) -> ActixResult<HttpResponse> {
    GUARDIAN_SERVICE.my_students(&req).await
}

pub async fn student_evaluations(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
    query: web::Query<StudentEvaluationsQuery>,
) -> ActixResult<HttpResponse> {
    GUARDIAN_SERVICE
        .student_evaluations(student_id.0, query.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_guardian_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/guardians/me")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::guardian_roles()))
                    .route("/students", web::get().to(my_students))
                    .route(
                        "/students/{student_id}/evaluations",
                        web::get().to(student_evaluations),
                    ),
            ),
    );
}
