//! 评价接口 `/api/evaluaciones`，路径沿用前端使用的西班牙语名称

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::evaluations::requests::{
    ActivePeriodsQuery, ByContextQuery, ContextQuery, CreateEvaluationRequest,
    UpdateEvaluationRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::EvaluationService;
use crate::utils::SafeIDI64;

// 懒加载的全局 EvaluationService 实例
static EVALUATION_SERVICE: Lazy<EvaluationService> = Lazy::new(EvaluationService::new_lazy);

pub async fn my_assignments(req: HttpRequest) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE.my_assignments(&req).await
}

pub async fn active_periods(
    req: HttpRequest,
    query: web::Query<ActivePeriodsQuery>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .active_periods(query.into_inner(), &req)
        .await
}

pub async fn work_context(
    req: HttpRequest,
    query: web::Query<ContextQuery>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .work_context(query.into_inner(), &req)
        .await
}

pub async fn list_by_context(
    req: HttpRequest,
    query: web::Query<ByContextQuery>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .list_by_context(query.into_inner(), &req)
        .await
}

pub async fn create_evaluation(
    req: HttpRequest,
    evaluation_data: web::Json<CreateEvaluationRequest>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .create_evaluation(evaluation_data.into_inner(), &req)
        .await
}

pub async fn get_evaluation(
    req: HttpRequest,
    evaluation_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE.get_evaluation(evaluation_id.0, &req).await
}

pub async fn update_evaluation(
    req: HttpRequest,
    evaluation_id: SafeIDI64,
    update_data: web::Json<UpdateEvaluationRequest>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .update_evaluation(evaluation_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_evaluation(
    req: HttpRequest,
    evaluation_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .delete_evaluation(evaluation_id.0, &req)
        .await
}

// 配置路由
pub fn configure_evaluation_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/evaluaciones")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new(UserRole::Teacher))
                    .route("/mis-asignaciones", web::get().to(my_assignments))
                    .route("/periodos-activos", web::get().to(active_periods))
                    .route("/contexto-trabajo", web::get().to(work_context))
                    .route("/por-contexto", web::get().to(list_by_context))
                    .route("", web::post().to(create_evaluation))
                    .route("/{id}", web::get().to(get_evaluation))
                    .route("/{id}", web::patch().to(update_evaluation))
                    .route("/{id}", web::delete().to(delete_evaluation)),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{MokaCacheWrapper, ObjectCache};
    use crate::services::testing::shared;
    use crate::storage::sea_orm_storage::fixtures::{create_user, scenario};
    use crate::utils::jwt::JwtUtils;
    use actix_web::{App, http::StatusCode, test};
    use std::sync::Arc;

    fn bearer(user_id: i64) -> (&'static str, String) {
        let token = JwtUtils::generate_access_token(user_id).expect("token");
        ("Authorization", format!("Bearer {token}"))
    }

    #[actix_web::test]
    async fn test_work_context_over_http() {
        let (storage, s) = shared(scenario().await);
        let director_id = create_user(
            &s.storage,
            "director@school.test",
            Some(s.school_id),
            UserRole::Director,
        )
        .await;
        let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::new(100, 60));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .app_data(web::Data::new(cache))
                .configure(configure_evaluation_routes),
        )
        .await;

        let uri = format!(
            "/api/evaluaciones/contexto-trabajo?profesorAsignacionId={}&periodoId={}",
            s.assignment_id, s.period_id
        );

        let req = test::TestRequest::get().uri(&uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri(&uri)
            .insert_header(bearer(s.teacher_id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 0);
        assert_eq!(
            body["data"]["students"].as_array().map(Vec::len),
            Some(s.student_ids.len())
        );
        assert_eq!(body["data"]["period"]["name"], "Bimester 1");

        let req = test::TestRequest::get()
            .uri(&uri)
            .insert_header(bearer(s.other_teacher_id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        // 非教师角色在路由层被拒绝
        let req = test::TestRequest::get()
            .uri(&uri)
            .insert_header(bearer(director_id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::get()
            .uri(&format!(
                "/api/evaluaciones/contexto-trabajo?profesorAsignacionId={}&periodoId={}",
                s.assignment_id + 100,
                s.period_id
            ))
            .insert_header(bearer(s.teacher_id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 5000);
        assert_eq!(body["message"], "Assignment not found");
    }

    #[actix_web::test]
    async fn test_every_evaluation_route_reaches_its_handler() {
        let (storage, s) = shared(scenario().await);
        let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::new(100, 60));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .app_data(web::Data::new(cache))
                .configure(configure_evaluation_routes),
        )
        .await;
        let auth = || bearer(s.teacher_id);

        // 具名路径先于 /{id} 注册，不会被当成 id 解析
        let req = test::TestRequest::get()
            .uri("/api/evaluaciones/mis-asignaciones")
            .insert_header(auth())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"][0]["id"], s.assignment_id);
        assert_eq!(body["data"][0]["course"]["name"], "Math");

        let req = test::TestRequest::get()
            .uri(&format!(
                "/api/evaluaciones/periodos-activos?colegioId={}",
                s.school_id
            ))
            .insert_header(auth())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"][0]["id"], s.period_id);

        let req = test::TestRequest::post()
            .uri("/api/evaluaciones")
            .insert_header(auth())
            .set_json(serde_json::json!({
                "profesorAsignacionId": s.assignment_id,
                "periodoId": s.period_id,
                "competenciaId": s.competency_ids[0],
                "estudianteId": s.student_ids[0],
                "calificacion": "A",
                "comentario": "Buen avance"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        let evaluation_id = body["data"]["id"].as_i64().expect("evaluation id");

        let req = test::TestRequest::get()
            .uri(&format!(
                "/api/evaluaciones/por-contexto?profesorAsignacionId={}&periodoId={}&estudianteId={}",
                s.assignment_id, s.period_id, s.student_ids[0]
            ))
            .insert_header(auth())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
        assert_eq!(body["data"][0]["id"], evaluation_id);

        let item_uri = format!("/api/evaluaciones/{evaluation_id}");
        let req = test::TestRequest::get()
            .uri(&item_uri)
            .insert_header(auth())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["comment"], "Buen avance");

        let req = test::TestRequest::patch()
            .uri(&item_uri)
            .insert_header(auth())
            .set_json(serde_json::json!({ "grade": "AD", "comment": null }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["grade"], "AD");
        assert!(body["data"]["comment"].is_null());

        let req = test::TestRequest::delete()
            .uri(&item_uri)
            .insert_header(auth())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri(&item_uri)
            .insert_header(auth())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 6000);
    }
}
