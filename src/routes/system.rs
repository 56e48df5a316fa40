use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use crate::models::{ApiResponse, AppStartTime};

pub async fn health(request: HttpRequest) -> ActixResult<HttpResponse> {
    let uptime_secs = request
        .app_data::<web::Data<AppStartTime>>()
        .map(|start| {
            chrono::Utc::now()
                .signed_duration_since(start.start_datetime)
                .num_seconds()
        })
        .unwrap_or_default();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        serde_json::json!({
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION"),
            "uptime_secs": uptime_secs,
        }),
        "Service is healthy",
    )))
}

// 配置路由
pub fn configure_system_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/health", web::get().to(health));
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, http::StatusCode, test};

    #[actix_web::test]
    async fn test_health_reports_ok() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(AppStartTime {
                    start_datetime: chrono::Utc::now(),
                }))
                .configure(configure_system_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 0);
        assert_eq!(body["data"]["status"], "ok");
    }
}
