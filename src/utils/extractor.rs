//! 路径参数提取器：非法 ID 直接返回 400，而不是 actix 默认的 404 文本

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn invalid_param(name: &str, raw: &str) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::BadRequest,
        format!("Invalid path parameter '{name}': '{raw}'"),
    ));
    InternalError::from_response(format!("invalid {name}"), response).into()
}

fn parse_positive_i64(req: &HttpRequest, name: &str) -> Result<i64, actix_web::Error> {
    let raw = req.match_info().get(name).unwrap_or_default();
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(invalid_param(name, raw)),
    }
}

macro_rules! define_safe_i64_extractor {
    ($(
        $(#[$meta:meta])*
        $name:ident => $param:literal
    ),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq)]
            pub struct $name(pub i64);

            impl FromRequest for $name {
                type Error = actix_web::Error;
                type Future = Ready<Result<Self, Self::Error>>;

                fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                    ready(parse_positive_i64(req, $param).map($name))
                }
            }
        )*
    };
}

define_safe_i64_extractor! {
    /// `{id}`
    SafeIDI64 => "id",
    SafeStudentIdI64 => "student_id",
    SafeRoleIdI64 => "role_id",
    SafeGuardianIdI64 => "guardian_id",
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_valid_id() {
        let req = TestRequest::default().param("id", "42").to_http_request();
        let id = SafeIDI64::extract(&req).await.expect("valid id");
        assert_eq!(id, SafeIDI64(42));
    }

    #[actix_web::test]
    async fn test_rejects_non_positive_or_garbage() {
        for raw in ["0", "-3", "abc", "1.5"] {
            let req = TestRequest::default().param("id", raw).to_http_request();
            assert!(SafeIDI64::extract(&req).await.is_err(), "{raw} accepted");
        }
    }

    #[actix_web::test]
    async fn test_named_parameter() {
        let req = TestRequest::default()
            .param("student_id", "7")
            .to_http_request();
        assert_eq!(
            SafeStudentIdI64::extract(&req).await.expect("valid").0,
            7
        );
    }
}
