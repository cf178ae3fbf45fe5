//! Request extractors whose rejections use the `{"message": "..."}` body.
//!
//! axum's own `Json` and `Query` reject with plain text; these wrappers route
//! the rejection through [`AppError`] instead.

use axum::extract::FromRequest;
use axum::extract::FromRequestParts;

use crate::error::AppError;

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Query string parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::response::IntoResponse;
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Login {
        email: String,
    }

    fn json_request(body: &'static str) -> Request<Body> {
        Request::post("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn message(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        json["message"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_valid_body_is_extracted() {
        let req = json_request(r#"{"email":"a@b.in"}"#);
        let ApiJson(login) = ApiJson::<Login>::from_request(req, &()).await.unwrap();
        assert_eq!(login.email, "a@b.in");
    }

    #[tokio::test]
    async fn test_missing_field_is_json_400() {
        let err = ApiJson::<Login>::from_request(json_request(r#"{"name":"x"}"#), &())
            .await
            .unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(message(response).await.contains("email"));
    }

    #[tokio::test]
    async fn test_missing_content_type_is_json_400() {
        let req = Request::post("/").body(Body::from("{}")).unwrap();
        let err = ApiJson::<Login>::from_request(req, &()).await.unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(!message(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_bad_query_is_json_400() {
        #[derive(Debug, Deserialize)]
        struct Page {
            #[allow(dead_code)]
            page: u32,
        }

        let (mut parts, ()) = Request::get("/?page=abc").body(()).unwrap().into_parts();
        let err = ApiQuery::<Page>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
