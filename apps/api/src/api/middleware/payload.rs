use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde::de::DeserializeOwned;

use crate::api::errors::ApiError;

/// Request body extractor accepting JSON or form-encoded input
///
/// Bodies sent as `application/x-www-form-urlencoded` are parsed as a form;
/// anything else goes through axum's `Json`. Either rejection is answered
/// with 400 and the `{"error": ...}` envelope instead of axum's 415/422
/// plain text.
///
/// Usage:
/// ```rust,ignore
/// async fn handler(Payload(req): Payload<SchoolPayload>) { /* ... */ }
/// ```
pub struct Payload<T>(pub T);

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false)
}

#[async_trait]
impl<S, T> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(&req) {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
            return Ok(Payload(value));
        }

        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

        Ok(Payload(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Sample {
        name: Option<String>,
        count: Option<i32>,
        flag: Option<bool>,
    }

    fn request(content_type: &str, body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn parses_form_bodies() {
        let req = request(
            "application/x-www-form-urlencoded",
            "name=Test+University&count=3&flag=true",
        );
        let Payload(sample) = Payload::<Sample>::from_request(req, &()).await.unwrap();

        assert_eq!(sample.name.as_deref(), Some("Test University"));
        assert_eq!(sample.count, Some(3));
        assert_eq!(sample.flag, Some(true));
    }

    #[tokio::test]
    async fn parses_json_bodies() {
        let req = request("application/json", r#"{"name": "TEST", "count": 1}"#);
        let Payload(sample) = Payload::<Sample>::from_request(req, &()).await.unwrap();

        assert_eq!(sample.name.as_deref(), Some("TEST"));
        assert_eq!(sample.count, Some(1));
        assert!(sample.flag.is_none());
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let req = request("application/json", "{not json");
        let err = Payload::<Sample>::from_request(req, &())
            .await
            .err()
            .expect("rejected");

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
