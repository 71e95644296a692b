// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Request body extraction.
//!
//! Bodies may be JSON objects or url-encoded forms. Anything else, or an
//! empty body, yields no fields so that per-field validation reports
//! what is missing.

use crate::error::AppError;
use axum::{
    body::Body,
    extract::{FromRequest, Request},
    http::header,
    Form, Json,
};
use serde_json::{Map, Value};

/// Maximum accepted body size.
const BODY_LIMIT: usize = 64 * 1024;

/// Raw request fields keyed by name.
#[derive(Debug, Default, Clone)]
pub struct Fields(pub Map<String, Value>);

impl Fields {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }
}

#[derive(Debug, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
    Other,
}

fn body_kind(request: &Request) -> BodyKind {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_ascii_lowercase())
        .unwrap_or_default();
    let mime = content_type.split(';').next().unwrap_or("").trim();

    if mime == "application/json" || mime.ends_with("+json") {
        BodyKind::Json
    } else if mime == "application/x-www-form-urlencoded" {
        BodyKind::Form
    } else {
        BodyKind::Other
    }
}

impl<S> FromRequest<S> for Fields
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let invalid_body = || AppError::invalid_input(AppError::INVALID_BODY);

        let kind = body_kind(&request);
        if kind == BodyKind::Other {
            return Ok(Fields::default());
        }

        let (parts, body) = request.into_parts();
        let bytes = axum::body::to_bytes(body, BODY_LIMIT)
            .await
            .map_err(|_| invalid_body())?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Fields::default());
        }
        let request = Request::from_parts(parts, Body::from(bytes));

        match kind {
            BodyKind::Json => {
                let Json(map) = Json::<Map<String, Value>>::from_request(request, state)
                    .await
                    .map_err(|e| {
                        tracing::debug!(error = %e, "Rejected JSON body");
                        invalid_body()
                    })?;
                Ok(Fields(map))
            }
            _ => {
                let Form(pairs) = Form::<Vec<(String, String)>>::from_request(request, state)
                    .await
                    .map_err(|e| {
                        tracing::debug!(error = %e, "Rejected form body");
                        invalid_body()
                    })?;
                Ok(Fields(
                    pairs
                        .into_iter()
                        .map(|(k, v)| (k, Value::String(v)))
                        .collect(),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request as HttpRequest;

    fn request(content_type: Option<&str>, body: &'static str) -> Request {
        let mut builder = HttpRequest::builder().method("POST").uri("/");
        if let Some(ct) = content_type {
            builder = builder.header(header::CONTENT_TYPE, ct);
        }
        builder.body(Body::from(body)).unwrap()
    }

    async fn extract(content_type: Option<&str>, body: &'static str) -> Result<Fields, AppError> {
        Fields::from_request(request(content_type, body), &()).await
    }

    #[tokio::test]
    async fn test_json_object() {
        let fields = extract(Some("application/json"), r#"{"duration": 30}"#)
            .await
            .unwrap();
        assert_eq!(fields.get("duration"), Some(&Value::from(30)));
    }

    #[tokio::test]
    async fn test_json_with_charset() {
        let fields = extract(Some("application/json; charset=utf-8"), r#"{"a":"b"}"#)
            .await
            .unwrap();
        assert_eq!(fields.get("a"), Some(&Value::from("b")));
    }

    #[tokio::test]
    async fn test_form_values_are_strings() {
        let fields = extract(
            Some("application/x-www-form-urlencoded"),
            "description=Morning+run&duration=30",
        )
        .await
        .unwrap();
        assert_eq!(fields.get("description"), Some(&Value::from("Morning run")));
        assert_eq!(fields.get("duration"), Some(&Value::from("30")));
    }

    #[tokio::test]
    async fn test_empty_or_untyped_body_has_no_fields() {
        assert!(extract(Some("application/json"), "").await.unwrap().0.is_empty());
        assert!(extract(None, "username=alice").await.unwrap().0.is_empty());
        assert!(extract(Some("text/plain"), "hello").await.unwrap().0.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_json_is_rejected() {
        for body in [r#"{"username": "#, "[1, 2]", "\"alice\""] {
            let err = extract(Some("application/json"), body).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidInput(ref msg) if msg == "Invalid request body"));
        }
    }
}
