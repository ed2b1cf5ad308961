// ABOUTME: Axum HTTP testing utilities for integration tests
// ABOUTME: Provides helpers to test Axum routes without running a full server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde::Serialize;
use tower::ServiceExt;

/// Builder for requests dispatched straight into a router, no socket involved
pub struct AxumTestRequest {
    method: Method,
    uri: String,
    headers: Vec<(String, String)>,
    body: Option<String>,
}

impl AxumTestRequest {
    fn with_method(method: Method, uri: &str) -> Self {
        Self {
            method,
            uri: uri.to_owned(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Start a GET request
    pub fn get(uri: &str) -> Self {
        Self::with_method(Method::GET, uri)
    }

    /// Start a POST request
    /// Note: the read-only suites (health, stats) never post
    #[allow(dead_code)]
    pub fn post(uri: &str) -> Self {
        Self::with_method(Method::POST, uri)
    }

    /// Start a PUT request
    #[allow(dead_code)]
    pub fn put(uri: &str) -> Self {
        Self::with_method(Method::PUT, uri)
    }

    /// Start a DELETE request
    #[allow(dead_code)]
    pub fn delete(uri: &str) -> Self {
        Self::with_method(Method::DELETE, uri)
    }

    /// Attach a request header
    #[allow(dead_code)]
    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_owned(), value.to_owned()));
        self
    }

    /// Attach a JSON body and set the content type to match
    #[allow(dead_code)]
    pub fn json<T: Serialize>(mut self, payload: &T) -> Self {
        self.body = Some(serde_json::to_string(payload).expect("payload must serialize"));
        self.headers.push((
            header::CONTENT_TYPE.as_str().to_owned(),
            "application/json".to_owned(),
        ));
        self
    }

    /// Dispatch the request through the router and collect the full response
    pub async fn send(self, app: Router) -> AxumTestResponse {
        let request = self
            .headers
            .into_iter()
            .fold(
                Request::builder().method(self.method).uri(self.uri),
                |builder, (key, value)| builder.header(key, value),
            )
            .body(Body::from(self.body.unwrap_or_default()))
            .expect("request must be well-formed");

        let response = app.oneshot(request).await.expect("router call failed");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("response body must be readable")
            .to_vec();

        AxumTestResponse { status, body }
    }
}

/// Response captured from a router call, body read eagerly
pub struct AxumTestResponse {
    status: StatusCode,
    body: Vec<u8>,
}

impl AxumTestResponse {
    /// Response status
    pub const fn status_code(&self) -> StatusCode {
        self.status
    }

    /// Deserialize the body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(self) -> T {
        serde_json::from_slice(&self.body).expect("body must be valid JSON")
    }

    /// Body as UTF-8 text, for non-JSON assertions
    #[allow(dead_code)]
    pub fn text(self) -> String {
        String::from_utf8(self.body).expect("body must be UTF-8")
    }
}
