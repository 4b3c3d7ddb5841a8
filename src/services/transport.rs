// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Transport strategies: the "perform HTTP request, return status + body" seam.
//!
//! `StravaClient` holds an ordered list of these and tries them in sequence.

use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Transport-independent description of a Strava request.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub bearer: Option<String>,
    /// Body fields; each transport decides how to encode them.
    pub fields: Vec<(String, String)>,
    /// 400/401/403 mean the credential sent was rejected, not that the
    /// transport failed. Only set for OAuth token endpoint calls.
    pub auth_endpoint: bool,
}

impl ApiRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            query: Vec::new(),
            bearer: None,
            fields: Vec::new(),
            auth_endpoint: false,
        }
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            ..Self::get(url)
        }
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn bearer(mut self, token: &str) -> Self {
        self.bearer = Some(token.to_string());
        self
    }

    pub fn field(mut self, key: &str, value: &str) -> Self {
        self.fields.push((key.to_string(), value.to_string()));
        self
    }

    pub fn auth_endpoint(mut self) -> Self {
        self.auth_endpoint = true;
        self
    }
}

/// Raw HTTP outcome. Status interpretation happens in `StravaClient`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

/// One way of getting a request to Strava and a response back.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Short label used in log lines.
    fn name(&self) -> &str;

    /// Send the request. Only network-level failures are errors here;
    /// any HTTP status is returned as a response.
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse>;
}

/// How request body fields go on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEncoding {
    Form,
    Json,
}

/// reqwest-backed transport.
#[derive(Clone)]
pub struct ReqwestTransport {
    name: &'static str,
    http: reqwest::Client,
    body: BodyEncoding,
}

impl ReqwestTransport {
    /// Pooled client with form-encoded bodies.
    pub fn primary() -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            name: "primary",
            http,
            body: BodyEncoding::Form,
        }
    }

    /// Independent HTTP/1-only client that never reuses connections and sends
    /// JSON bodies, so a wedged pool or a picky proxy on the primary path does
    /// not also break this one.
    pub fn fallback() -> Self {
        let http = reqwest::Client::builder()
            .http1_only()
            .pool_max_idle_per_host(0)
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_default();

        Self {
            name: "fallback",
            http,
            body: BodyEncoding::Json,
        }
    }

    pub fn body_encoding(&self) -> BodyEncoding {
        self.body
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    fn name(&self) -> &str {
        self.name
    }

    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let mut builder = match request.method {
            HttpMethod::Get => self.http.get(&request.url),
            HttpMethod::Post => self.http.post(&request.url),
        };

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }

        if !request.fields.is_empty() {
            builder = match self.body {
                BodyEncoding::Form => builder.form(&request.fields),
                BodyEncoding::Json => {
                    let body: serde_json::Map<String, serde_json::Value> = request
                        .fields
                        .iter()
                        .map(|(k, v)| (k.clone(), serde_json::Value::from(v.as_str())))
                        .collect();
                    builder.json(&body)
                }
            };
        }

        let response = builder
            .send()
            .await
            .map_err(|e| AppError::Transport(format!("{} request failed: {}", self.name, e)))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            AppError::Transport(format!("{} failed reading response body: {}", self.name, e))
        })?;

        Ok(ApiResponse { status, body })
    }
}
