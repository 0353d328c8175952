// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;
use usergrid_app::query::page_url;
use usergrid_app::{
    GENERIC_FAILURE_MESSAGE, PageRequest, PageResponse, SubmitOutcome, UpdateBatch,
};

/// Sends an update batch and reports the outcome. Never fails outright:
/// transport problems come back as [`SubmitOutcome::Failure`].
pub trait Submitter {
    fn submit(&self, batch: &UpdateBatch) -> SubmitOutcome;
}

#[derive(Debug, Clone)]
pub struct Client {
    fetch_url: String,
    update_url: String,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(fetch_url: &str, update_url: &str, timeout: Duration) -> Result<Self> {
        let fetch_url = normalize_url("api.fetch_url", fetch_url)?;
        let update_url = normalize_url("api.update_url", update_url)?;

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            fetch_url,
            update_url,
            timeout,
            http,
        })
    }

    pub fn fetch_url(&self) -> &str {
        &self.fetch_url
    }

    pub fn update_url(&self) -> &str {
        &self.update_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn fetch_page(&self, request: &PageRequest) -> Result<PageResponse> {
        request.validate()?;
        let url = page_url(&self.fetch_url, request)?;
        debug!(%url, "fetching page");

        let response = self
            .http
            .get(url)
            .send()
            .map_err(|error| connection_error(&self.fetch_url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        let page: PageResponse = response.json().context("decode page response")?;
        debug!(count = page.data.len(), last_page = ?page.last_page, "page fetched");
        Ok(page)
    }

    pub fn submit_updates(&self, batch: &UpdateBatch) -> SubmitOutcome {
        info!(count = batch.len(), url = %self.update_url, "posting update batch");
        let response = match self.http.post(self.update_url.as_str()).json(batch).send() {
            Ok(response) => response,
            Err(error) => {
                warn!(%error, "update request failed in transport");
                return SubmitOutcome::Failure(GENERIC_FAILURE_MESSAGE.to_owned());
            }
        };

        let status = response.status();
        let body = match response.text() {
            Ok(body) => body,
            Err(error) => {
                warn!(%error, status = status.as_u16(), "read update response body");
                String::new()
            }
        };

        if status == StatusCode::OK {
            return SubmitOutcome::Success(parse_success_body(&body));
        }

        let reason = failure_reason(&body);
        warn!(status = status.as_u16(), %reason, "update batch rejected");
        SubmitOutcome::Failure(reason)
    }
}

impl Submitter for Client {
    fn submit(&self, batch: &UpdateBatch) -> SubmitOutcome {
        self.submit_updates(batch)
    }
}

fn normalize_url(name: &str, raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        bail!("{name} must not be empty");
    }
    Url::parse(trimmed).with_context(|| format!("{name} {trimmed:?} is not an absolute URL"))?;
    Ok(trimmed.to_owned())
}

fn parse_success_body(body: &str) -> serde_json::Value {
    if body.trim().is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_str(body).unwrap_or(serde_json::Value::Null)
}

/// Server-supplied `error` string when present, else the generic message.
pub fn failure_reason(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_owned())
}

fn connection_error(url: &str, error: reqwest::Error) -> anyhow::Error {
    anyhow!(
        "cannot reach {} -- check api.fetch_url in the config file ({})",
        url,
        error
    )
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(parsed) = serde_json::from_str::<ErrorEnvelope>(body)
        && let Some(error) = parsed.error
        && !error.is_empty()
    {
        return anyhow!("server error ({}): {}", status.as_u16(), error);
    }

    if body.len() < 100 && !body.contains('{') && !body.trim().is_empty() {
        return anyhow!("server error ({}): {}", status.as_u16(), body.trim());
    }

    anyhow!("server returned {}", status.as_u16())
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default, deserialize_with = "deserialize_error_message")]
    error: Option<String>,
}

fn deserialize_error_message<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        serde_json::Value::String(message) => Some(message),
        _ => None,
    }))
}

#[cfg(test)]
mod tests {
    use super::{Client, clean_error_response, failure_reason, parse_success_body};
    use reqwest::StatusCode;
    use std::time::Duration;

    #[test]
    fn failure_reason_prefers_server_message() {
        assert_eq!(failure_reason(r#"{"error":"db locked"}"#), "db locked");
    }

    #[test]
    fn failure_reason_falls_back_to_generic_message() {
        for body in ["", "<html>oops</html>", r#"{"error":""}"#, r#"{"error":{"code":5}}"#] {
            assert_eq!(failure_reason(body), "Something went wrong", "body {body:?}");
        }
    }

    #[test]
    fn success_body_tolerates_empty_and_non_json() {
        assert_eq!(parse_success_body(""), serde_json::Value::Null);
        assert_eq!(parse_success_body("OK"), serde_json::Value::Null);
        assert_eq!(
            parse_success_body(r#"{"updated":2}"#),
            serde_json::json!({"updated": 2})
        );
    }

    #[test]
    fn clean_error_response_formats_known_shapes() {
        let message = clean_error_response(StatusCode::BAD_GATEWAY, r#"{"error":"upstream"}"#);
        assert_eq!(message.to_string(), "server error (502): upstream");

        let message = clean_error_response(StatusCode::NOT_FOUND, "no such route");
        assert_eq!(message.to_string(), "server error (404): no such route");

        let message = clean_error_response(StatusCode::INTERNAL_SERVER_ERROR, "{\"x\":1}");
        assert_eq!(message.to_string(), "server returned 500");
    }

    #[test]
    fn new_rejects_empty_and_relative_urls() {
        let timeout = Duration::from_secs(1);
        assert!(Client::new("", "http://localhost/api/update-user", timeout).is_err());
        assert!(Client::new("http://localhost/api/users", "/api/update-user", timeout).is_err());
    }

    #[test]
    fn new_trims_trailing_slashes() {
        let client = Client::new(
            "http://localhost:5001/api/users/",
            "http://localhost:5001/api/update-user",
            Duration::from_secs(1),
        )
        .expect("client should initialize");
        assert_eq!(client.fetch_url(), "http://localhost:5001/api/users");
        assert_eq!(client.timeout(), Duration::from_secs(1));
    }
}
