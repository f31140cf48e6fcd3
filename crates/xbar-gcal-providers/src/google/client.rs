//! Google Calendar API client.
//!
//! A thin wrapper around `events.list`: build the request, map HTTP
//! failures onto [`ProviderError`], and decode the items straight into
//! [`RawEvent`]s.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;
use xbar_gcal_core::RawEvent;

use crate::error::{ProviderError, ProviderResult};
use crate::provider::FetchOptions;

/// Base URL for Google Calendar API v3.
const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Google Calendar API client bound to one access token.
#[derive(Debug)]
pub struct GoogleCalendarClient {
    http_client: reqwest::Client,
    access_token: String,
}

impl GoogleCalendarClient {
    /// Creates a new client with the given access token.
    pub fn new(access_token: impl Into<String>, timeout: Duration) -> ProviderResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("xbar-google-calendar/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                ProviderError::internal(format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            http_client,
            access_token: access_token.into(),
        })
    }

    /// Lists events of one calendar.
    ///
    /// A single page is requested: `maxResults` already caps the listing
    /// at what the menu shows.
    pub async fn list_events(&self, options: &FetchOptions) -> ProviderResult<Vec<RawEvent>> {
        let response = self
            .http_client
            .get(events_url(&options.calendar_id))
            .bearer_auth(&self.access_token)
            .query(&query_params(options))
            .send()
            .await
            .map_err(|e| {
                let message = if e.is_timeout() {
                    "request timeout".to_string()
                } else if e.is_connect() {
                    format!("connection failed: {}", e)
                } else {
                    format!("request failed: {}", e)
                };
                ProviderError::network(message).with_source(e)
            })?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok());

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(status_error(status, &body, retry_after));
        }

        let events = parse_event_list(&body)?;
        debug!(
            "fetched {} events from calendar {}",
            events.len(),
            options.calendar_id
        );
        Ok(events)
    }
}

/// `events.list` response body. Paging fields are not needed.
#[derive(Debug, Deserialize)]
struct EventListResponse {
    #[serde(default)]
    items: Vec<RawEvent>,
}

fn events_url(calendar_id: &str) -> String {
    format!(
        "{}/calendars/{}/events",
        CALENDAR_API_BASE,
        urlencoding::encode(calendar_id)
    )
}

fn query_params(options: &FetchOptions) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("timeMin", options.time_window.start.to_rfc3339()),
        ("maxResults", options.max_results.to_string()),
        ("singleEvents", "true".to_string()),
        ("orderBy", "startTime".to_string()),
    ];
    if let Some(end) = options.time_window.end {
        params.push(("timeMax", end.to_rfc3339()));
    }
    params
}

fn parse_event_list(body: &str) -> ProviderResult<Vec<RawEvent>> {
    let list: EventListResponse = serde_json::from_str(body).map_err(|e| {
        ProviderError::invalid_response(format!("failed to parse response: {}", e))
    })?;
    Ok(list.items)
}

/// Maps a non-success status onto a provider error.
fn status_error(status: StatusCode, body: &str, retry_after: Option<u64>) -> ProviderError {
    match status {
        StatusCode::UNAUTHORIZED => {
            ProviderError::authentication("access token expired or invalid")
        }
        StatusCode::FORBIDDEN => ProviderError::authorization(format!(
            "access denied to calendar: {}",
            api_message(body)
        )),
        StatusCode::TOO_MANY_REQUESTS => ProviderError::rate_limited(format!(
            "rate limit exceeded{}",
            retry_after
                .map(|s| format!(", retry after {} seconds", s))
                .unwrap_or_default()
        )),
        s if s.is_server_error() => {
            ProviderError::server(format!("API error ({}): {}", s, api_message(body)))
        }
        s => ProviderError::invalid_response(format!(
            "API error ({}): {}",
            s,
            api_message(body)
        )),
    }
}

/// Pulls `error.message` out of a Google error body, falling back to the
/// raw body.
fn api_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: ErrorDetail,
    }
    #[derive(Deserialize)]
    struct ErrorDetail {
        message: String,
    }

    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}
