//! Slack Web API client.
//!
//! Features:
//! - Bearer bot-token auth on every call
//! - `ok: false` responses surfaced as `ApiError::Remote`
//! - Rate-limit retry (HTTP 429 + `Retry-After`, or `error: "ratelimited"`)
//! - Cursor pagination for `conversations.list`
//!
//! One client is built at startup and shared (it wraps a pooled
//! `reqwest::Client`); it holds no mutable state.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use chansweep_core::config::schema::SlackConfig;
use chansweep_core::error::ApiError;
use chansweep_core::types::{Channel, ChannelKind, HistoryMessage};
use chansweep_core::utils::parse_ts;
use chansweep_core::WorkspaceApi;

// ─────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────

/// Page size requested from `conversations.list`.
const LIST_PAGE_SIZE: usize = 200;

/// Hard stop for `conversations.list` pagination.
const MAX_LIST_PAGES: usize = 50;

/// Page size requested from `conversations.members`.
const MEMBERS_PAGE_SIZE: usize = 1000;

/// Hard stop for `conversations.members` pagination.
const MAX_MEMBER_PAGES: usize = 20;

/// First fallback backoff when no `Retry-After` is given (milliseconds).
const BASE_BACKOFF_MS: u64 = 500;

// ─────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    channels: Vec<WireChannel>,
    #[serde(default)]
    response_metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Deserialize)]
struct ResponseMetadata {
    #[serde(default)]
    next_cursor: String,
}

#[derive(Debug, Deserialize)]
struct WireChannel {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    is_private: bool,
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    messages: Vec<WireMessage>,
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    ts: String,
    #[serde(default)]
    user: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MembersResponse {
    #[serde(default)]
    members: Vec<String>,
    #[serde(default)]
    response_metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Deserialize)]
struct UserInfoResponse {
    user: WireUser,
}

#[derive(Debug, Deserialize)]
struct WireUser {
    #[serde(default)]
    is_admin: bool,
}

/// How a Web API method is called.
enum SlackRequest {
    /// Read methods: `GET` with query parameters.
    Query(Vec<(&'static str, String)>),
    /// Write methods: `POST` with a JSON body.
    Json(Value),
}

// ─────────────────────────────────────────────
// SlackClient
// ─────────────────────────────────────────────

/// Slack Web API backend.
pub struct SlackClient {
    http: reqwest::Client,
    api_base: String,
    bot_token: String,
    max_retries: u32,
}

impl std::fmt::Debug for SlackClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackClient")
            .field("api_base", &self.api_base)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl SlackClient {
    /// Build a client from config.
    pub fn new(config: &SlackConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| ApiError::Http {
                method: "client.build".into(),
                message: e.to_string(),
            })?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            bot_token: config.bot_token.clone(),
            max_retries: config.max_retries,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.api_base, method)
    }

    /// Call a Web API method, retrying while rate limited.
    async fn call(&self, method: &str, request: &SlackRequest) -> Result<Value, ApiError> {
        let url = self.method_url(method);
        let mut attempts = 0u32;

        loop {
            attempts += 1;

            let builder = match request {
                SlackRequest::Query(params) => self.http.get(&url).query(params),
                SlackRequest::Json(body) => self.http.post(&url).json(body),
            };

            let resp = builder
                .bearer_auth(&self.bot_token)
                .send()
                .await
                .map_err(|e| ApiError::Http {
                    method: method.to_string(),
                    message: e.to_string(),
                })?;

            let status = resp.status();

            if status.as_u16() == 429 {
                if attempts > self.max_retries {
                    return Err(ApiError::RateLimited {
                        method: method.to_string(),
                        attempts,
                    });
                }
                let wait = retry_after(resp.headers()).unwrap_or_else(|| backoff(attempts));
                warn!(
                    method,
                    attempt = attempts,
                    wait_ms = wait.as_millis() as u64,
                    "slack rate limited"
                );
                tokio::time::sleep(wait).await;
                continue;
            }

            if !status.is_success() {
                return Err(ApiError::Status {
                    method: method.to_string(),
                    status: status.as_u16(),
                });
            }

            let body: Value = resp.json().await.map_err(|e| ApiError::Decode {
                method: method.to_string(),
                message: e.to_string(),
            })?;

            if body["ok"].as_bool() == Some(true) {
                return Ok(body);
            }

            let error = body["error"].as_str().unwrap_or("unknown").to_string();
            if error == "ratelimited" && attempts <= self.max_retries {
                let wait = backoff(attempts);
                warn!(method, attempt = attempts, "slack returned ratelimited, backing off");
                tokio::time::sleep(wait).await;
                continue;
            }

            return Err(ApiError::Remote {
                method: method.to_string(),
                error,
            });
        }
    }

    /// Call and decode the body into a typed response.
    async fn call_typed<T: DeserializeOwned>(
        &self,
        method: &str,
        request: &SlackRequest,
    ) -> Result<T, ApiError> {
        let body = self.call(method, request).await?;
        serde_json::from_value(body).map_err(|e| ApiError::Decode {
            method: method.to_string(),
            message: e.to_string(),
        })
    }
}

/// Seconds from a `Retry-After` header.
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// Exponential fallback: 0.5s, 1s, 2s, …
fn backoff(attempt: u32) -> Duration {
    let exp = attempt.saturating_sub(1).min(6);
    Duration::from_millis(BASE_BACKOFF_MS << exp)
}

// ─────────────────────────────────────────────
// WorkspaceApi implementation
// ─────────────────────────────────────────────

#[async_trait]
impl WorkspaceApi for SlackClient {
    async fn list_channels(&self, kinds: &[ChannelKind]) -> Result<Vec<Channel>, ApiError> {
        let types = kinds
            .iter()
            .map(|k| k.as_slack_type())
            .collect::<Vec<_>>()
            .join(",");

        let mut channels = Vec::new();
        let mut cursor = String::new();

        for page in 0..MAX_LIST_PAGES {
            let mut params = vec![
                ("types", types.clone()),
                ("exclude_archived", "true".to_string()),
                ("limit", LIST_PAGE_SIZE.to_string()),
            ];
            if !cursor.is_empty() {
                params.push(("cursor", cursor.clone()));
            }

            let resp: ListResponse = self
                .call_typed("conversations.list", &SlackRequest::Query(params))
                .await?;

            channels.extend(resp.channels.into_iter().map(|c| {
                let kind = if c.is_private {
                    ChannelKind::Private
                } else {
                    ChannelKind::Public
                };
                Channel::new(c.id, c.name, kind)
            }));

            cursor = resp
                .response_metadata
                .map(|m| m.next_cursor)
                .unwrap_or_default();
            if cursor.is_empty() {
                break;
            }
            if page + 1 == MAX_LIST_PAGES {
                warn!(pages = MAX_LIST_PAGES, "conversations.list page cap reached");
            }
        }

        debug!(count = channels.len(), "listed channels");
        Ok(channels)
    }

    async fn recent_messages(
        &self,
        channel_id: &str,
        limit: usize,
    ) -> Result<Vec<HistoryMessage>, ApiError> {
        let params = vec![("channel", channel_id.to_string()), ("limit", limit.to_string())];
        let resp: HistoryResponse = self
            .call_typed("conversations.history", &SlackRequest::Query(params))
            .await?;

        let messages = resp
            .messages
            .into_iter()
            .filter_map(|m| match parse_ts(&m.ts) {
                Some(ts) => Some(HistoryMessage {
                    channel_id: channel_id.to_string(),
                    ts,
                    user: m.user,
                }),
                None => {
                    debug!(channel = %channel_id, ts = %m.ts, "skipping message with bad ts");
                    None
                }
            })
            .collect();

        Ok(messages)
    }

    async fn members(&self, channel_id: &str) -> Result<Vec<String>, ApiError> {
        let mut members = Vec::new();
        let mut cursor = String::new();

        for page in 0..MAX_MEMBER_PAGES {
            let mut params = vec![
                ("channel", channel_id.to_string()),
                ("limit", MEMBERS_PAGE_SIZE.to_string()),
            ];
            if !cursor.is_empty() {
                params.push(("cursor", cursor.clone()));
            }

            let resp: MembersResponse = self
                .call_typed("conversations.members", &SlackRequest::Query(params))
                .await?;
            members.extend(resp.members);

            cursor = resp
                .response_metadata
                .map(|m| m.next_cursor)
                .unwrap_or_default();
            if cursor.is_empty() {
                break;
            }
            if page + 1 == MAX_MEMBER_PAGES {
                warn!(
                    channel = %channel_id,
                    pages = MAX_MEMBER_PAGES,
                    members = members.len(),
                    "conversations.members page cap reached, member list is truncated"
                );
            }
        }

        Ok(members)
    }

    async fn is_admin(&self, user_id: &str) -> Result<bool, ApiError> {
        let params = vec![("user", user_id.to_string())];
        let resp: UserInfoResponse = self
            .call_typed("users.info", &SlackRequest::Query(params))
            .await?;
        Ok(resp.user.is_admin)
    }

    async fn post_message(&self, channel_id: &str, text: &str) -> Result<(), ApiError> {
        let body = json!({ "channel": channel_id, "text": text });
        self.call("chat.postMessage", &SlackRequest::Json(body))
            .await
            .map(|_| ())
    }

    async fn archive(&self, channel_id: &str) -> Result<(), ApiError> {
        let body = json!({ "channel": channel_id });
        self.call("conversations.archive", &SlackRequest::Json(body))
            .await
            .map(|_| ())
    }

    async fn leave(&self, channel_id: &str) -> Result<(), ApiError> {
        let body = json!({ "channel": channel_id });
        self.call("conversations.leave", &SlackRequest::Json(body))
            .await
            .map(|_| ())
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
