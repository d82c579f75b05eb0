//! Outbound request execution.
//!
//! The executor reconstructs one HTTP request from a tool-call argument map, performs it, and
//! normalizes the response. Arguments are copied into an invocation-local working map, so
//! concurrent invocations never observe each other's path/body extraction.

use crate::error::{Result, SwaggerToolsError};
use crate::safety::sanitize_reqwest_error;
use reqwest::{Client, Method};
use rmcp::model::{CallToolResult, Content, JsonObject};
use serde_json::Value;
use std::collections::BTreeMap;

/// Normalized outcome of one upstream call.
///
/// An upstream status `>= 400` is application data, not a transport failure: the call itself
/// succeeded and `is_error` marks the result.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Pretty-printed JSON when the response body parses as JSON, otherwise the raw text.
    pub content: String,
    pub status_code: u16,
    pub is_error: bool,
}

impl ExecutionResult {
    /// Project the result into an MCP tool-call result.
    #[must_use]
    pub fn into_call_tool_result(self) -> CallToolResult {
        CallToolResult {
            content: vec![Content::text(self.content)],
            structured_content: None,
            is_error: Some(self.is_error),
            meta: None,
        }
    }
}

/// Executes HTTP requests against a single upstream API.
///
/// Stateless per call; the shared `reqwest::Client` is safe for concurrent use. Dropping the
/// future returned by [`RequestExecutor::execute`] cancels the in-flight request.
#[derive(Debug, Clone)]
pub struct RequestExecutor {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl RequestExecutor {
    #[must_use]
    pub fn new(client: Client, base_url: String, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build and perform one upstream call.
    ///
    /// Path placeholders of the form `{key}` are substituted with the percent-encoded string
    /// form of the matching argument, which is then removed from the working map. The `body`
    /// key is always the body payload candidate, never a path or query parameter. For `POST`,
    /// `PUT`, and `PATCH` the leftover arguments become the JSON body when no explicit payload
    /// was given; for every other method they are appended as query parameters in lexicographic
    /// key order.
    ///
    /// # Errors
    ///
    /// Returns [`SwaggerToolsError::Request`] on transport failures (DNS, connect, timeout);
    /// the message carries the method and path template for diagnosis.
    pub async fn execute(
        &self,
        method: &Method,
        path_template: &str,
        arguments: &JsonObject,
    ) -> Result<ExecutionResult> {
        // Invocation-local working copy; the BTreeMap fixes query serialization order.
        let mut args: BTreeMap<String, Value> = arguments
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let body_payload = args.remove("body");

        let mut path = path_template.to_string();
        let keys: Vec<String> = args.keys().cloned().collect();
        for key in keys {
            let placeholder = format!("{{{key}}}");
            if path.contains(&placeholder) {
                let value = value_to_string(&args[&key]);
                path = path.replace(&placeholder, &encode_path_segment(&value));
                args.remove(&key);
            }
        }

        let is_body_method =
            *method == Method::POST || *method == Method::PUT || *method == Method::PATCH;

        let mut url = format!("{}{path}", self.base_url);
        if !is_body_method && !args.is_empty() {
            let query: Vec<String> = args
                .iter()
                .map(|(key, value)| {
                    format!(
                        "{}={}",
                        encode_query_component(key),
                        encode_query_component(&value_to_string(value))
                    )
                })
                .collect();
            let separator = if url.contains('?') { '&' } else { '?' };
            url.push(separator);
            url.push_str(&query.join("&"));
        }

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header("Accept", "application/json");

        if is_body_method {
            if let Some(payload) = &body_payload {
                request = request.json(payload);
            } else if !args.is_empty() {
                request = request.json(&args);
            }
        }

        if let Some(key) = self.api_key.as_deref().filter(|k| !k.is_empty()) {
            // Both header formats are sent unconditionally.
            request = request.header("X-API-Key", key).bearer_auth(key);
        }

        tracing::debug!("Executing {method} {url}");

        let response = request.send().await.map_err(|e| {
            SwaggerToolsError::Request(format!(
                "{method} {path_template}: {}",
                sanitize_reqwest_error(&e)
            ))
        })?;

        let status_code = response.status().as_u16();
        let bytes = response.bytes().await.map_err(|e| {
            SwaggerToolsError::Request(format!(
                "{method} {path_template}: failed to read response body: {}",
                sanitize_reqwest_error(&e)
            ))
        })?;

        let content = match serde_json::from_slice::<Value>(&bytes) {
            Ok(value) => {
                serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
            }
            Err(_) => String::from_utf8_lossy(&bytes).into_owned(),
        };

        Ok(ExecutionResult {
            content,
            status_code,
            is_error: status_code >= 400,
        })
    }
}

/// Convert a JSON value to its string form for URL parameters.
fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => value.to_string(),
    }
}

const HEX: &[u8; 16] = b"0123456789ABCDEF";

fn percent_encode(s: &str, keep: fn(u8) -> bool) -> String {
    let mut out = String::with_capacity(s.len());
    for &b in s.as_bytes() {
        if keep(b) {
            out.push(b as char);
        } else {
            out.push('%');
            out.push(HEX[(b >> 4) as usize] as char);
            out.push(HEX[(b & 0x0F) as usize] as char);
        }
    }
    out
}

/// Percent-encode a path-substituted value as a single segment: `/`, `?`, `#`, and `&` are
/// always encoded, so a value cannot change the request path shape.
fn encode_path_segment(s: &str) -> String {
    percent_encode(s, is_unreserved)
}

/// Percent-encode a query key or value. `&`, `=`, and `#` are always encoded to keep the
/// `&`-joined query string intact.
fn encode_query_component(s: &str) -> String {
    percent_encode(s, is_unreserved)
}

fn is_unreserved(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~')
}
