//! HTTP method semantics.
//!
//! Generates MCP `ToolAnnotations` from RFC 9110-style method semantics. `openWorldHint` is
//! always `true` for these tools since every call reaches an external API.

use reqwest::Method;
use rmcp::model::ToolAnnotations;

/// Generate MCP tool annotations for an HTTP method.
#[must_use]
pub fn annotations_for_method(method: &Method) -> ToolAnnotations {
    let (read_only, destructive, idempotent) = match method.as_str() {
        "GET" | "HEAD" | "OPTIONS" => (Some(true), Some(false), Some(true)),
        "POST" => (Some(false), Some(false), Some(false)),
        "PUT" | "DELETE" => (Some(false), Some(true), Some(true)),
        // PATCH may or may not be idempotent; do not guess.
        "PATCH" => (Some(false), Some(true), None),
        _ => (None, None, None),
    };

    ToolAnnotations {
        title: None,
        read_only_hint: read_only,
        destructive_hint: destructive,
        idempotent_hint: idempotent,
        open_world_hint: Some(true),
    }
}
