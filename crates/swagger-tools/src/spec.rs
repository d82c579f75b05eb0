//! Swagger 2.0 document model and loader.
//!
//! The model is deliberately minimal: it only keeps the pieces the registry and executor need
//! (paths, methods, parameters, and the host fields used for base-URL inference). Paths are
//! stored in a `BTreeMap` so registry iteration order is deterministic.

use crate::error::{Result, SwaggerToolsError};
use crate::safety::sanitize_reqwest_error;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use url::Url;

/// A parsed Swagger/OpenAPI-class API description.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Specification {
    #[serde(default)]
    pub swagger: Option<String>,

    #[serde(default)]
    pub info: Option<SpecInfo>,

    /// Upstream host, e.g. `api.example.com`.
    #[serde(default)]
    pub host: Option<String>,

    /// Path prefix applied to every operation, e.g. `/v2`.
    #[serde(default)]
    pub base_path: Option<String>,

    /// Transfer schemes in preference order (`https`, `http`).
    #[serde(default)]
    pub schemes: Vec<String>,

    #[serde(default)]
    pub paths: BTreeMap<String, PathItem>,
}

/// The `info` block of a spec (title/version surface in server metadata).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SpecInfo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// The operations declared on a single path template.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PathItem {
    #[serde(default)]
    pub get: Option<Operation>,
    #[serde(default)]
    pub post: Option<Operation>,
    #[serde(default)]
    pub put: Option<Operation>,
    #[serde(default)]
    pub delete: Option<Operation>,
    #[serde(default)]
    pub patch: Option<Operation>,
}

impl PathItem {
    /// Iterate the declared operations in the fixed registration order.
    pub fn operations(&self) -> impl Iterator<Item = (&'static str, &Operation)> {
        [
            ("GET", self.get.as_ref()),
            ("POST", self.post.as_ref()),
            ("PUT", self.put.as_ref()),
            ("DELETE", self.delete.as_ref()),
            ("PATCH", self.patch.as_ref()),
        ]
        .into_iter()
        .filter_map(|(method, op)| op.map(|op| (method, op)))
    }
}

/// One HTTP-method-and-path entry within a specification.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(default)]
    pub operation_id: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Operation {
    /// The operation id, treating the empty string as absent.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.operation_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// A single operation parameter.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "in")]
    pub location: ParamLocation,

    #[serde(default)]
    pub required: bool,

    /// Primitive type for non-body parameters (`string`, `integer`, `array`, ...).
    #[serde(default, rename = "type")]
    pub param_type: Option<String>,

    #[serde(default)]
    pub format: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Item schema for `type: array` parameters.
    #[serde(default)]
    pub items: Option<ItemsSchema>,

    /// Nested schema for body parameters.
    #[serde(default)]
    pub schema: Option<BodySchema>,
}

/// Where a parameter is carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ParamLocation {
    Path,
    Query,
    Body,
    Header,
    Cookie,
    FormData,
}

/// Item schema of an array-typed parameter.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ItemsSchema {
    #[serde(default, rename = "type")]
    pub item_type: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
}

/// Schema of a body parameter. `properties` is kept as raw JSON and copied into the tool
/// input schema unchanged.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BodySchema {
    #[serde(default, rename = "type")]
    pub schema_type: Option<String>,
    #[serde(default)]
    pub properties: Option<Value>,
    #[serde(default)]
    pub required: Vec<String>,
}

impl Specification {
    /// Derive the upstream base URL from `host`/`schemes`/`basePath`.
    ///
    /// Returns `None` when the spec declares no host; the scheme defaults to `https` when the
    /// spec lists none.
    #[must_use]
    pub fn infer_base_url(&self) -> Option<String> {
        let host = self.host.as_deref().filter(|h| !h.is_empty())?;
        let scheme = self.schemes.first().map_or("https", String::as_str);
        let base_path = self.base_path.as_deref().unwrap_or("");
        Some(format!("{scheme}://{host}{base_path}"))
    }
}

/// Parse a spec from JSON or YAML text.
///
/// # Errors
///
/// Returns [`SwaggerToolsError::SpecParse`] when the document is not valid JSON/YAML or does
/// not match the expected shape.
pub fn parse(content: &str, location: &str) -> Result<Specification> {
    // JSON is a valid subset of YAML, so serde_yaml alone covers both formats.
    serde_yaml::from_str(content).map_err(|e| SwaggerToolsError::SpecParse {
        location: location.to_string(),
        source: e,
    })
}

/// Load and parse a spec from a URL or a local file path.
///
/// # Errors
///
/// Returns an error when fetching/reading the document fails, the server answers with a
/// non-success status, or parsing fails.
pub async fn load(client: &Client, location: &str) -> Result<Specification> {
    let content = if location.starts_with("http://") || location.starts_with("https://") {
        tracing::info!("Fetching Swagger spec from {location}");
        let url = Url::parse(location).map_err(|e| {
            SwaggerToolsError::Swagger(format!("Invalid spec URL '{location}': {e}"))
        })?;

        let resp = client
            .get(url)
            .send()
            .await
            .map_err(|e| SwaggerToolsError::SpecFetch {
                url: location.to_string(),
                message: sanitize_reqwest_error(&e),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SwaggerToolsError::SpecFetch {
                url: location.to_string(),
                message: format!("unexpected status {status}"),
            });
        }

        resp.text()
            .await
            .map_err(|e| SwaggerToolsError::SpecReadBody {
                url: location.to_string(),
                message: sanitize_reqwest_error(&e),
            })?
    } else {
        tracing::info!("Loading Swagger spec from {location}");
        std::fs::read_to_string(location).map_err(|e| SwaggerToolsError::SpecReadFile {
            path: location.to_string(),
            source: e,
        })?
    };

    parse(&content, location)
}
