//! Tool descriptor derivation.
//!
//! Name, description, and input schema are pure functions of the operation, so every
//! front-end advertises identical tools for the same spec.

use crate::error::{Result, SwaggerToolsError};
use crate::spec::{Operation, ParamLocation, Parameter};
use reqwest::Method;
use serde_json::{Map, Value, json};

/// A tool derived from one accepted operation. Built once at registration time and shared
/// read-only across concurrent invocations.
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    /// Unique tool name (collisions are a configuration error).
    pub name: String,
    pub description: String,
    /// Object schema with a `properties` map and a `required` list.
    pub input_schema: Value,
    /// Originating HTTP method.
    pub method: Method,
    /// Originating path template, e.g. `/pets/{id}`.
    pub path: String,
    pub operation: Operation,
}

impl ToolDescriptor {
    /// Build the descriptor for `(method, path, operation)`.
    ///
    /// # Errors
    ///
    /// Returns [`SwaggerToolsError::Swagger`] for an unsupported HTTP method.
    pub fn from_operation(method: &str, path: &str, operation: &Operation) -> Result<Self> {
        Ok(Self {
            name: tool_name(method, path, operation),
            description: tool_description(method, path, operation),
            input_schema: build_input_schema(&operation.parameters),
            method: resolve_http_method(method)?,
            path: path.to_string(),
            operation: operation.clone(),
        })
    }
}

/// Map a spec primitive type to a schema primitive type. Total; unknown and empty types map
/// to `string`.
#[must_use]
pub fn map_schema_type(spec_type: &str) -> &'static str {
    match spec_type {
        "integer" | "number" => "number",
        "boolean" => "boolean",
        "array" => "array",
        "object" => "object",
        _ => "string",
    }
}

/// Derive the stable tool name for an operation.
///
/// An operation id wins: spaces become underscores and the result is lower-cased. Without an
/// id the name is synthesized from the method and path template, e.g. `POST /users/{id}/posts`
/// becomes `post_users_id_posts`.
#[must_use]
pub fn tool_name(method: &str, path: &str, operation: &Operation) -> String {
    if let Some(id) = operation.id() {
        return id.replace(' ', "_").to_lowercase();
    }

    let mut path_part = path.replace('/', "_");
    path_part.retain(|c| c != '{' && c != '}');
    let path_part = path_part.trim_start_matches('_');
    format!("{}_{path_part}", method.to_lowercase())
}

/// Derive the tool description: summary, else description, else `"{METHOD} {path}"`.
#[must_use]
pub fn tool_description(method: &str, path: &str, operation: &Operation) -> String {
    if let Some(summary) = operation.summary.as_deref().filter(|s| !s.is_empty()) {
        return summary.to_string();
    }
    if let Some(description) = operation.description.as_deref().filter(|d| !d.is_empty()) {
        return description.to_string();
    }
    format!("{method} {path}")
}

/// Build the input schema for an operation's parameters.
///
/// Cookie parameters are dropped; header parameters are dropped unless named `content-type`
/// (case-insensitive). A body parameter is keyed literally `body` with its declared schema
/// type (default `object`) and its `properties` copied through. Required keys are collected
/// in encounter order.
#[must_use]
pub fn build_input_schema(parameters: &[Parameter]) -> Value {
    let mut properties = Map::new();
    let mut required: Vec<String> = Vec::new();

    for param in parameters {
        let key = match param.location {
            ParamLocation::Cookie => continue,
            ParamLocation::Header => {
                if !param.name.eq_ignore_ascii_case("content-type") {
                    continue;
                }
                param.name.clone()
            }
            ParamLocation::Body => "body".to_string(),
            ParamLocation::Path | ParamLocation::Query | ParamLocation::FormData => {
                param.name.clone()
            }
        };

        properties.insert(key.clone(), parameter_schema(param));

        if param.required {
            required.push(key);
        }
    }

    let mut schema = json!({
        "type": "object",
        "properties": Value::Object(properties),
    });

    if !required.is_empty() {
        schema["required"] = json!(required);
    }

    schema
}

fn parameter_schema(param: &Parameter) -> Value {
    let mut prop = Map::new();

    if param.location == ParamLocation::Body {
        let schema_type = param
            .schema
            .as_ref()
            .and_then(|s| s.schema_type.as_deref())
            .filter(|t| !t.is_empty())
            .unwrap_or("object");
        prop.insert("type".to_string(), json!(schema_type));

        if let Some(props) = param.schema.as_ref().and_then(|s| s.properties.clone()) {
            prop.insert("properties".to_string(), props);
        }
    } else {
        let mapped = map_schema_type(param.param_type.as_deref().unwrap_or(""));
        prop.insert("type".to_string(), json!(mapped));

        if mapped == "array" {
            let item_type = param
                .items
                .as_ref()
                .and_then(|i| i.item_type.as_deref())
                .unwrap_or("");
            prop.insert("items".to_string(), json!({"type": map_schema_type(item_type)}));
        }
    }

    if let Some(format) = param.format.as_deref().filter(|f| !f.is_empty()) {
        prop.insert("format".to_string(), json!(format));
    }

    if let Some(description) = param.description.as_deref().filter(|d| !d.is_empty()) {
        prop.insert("description".to_string(), json!(description));
    }

    Value::Object(prop)
}

pub(crate) fn resolve_http_method(method: &str) -> Result<Method> {
    match method {
        "GET" => Ok(Method::GET),
        "POST" => Ok(Method::POST),
        "PUT" => Ok(Method::PUT),
        "DELETE" => Ok(Method::DELETE),
        "PATCH" => Ok(Method::PATCH),
        other => Err(SwaggerToolsError::Swagger(format!(
            "Unsupported HTTP method: {other}"
        ))),
    }
}
