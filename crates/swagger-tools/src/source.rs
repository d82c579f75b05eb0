//! Swagger-backed tool source.
//!
//! [`ApiToolSource`] is the single entry point both front-ends share: it owns the registry and
//! the executor, and neither front-end carries any conversion or execution logic of its own.

use crate::config::BridgeConfig;
use crate::error::{Result, SwaggerToolsError};
use crate::executor::{ExecutionResult, RequestExecutor};
use crate::registry::ToolRegistry;
use crate::spec;
use reqwest::Client;
use rmcp::model::{CallToolResult, JsonObject, Tool};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug)]
struct Inner {
    registry: ToolRegistry,
    executor: RequestExecutor,
    title: Option<String>,
    version: Option<String>,
}

/// A started tool source: spec loaded, registry built, executor configured. Immutable after
/// build; cloning is cheap and clones share the registry.
#[derive(Debug, Clone)]
pub struct ApiToolSource {
    inner: Arc<Inner>,
}

impl ApiToolSource {
    /// Load the spec, resolve the base URL, and build the registry.
    ///
    /// # Errors
    ///
    /// Returns an error when the spec cannot be loaded or parsed, when no base URL is
    /// configured and none can be inferred from the spec, or when the registry rejects the
    /// spec (no paths, duplicate tool names).
    pub async fn build(config: &BridgeConfig) -> Result<Self> {
        let client = Client::new();
        let spec = spec::load(&client, &config.spec).await?;

        let base_url = config
            .base_url
            .clone()
            .filter(|url| !url.is_empty())
            .or_else(|| spec.infer_base_url());
        let Some(base_url) = base_url else {
            return Err(SwaggerToolsError::Config(
                "No base URL configured and none could be inferred from the spec".to_string(),
            ));
        };

        let registry = ToolRegistry::build(&spec, &config.filter)?;
        tracing::info!(
            "Registered {} tools from Swagger spec '{}' (base URL {base_url})",
            registry.len(),
            config.spec
        );

        let executor = RequestExecutor::new(client, base_url, config.api_key.clone());
        let (title, version) = spec
            .info
            .map(|info| (info.title, info.version))
            .unwrap_or_default();

        Ok(Self {
            inner: Arc::new(Inner {
                registry,
                executor,
                title,
                version,
            }),
        })
    }

    #[must_use]
    pub fn registry(&self) -> &ToolRegistry {
        &self.inner.registry
    }

    /// List the MCP `Tool`s exposed by this source.
    #[must_use]
    pub fn list_tools(&self) -> Vec<Tool> {
        self.inner.registry.mcp_tools()
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.inner.executor.base_url()
    }

    /// The `info.title` of the loaded spec.
    #[must_use]
    pub fn spec_title(&self) -> Option<&str> {
        self.inner.title.as_deref()
    }

    /// The `info.version` of the loaded spec.
    #[must_use]
    pub fn spec_version(&self) -> Option<&str> {
        self.inner.version.as_deref()
    }

    /// Resolve a tool name and execute the upstream call.
    ///
    /// # Errors
    ///
    /// Returns a `Runtime` error for an unknown tool name, a `Timeout` error for an elapsed
    /// deadline, and a `Request` error for transport failures. An upstream status `>= 400`
    /// is not an error here; it surfaces in the returned [`ExecutionResult`].
    pub async fn execute(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
        timeout: Option<Duration>,
    ) -> Result<ExecutionResult> {
        let descriptor = self.inner.registry.resolve(name).ok_or_else(|| {
            SwaggerToolsError::Runtime(format!("Tool not found: {name}"))
        })?;

        let arguments = arguments.unwrap_or_default();
        let fut = self
            .inner
            .executor
            .execute(&descriptor.method, &descriptor.path, &arguments);

        if let Some(t) = timeout.filter(|t| *t > Duration::ZERO) {
            match tokio::time::timeout(t, fut).await {
                Ok(result) => result,
                Err(_) => Err(SwaggerToolsError::Timeout(format!(
                    "Tool call timed out after {}ms",
                    t.as_millis()
                ))),
            }
        } else {
            fut.await
        }
    }

    /// Execute a tool call and project the outcome into an MCP result.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ApiToolSource::execute`].
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
        timeout: Option<Duration>,
    ) -> Result<CallToolResult> {
        let result = self.execute(name, arguments, timeout).await?;
        Ok(result.into_call_tool_result())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterPolicy;
    use axum::Router;
    use axum::http::Uri;
    use axum::routing::any;
    use serde_json::{Value, json};
    use std::fs;
    use tempfile::tempdir;
    use tokio::net::TcpListener;

    const SPEC_YAML: &str = r#"
swagger: "2.0"
info:
  title: Petstore
  version: "1.0"
host: petstore.example.com
schemes: [https]
paths:
  /pets/{id}:
    get:
      operationId: getPetById
      parameters:
        - name: id
          in: path
          required: true
          type: integer
  /pets:
    get:
      operationId: listPets
  /slow:
    get:
      operationId: slowCall
"#;

    async fn echo_handler(uri: Uri) -> axum::Json<Value> {
        axum::Json(json!({ "path": uri.path() }))
    }

    async fn slow_handler() -> axum::Json<Value> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        axum::Json(json!({}))
    }

    async fn spawn_upstream() -> (String, tokio::sync::oneshot::Sender<()>) {
        let app = Router::new()
            .route("/slow", any(slow_handler))
            .route("/{*path}", any(echo_handler));
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local_addr");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        let server = axum::serve(listener, app).with_graceful_shutdown(async move {
            let _ = shutdown_rx.await;
        });
        tokio::spawn(async move {
            let _ = server.await;
        });

        (format!("http://{addr}"), shutdown_tx)
    }

    async fn built_source(base_url: &str) -> ApiToolSource {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("spec.yaml");
        fs::write(&path, SPEC_YAML).expect("write spec");

        let config = BridgeConfig {
            spec: path.to_str().expect("utf8 path").to_string(),
            base_url: Some(base_url.to_string()),
            api_key: None,
            filter: FilterPolicy::default(),
        };
        ApiToolSource::build(&config).await.expect("build source")
    }

    #[tokio::test]
    async fn build_infers_base_url_from_spec() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("spec.yaml");
        fs::write(&path, SPEC_YAML).expect("write spec");

        let config = BridgeConfig {
            spec: path.to_str().expect("utf8 path").to_string(),
            base_url: None,
            api_key: None,
            filter: FilterPolicy::default(),
        };

        let source = ApiToolSource::build(&config).await.expect("build source");
        assert_eq!(source.base_url(), "https://petstore.example.com");
        assert_eq!(source.spec_title(), Some("Petstore"));
    }

    #[tokio::test]
    async fn build_fails_without_any_base_url() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("spec.yaml");
        fs::write(&path, "swagger: \"2.0\"\npaths:\n  /x:\n    get: {}\n").expect("write spec");

        let config = BridgeConfig {
            spec: path.to_str().expect("utf8 path").to_string(),
            base_url: None,
            api_key: None,
            filter: FilterPolicy::default(),
        };

        let err = ApiToolSource::build(&config).await.unwrap_err();
        assert!(err.to_string().contains("base URL"));
    }

    #[tokio::test]
    async fn call_tool_resolves_and_executes() {
        let (base_url, _shutdown) = spawn_upstream().await;
        let source = built_source(&base_url).await;

        let args: JsonObject = json!({"id": 7}).as_object().expect("object").clone();
        let result = source
            .call_tool("getpetbyid", Some(args), None)
            .await
            .expect("call tool");

        assert_eq!(result.is_error, Some(false));
        let text = result.content[0].as_text().expect("text content");
        assert!(text.text.contains("/pets/7"));
    }

    #[tokio::test]
    async fn unknown_tool_is_a_runtime_error() {
        let (base_url, _shutdown) = spawn_upstream().await;
        let source = built_source(&base_url).await;

        let err = source.call_tool("nope", None, None).await.unwrap_err();
        assert!(err.to_string().contains("Tool not found: nope"));
    }

    #[tokio::test]
    async fn call_times_out_when_upstream_stalls() {
        let (base_url, _shutdown) = spawn_upstream().await;
        let source = built_source(&base_url).await;

        let err = source
            .call_tool("slowcall", None, Some(Duration::from_millis(50)))
            .await
            .unwrap_err();
        assert!(matches!(err, SwaggerToolsError::Timeout(_)));
        assert!(err.to_string().contains("timed out"));
    }
}
