//! Session-oriented MCP front-end (stdio transport).
//!
//! Pure protocol framing: tool listing and dispatch live in the shared
//! [`ApiToolSource`], so this handler stays identical in behavior to the HTTP front-end.

use bridge_swagger_tools::error::SwaggerToolsError;
use bridge_swagger_tools::source::ApiToolSource;
use rmcp::model::{
    CallToolRequestParams, CallToolResult, ErrorData, Implementation, ListToolsResult,
    PaginatedRequestParams, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::transport::stdio;
use rmcp::{RoleServer, ServerHandler, ServiceExt};
use std::time::Duration;

#[derive(Clone)]
pub struct SwaggerBridgeHandler {
    source: ApiToolSource,
    call_timeout: Option<Duration>,
}

impl SwaggerBridgeHandler {
    #[must_use]
    pub fn new(source: ApiToolSource, call_timeout: Option<Duration>) -> Self {
        Self {
            source,
            call_timeout,
        }
    }
}

fn map_tools_error(e: SwaggerToolsError) -> ErrorData {
    match e {
        SwaggerToolsError::Runtime(msg) => ErrorData::invalid_params(msg, None),
        other => ErrorData::internal_error(other.to_string(), None),
    }
}

impl ServerHandler for SwaggerBridgeHandler {
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult {
            tools: self.source.list_tools(),
            ..Default::default()
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        self.source
            .call_tool(&request.name, request.arguments, self.call_timeout)
            .await
            .map_err(map_tools_error)
    }

    fn get_info(&self) -> ServerInfo {
        let title = self
            .source
            .spec_title()
            .unwrap_or("Swagger MCP Bridge")
            .to_string();

        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            protocol_version: ProtocolVersion::LATEST,
            server_info: Implementation {
                name: "swagger-mcp-bridge".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some(title),
                ..Default::default()
            },
            instructions: Some(
                "Tools on this server are generated from a Swagger API description; each tool \
                 call performs one HTTP request against the upstream API."
                    .to_string(),
            ),
        }
    }
}

/// Serve the source over stdio until the client disconnects.
pub async fn serve_stdio(
    source: ApiToolSource,
    call_timeout: Option<Duration>,
) -> anyhow::Result<()> {
    tracing::info!("Starting MCP stdio front-end");
    let handler = SwaggerBridgeHandler::new(source, call_timeout);
    let service = handler.serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}
