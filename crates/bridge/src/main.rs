//! `swagger-mcp-bridge` entry point.
//!
//! Loads a Swagger spec, builds the shared tool source, and serves it over one of two
//! front-ends: the MCP stdio transport (default) or a stateless HTTP API.

mod http;
mod mcp;

use anyhow::Context as _;
use bridge_swagger_tools::config::BridgeConfig;
use bridge_swagger_tools::filter::FilterPolicy;
use bridge_swagger_tools::source::ApiToolSource;
use clap::Parser;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "swagger-mcp-bridge",
    version,
    about = "Expose a Swagger-described REST API as MCP tools"
)]
struct Cli {
    /// Swagger/OpenAPI spec: a file path or an http(s) URL.
    #[arg(long, env = "BRIDGE_SPEC")]
    spec: String,

    /// Base URL for API calls (overrides the spec).
    #[arg(long, env = "BRIDGE_API_BASE")]
    api_base: Option<String>,

    /// API key forwarded to the upstream API.
    #[arg(long, env = "BRIDGE_API_KEY")]
    api_key: Option<String>,

    /// Paths to exclude; entries containing '*' are treated as patterns (e.g. '/users,/admin/*').
    #[arg(long, value_delimiter = ',')]
    exclude_paths: Vec<String>,

    /// Operation ids to exclude.
    #[arg(long, value_delimiter = ',')]
    exclude_operations: Vec<String>,

    /// HTTP methods to exclude (e.g. 'DELETE,PATCH').
    #[arg(long, value_delimiter = ',')]
    exclude_methods: Vec<String>,

    /// Tags to exclude.
    #[arg(long, value_delimiter = ',')]
    exclude_tags: Vec<String>,

    /// Paths to include exclusively.
    #[arg(long, value_delimiter = ',')]
    include_only_paths: Vec<String>,

    /// Operation ids to include exclusively.
    #[arg(long, value_delimiter = ',')]
    include_only_operations: Vec<String>,

    /// HTTP front-end port (0 = disabled, use the stdio transport).
    #[arg(long, default_value_t = 0)]
    http_port: u16,

    /// HTTP front-end host.
    #[arg(long, default_value = "127.0.0.1")]
    http_host: String,

    /// Per-call timeout in seconds (0 disables it).
    #[arg(long, default_value_t = 30)]
    call_timeout_secs: u64,

    /// Log filter (tracing `EnvFilter` syntax).
    #[arg(long, env = "BRIDGE_LOG", default_value = "info")]
    log_level: String,
}

impl Cli {
    fn filter_policy(&self) -> FilterPolicy {
        let mut policy = FilterPolicy {
            include_only_paths: self.include_only_paths.clone(),
            include_only_operation_ids: self.include_only_operations.clone(),
            exclude_operation_ids: self.exclude_operations.clone(),
            exclude_methods: self.exclude_methods.clone(),
            exclude_tags: self.exclude_tags.clone(),
            ..FilterPolicy::default()
        };

        for entry in &self.exclude_paths {
            if entry.contains('*') {
                policy.exclude_path_patterns.push(entry.clone());
            } else {
                policy.exclude_paths.push(entry.clone());
            }
        }

        policy
    }

    fn call_timeout(&self) -> Option<Duration> {
        (self.call_timeout_secs > 0).then(|| Duration::from_secs(self.call_timeout_secs))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the stdio MCP transport.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = BridgeConfig {
        spec: cli.spec.clone(),
        base_url: cli.api_base.clone(),
        api_key: cli.api_key.clone(),
        filter: cli.filter_policy(),
    };

    let source = ApiToolSource::build(&config)
        .await
        .context("start tool source")?;

    if cli.http_port > 0 {
        http::serve(source, &cli.http_host, cli.http_port, cli.call_timeout()).await
    } else {
        mcp::serve_stdio(source, cli.call_timeout()).await
    }
}
