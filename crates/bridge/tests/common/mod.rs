use anyhow::Context as _;
use axum::Router;
use axum::http::Uri;
use axum::routing::any;
use serde_json::{Value, json};
use std::net::TcpListener;
use std::process::{Child, Command};
use std::time::{Duration, Instant};

pub struct KillOnDrop(pub Child);

impl Drop for KillOnDrop {
    fn drop(&mut self) {
        let _ = self.0.kill();
    }
}

/// Pick an unused TCP port on localhost.
///
/// Note: this does not reserve the port; another process may still bind it first.
pub fn pick_unused_port() -> anyhow::Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").context("bind ephemeral port")?;
    Ok(listener.local_addr()?.port())
}

/// Poll an HTTP URL until it returns a success status.
pub async fn wait_http_ok(url: &str, timeout_dur: Duration) -> anyhow::Result<()> {
    let client = reqwest::Client::new();
    let start = Instant::now();
    loop {
        if start.elapsed() > timeout_dur {
            anyhow::bail!("timed out waiting for {url}");
        }

        match client.get(url).send().await {
            Ok(resp) if resp.status().is_success() => return Ok(()),
            _ => tokio::time::sleep(Duration::from_millis(100)).await,
        }
    }
}

/// Spawn the bridge binary with its HTTP front-end enabled.
pub fn spawn_bridge(spec_path: &std::path::Path, api_base: &str, port: u16) -> anyhow::Result<Child> {
    let bin = env!("CARGO_BIN_EXE_swagger-mcp-bridge");
    Command::new(bin)
        .arg("--spec")
        .arg(spec_path)
        .arg("--api-base")
        .arg(api_base)
        .arg("--http-port")
        .arg(port.to_string())
        .arg("--http-host")
        .arg("127.0.0.1")
        .arg("--log-level")
        .arg("info")
        .spawn()
        .context("spawn bridge")
}

async fn echo_handler(method: axum::http::Method, uri: Uri, body: axum::body::Bytes) -> axum::Json<Value> {
    axum::Json(json!({
        "method": method.as_str(),
        "path": uri.path(),
        "query": uri.query().unwrap_or(""),
        "body": String::from_utf8_lossy(&body),
    }))
}

/// Run an in-process echo upstream on an ephemeral port. The server stops when the returned
/// sender is dropped.
pub async fn spawn_echo_upstream() -> anyhow::Result<(String, tokio::sync::oneshot::Sender<()>)> {
    let app = Router::new().route("/{*path}", any(echo_handler));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("bind echo upstream")?;
    let addr = listener.local_addr()?;

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        let _ = shutdown_rx.await;
    });
    tokio::spawn(async move {
        let _ = server.await;
    });

    Ok((format!("http://{addr}"), shutdown_tx))
}
