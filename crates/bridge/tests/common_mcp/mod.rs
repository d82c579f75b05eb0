use anyhow::Context as _;
use serde_json::{Value, json};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt as _, AsyncWriteExt as _, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

/// Minimal MCP client for the bridge's stdio transport (newline-delimited JSON-RPC).
///
/// This intentionally avoids re-implementing any MCP logic in production code; it exists only
/// for integration tests.
pub struct McpStdioSession {
    // Held so the child is killed when the session drops.
    _child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl McpStdioSession {
    /// Spawn the bridge binary in stdio mode and run the MCP handshake.
    pub async fn connect(spec_path: &std::path::Path, api_base: &str) -> anyhow::Result<Self> {
        let bin = env!("CARGO_BIN_EXE_swagger-mcp-bridge");
        let mut child = Command::new(bin)
            .arg("--spec")
            .arg(spec_path)
            .arg("--api-base")
            .arg(api_base)
            .arg("--log-level")
            .arg("warn")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .context("spawn bridge (stdio)")?;

        let stdin = child.stdin.take().context("bridge stdin")?;
        let stdout = BufReader::new(child.stdout.take().context("bridge stdout")?);
        let mut session = Self {
            _child: child,
            stdin,
            stdout,
        };

        let init = session
            .request(
                0,
                "initialize",
                json!({
                    "protocolVersion": "2024-11-05",
                    "capabilities": {},
                    "clientInfo": { "name": "swagger-mcp-bridge-integration-tests", "version": "0" }
                }),
                Duration::from_secs(10),
            )
            .await?;
        anyhow::ensure!(init.get("id") == Some(&json!(0)), "unexpected init id");

        session
            .send(json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))
            .await?;

        Ok(session)
    }

    pub async fn request(
        &mut self,
        id: u64,
        method: &str,
        params: Value,
        timeout_dur: Duration,
    ) -> anyhow::Result<Value> {
        self.send(json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        }))
        .await?;

        tokio::time::timeout(timeout_dur, self.read_response(id))
            .await
            .context("timeout waiting for stdio response")?
    }

    async fn send(&mut self, message: Value) -> anyhow::Result<()> {
        let mut line = serde_json::to_string(&message)?;
        line.push('\n');
        self.stdin
            .write_all(line.as_bytes())
            .await
            .context("write to bridge stdin")?;
        self.stdin.flush().await?;
        Ok(())
    }

    async fn read_response(&mut self, id: u64) -> anyhow::Result<Value> {
        loop {
            let mut line = String::new();
            let n = self
                .stdout
                .read_line(&mut line)
                .await
                .context("read from bridge stdout")?;
            anyhow::ensure!(n > 0, "bridge closed stdout");

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let msg: Value =
                serde_json::from_str(trimmed).context("parse stdio message as JSON")?;
            // Skip server-initiated notifications; only the matching response counts.
            if msg.get("id") == Some(&json!(id)) {
                return Ok(msg);
            }
        }
    }
}
