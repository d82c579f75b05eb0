//! Shared Swagger->MCP tooling.
//!
//! This crate is intended to be used by both `swagger-mcp-bridge` front-ends:
//! - the MCP stdio front-end (session-oriented)
//! - the stateless HTTP front-end
//!
//! It intentionally contains **no** transport framing: front-ends only translate protocol
//! requests into [`source::ApiToolSource`] calls.

pub mod config;
pub mod descriptor;
pub mod error;
pub mod executor;
pub mod filter;
pub mod registry;
pub mod safety;
pub mod semantics;
pub mod source;
pub mod spec;
