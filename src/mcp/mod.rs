//! Model Context Protocol (MCP) integration for Rusty Digest.
//!
//! This module wires the digest pipeline into an MCP server so editors and agent hosts can
//! summarize documents and ask questions over stdio. The surface area consists of:
//!
//! - Tools: `summarize`, `ask`, and `metrics`.
//! - Resources: `mcp://settings` and `mcp://usage`.
//!
//! Handlers, schemas, and formatting helpers are kept in focused submodules to make tests and
//! reviews small and targeted.

mod format;
pub mod handlers;
mod registry;
mod schemas;
mod server;

pub use server::RustyDigestMcpServer;
