#![deny(missing_docs)]

//! Core library for the Rusty Digest summarization and question answering server.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Plain-text extraction from uploads and web pages.
pub mod extract;
/// Structured logging and tracing setup.
pub mod logging;
/// Model Context Protocol server implementation.
pub mod mcp;
/// Summarization and question answering counters.
pub mod metrics;
/// Inference provider abstractions and adapters.
pub mod models;
/// Chunked summarization pipeline and digest service.
pub mod pipeline;
