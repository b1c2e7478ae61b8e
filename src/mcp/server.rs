//! MCP server bootstrap and request dispatch.

use std::{borrow::Cow, sync::Arc};

use crate::{
    config::get_config,
    mcp::{
        format::{
            AskToolOutput, MetricsToolOutput, SummarizeToolOutput, json_resource_contents,
            serialize_json, settings_snapshot, usage_payload,
        },
        handlers::{ask::handle_ask, metrics::handle_metrics, summarize::handle_summarize},
        registry, schemas,
    },
    pipeline::DigestApi,
};
use rmcp::{
    ErrorData as McpError,
    handler::server::ServerHandler,
    model::{
        AnnotateAble, CallToolRequestParam, CallToolResult, ListResourcesResult, ListToolsResult,
        RawResource, ReadResourceRequestParam, ReadResourceResult, Resource, ServerCapabilities,
        ServerInfo, Tool, ToolAnnotations,
    },
};

const SETTINGS_URI: &str = "mcp://settings";
const USAGE_URI: &str = "mcp://usage";

/// MCP server implementation exposing Rusty Digest operations.
#[derive(Clone)]
pub struct RustyDigestMcpServer {
    digest: Arc<dyn DigestApi>,
    registry: Arc<registry::Registry>,
}

impl RustyDigestMcpServer {
    /// Create a new MCP server using the supplied digest pipeline.
    pub fn new(digest: Arc<dyn DigestApi>) -> Self {
        let mut registry = registry::Registry::default();
        registry.register_resource(SETTINGS_URI, resource_settings);
        registry.register_resource(USAGE_URI, resource_usage);

        registry.register_tool("summarize", tool_summarize);
        registry.register_tool("ask", tool_ask);
        registry.register_tool("metrics", tool_metrics);

        Self {
            digest,
            registry: Arc::new(registry),
        }
    }

    fn describe_tools(&self) -> Vec<Tool> {
        let defaults = self.digest.defaults();
        vec![
            Tool {
                name: Cow::Borrowed("summarize"),
                title: Some("Summarize Document".to_string()),
                description: Some(Cow::Borrowed(
                    "Condense a long text or web page into a short summary by summarizing fixed-size chunks and joining them in order.",
                )),
                input_schema: Arc::new(schemas::summarize_input_schema(&defaults)),
                output_schema: Some(Arc::new(schemas::output_schema::<SummarizeToolOutput>())),
                annotations: Some(
                    ToolAnnotations::with_title("Summarize Document")
                        .read_only(true)
                        .idempotent(true)
                        .open_world(true),
                ),
                icons: None,
            },
            Tool {
                name: Cow::Borrowed("ask"),
                title: Some("Ask Question".to_string()),
                description: Some(Cow::Borrowed(
                    "Extract the answer to a question from a supplied context passage.",
                )),
                input_schema: Arc::new(schemas::ask_input_schema()),
                output_schema: Some(Arc::new(schemas::output_schema::<AskToolOutput>())),
                annotations: Some(
                    ToolAnnotations::with_title("Ask Question")
                        .read_only(true)
                        .idempotent(true)
                        .open_world(false),
                ),
                icons: None,
            },
            Tool {
                name: Cow::Borrowed("metrics"),
                title: Some("Metrics Snapshot".to_string()),
                description: Some(Cow::Borrowed(
                    "Check summarization volume, failed chunks, and answered questions at a glance.",
                )),
                input_schema: Arc::new(schemas::empty_object_schema()),
                output_schema: Some(Arc::new(schemas::output_schema::<MetricsToolOutput>())),
                annotations: Some(
                    ToolAnnotations::with_title("Metrics Snapshot")
                        .read_only(true)
                        .idempotent(true)
                        .open_world(false),
                ),
                icons: None,
            },
        ]
    }

    fn describe_resources(&self) -> Vec<Resource> {
        let mut settings = RawResource::new(SETTINGS_URI, "settings");
        settings.description =
            Some("Model providers and effective chunking defaults for summarization".into());

        let mut usage = RawResource::new(USAGE_URI, "usage");
        usage.description = Some(
            "Recommended tool flow: summarize long inputs, then ask focused questions.".into(),
        );

        vec![settings.no_annotation(), usage.no_annotation()]
    }
}

fn resource_settings(
    server: &RustyDigestMcpServer,
    _request: ReadResourceRequestParam,
) -> registry::ResourceFuture {
    let defaults = server.digest.defaults();
    Box::pin(async move {
        let payload = settings_snapshot(get_config(), defaults);
        Ok(ReadResourceResult {
            contents: vec![json_resource_contents(
                SETTINGS_URI,
                serialize_json(&payload, SETTINGS_URI),
            )],
        })
    })
}

fn resource_usage(
    _server: &RustyDigestMcpServer,
    _request: ReadResourceRequestParam,
) -> registry::ResourceFuture {
    Box::pin(async move {
        Ok(ReadResourceResult {
            contents: vec![json_resource_contents(
                USAGE_URI,
                serialize_json(&usage_payload(), USAGE_URI),
            )],
        })
    })
}

fn tool_summarize(
    server: &RustyDigestMcpServer,
    request: CallToolRequestParam,
) -> registry::ToolFuture {
    let digest = server.digest.clone();
    Box::pin(async move { handle_summarize(&digest, request.arguments).await })
}

fn tool_ask(server: &RustyDigestMcpServer, request: CallToolRequestParam) -> registry::ToolFuture {
    let digest = server.digest.clone();
    Box::pin(async move { handle_ask(&digest, request.arguments).await })
}

fn tool_metrics(
    server: &RustyDigestMcpServer,
    _request: CallToolRequestParam,
) -> registry::ToolFuture {
    let digest = server.digest.clone();
    Box::pin(async move { handle_metrics(&digest).await })
}

impl ServerHandler for RustyDigestMcpServer {
    fn get_info(&self) -> ServerInfo {
        let mut implementation = rmcp::model::Implementation::from_build_env();
        implementation.name = "rusty-digest".to_string();
        implementation.title = Some("Rusty Digest MCP".to_string());
        implementation.version = env!("CARGO_PKG_VERSION").to_string();

        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_resources()
                .enable_tools()
                .build(),
            server_info: implementation,
            instructions: Some(
                "Use this server to summarize long documents or web pages and to answer questions from a context passage. Call summarize with text or a url, then ask focused questions against the result.".into(),
            ),
            ..ServerInfo::default()
        }
    }

    fn list_resources(
        &self,
        _request: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourcesResult, McpError>> + Send + '_ {
        let resources = self.describe_resources();
        std::future::ready(Ok(ListResourcesResult::with_all_items(resources)))
    }

    fn list_tools(
        &self,
        _request: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        let tools = self.describe_tools();
        std::future::ready(Ok(ListToolsResult::with_all_items(tools)))
    }

    #[allow(clippy::manual_async_fn)]
    fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ReadResourceResult, McpError>> + Send + '_ {
        async move {
            if let Some(handler) = self.registry.resources.get(request.uri.as_str()) {
                return handler(self, request).await;
            }

            Err(McpError::invalid_params(
                format!("Unknown resource URI: {}", request.uri),
                None,
            ))
        }
    }

    #[allow(clippy::manual_async_fn)]
    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move {
            if let Some(handler) = self.registry.tools.get(request.name.as_ref()) {
                return handler(self, request).await;
            }

            Err(McpError::invalid_params(
                format!("Unknown tool: {}", request.name),
                None,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricsSnapshot;
    use crate::pipeline::{
        DigestError, DocumentSource, QaResult, SummarizeOptions, SummarizeOverrides,
        SummaryOutcome,
    };
    use async_trait::async_trait;
    use rmcp::model::ResourceContents;

    struct FixedDigest;

    #[async_trait]
    impl DigestApi for FixedDigest {
        async fn summarize(
            &self,
            _source: DocumentSource,
            _overrides: SummarizeOverrides,
        ) -> Result<SummaryOutcome, DigestError> {
            Ok(SummaryOutcome {
                summary: "fixed".into(),
                chunk_count: 1,
                failed_chunks: 0,
                chunk_size: 1024,
            })
        }

        async fn answer(
            &self,
            _context: String,
            _question: String,
        ) -> Result<QaResult, DigestError> {
            Err(DigestError::InvalidArgument("unused".into()))
        }

        fn metrics_snapshot(&self) -> MetricsSnapshot {
            MetricsSnapshot::default()
        }

        fn defaults(&self) -> SummarizeOptions {
            SummarizeOptions {
                chunk_size: 256,
                ..SummarizeOptions::default()
            }
        }
    }

    fn server() -> RustyDigestMcpServer {
        RustyDigestMcpServer::new(Arc::new(FixedDigest))
    }

    #[test]
    fn registry_covers_every_described_tool_and_resource() {
        let server = server();
        for tool in server.describe_tools() {
            assert!(
                server.registry.tools.contains_key(tool.name.as_ref()),
                "missing handler for {}",
                tool.name
            );
            assert!(tool.output_schema.is_some());
        }
        for resource in server.describe_resources() {
            assert!(server.registry.resources.contains_key(resource.uri.as_str()));
        }
    }

    #[test]
    fn summarize_tool_schema_uses_service_defaults() {
        let tools = server().describe_tools();
        let summarize = tools
            .iter()
            .find(|tool| tool.name == "summarize")
            .expect("summarize tool");
        assert_eq!(
            summarize.input_schema["properties"]["chunk_size"]["default"],
            256
        );
    }

    #[tokio::test]
    async fn usage_resource_is_json() {
        let server = server();
        let handler = server.registry.resources[USAGE_URI];
        let result = handler(
            &server,
            ReadResourceRequestParam {
                uri: USAGE_URI.into(),
            },
        )
        .await
        .expect("usage resource");

        let ResourceContents::TextResourceContents { text, .. } = &result.contents[0] else {
            panic!("expected text contents");
        };
        let value: serde_json::Value = serde_json::from_str(text).expect("json");
        assert_eq!(value["title"], "Rusty Digest MCP Usage");
    }
}
