//! MCP server handler implementation.
//!
//! Routes tool calls to the crawl tools. Crawls are serialized behind one
//! async lock so the crawler is never re-entered concurrently.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::tools::{
    CrawlFeedParams, CrawlKeywordsParams, CrawlSourceParams, NewsCrawler, crawl_all::crawl_all_impl,
    crawl_feed::crawl_feed_impl, crawl_keywords::crawl_keywords_impl, crawl_source::crawl_source_impl,
};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for newsroom.
#[derive(Clone)]
pub struct NewsroomServer {
    crawler: Arc<NewsCrawler>,
    crawl_lock: Arc<Mutex<()>>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl NewsroomServer {
    pub fn new(crawler: NewsCrawler) -> Self {
        Self { crawler: Arc::new(crawler), crawl_lock: Arc::new(Mutex::new(())), tool_router: Self::tool_router() }
    }

    #[tool(description = "Crawl one configured news source by id. Returns {source_id, inserted, considered}.")]
    async fn crawl_source(&self, params: Parameters<CrawlSourceParams>) -> Result<CallToolResult, McpError> {
        let _guard = self.crawl_lock.lock().await;
        crawl_source_impl(&self.crawler, params.0).await
    }

    #[tool(
        description = "Crawl every configured source in order. \
                       Failing sources are reported with their error and do not stop the run."
    )]
    async fn crawl_all(&self) -> Result<CallToolResult, McpError> {
        let _guard = self.crawl_lock.lock().await;
        crawl_all_impl(&self.crawler).await
    }

    #[tool(
        description = "Ingest an RSS/Atom feed. Articles are stored without a source id; no recency window applies."
    )]
    async fn crawl_feed(&self, params: Parameters<CrawlFeedParams>) -> Result<CallToolResult, McpError> {
        let _guard = self.crawl_lock.lock().await;
        crawl_feed_impl(&self.crawler, params.0).await
    }

    #[tool(
        description = "Search news providers (google, naver) for keywords and store recent results. \
                       Omitted parameters use configured defaults."
    )]
    async fn crawl_keywords(&self, params: Parameters<CrawlKeywordsParams>) -> Result<CallToolResult, McpError> {
        let _guard = self.crawl_lock.lock().await;
        crawl_keywords_impl(&self.crawler, params.0).await
    }
}

impl ServerHandler for NewsroomServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "newsroom".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
