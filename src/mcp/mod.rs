//! MCP server for Privchat — exposes the sanitize/forward/restore pipeline
//! via the Model Context Protocol.
//!
//! Tools: process_prompt, sanitize_prompt.

pub mod params;

use params::*;

use crate::api::PrivchatApi;
use crate::config::Settings;
use crate::generation::OllamaClient;
use crate::recognizer::HttpRecognizer;
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt,
};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn ok_text(text: String) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

fn err_text(msg: String) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::error(vec![Content::text(msg)]))
}

// ---------------------------------------------------------------------------
// PrivchatMcpServer
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct PrivchatMcpServer {
    api: PrivchatApi,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl PrivchatMcpServer {
    pub fn new(api: PrivchatApi) -> Self {
        Self {
            api,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Sanitize a prompt's PII, forward it to the generation backend, and restore the response"
    )]
    async fn process_prompt(
        &self,
        Parameters(p): Parameters<ProcessPromptParams>,
    ) -> Result<CallToolResult, McpError> {
        match self.api.process(&p.prompt).await {
            Ok(report) => ok_text(serde_json::to_string_pretty(&report).unwrap()),
            Err(e) => err_text(e.to_string()),
        }
    }

    #[tool(
        description = "Preview the sanitized form of a prompt without contacting the generation backend"
    )]
    async fn sanitize_prompt(
        &self,
        Parameters(p): Parameters<SanitizePromptParams>,
    ) -> Result<CallToolResult, McpError> {
        match self.api.sanitize_preview(&p.prompt).await {
            Ok(report) => ok_text(serde_json::to_string_pretty(&report).unwrap()),
            Err(e) => err_text(e.to_string()),
        }
    }
}

#[tool_handler]
impl ServerHandler for PrivchatMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Privchat MCP server — sanitizes PII out of prompts, forwards them to a local LLM, and restores the response"
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run_mcp_server(settings: Settings) -> i32 {
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("failed to create tokio runtime: {}", e);
            return 1;
        }
    };

    rt.block_on(async {
        let recognizer = Arc::new(HttpRecognizer::new(settings.recognizer_url));
        let generation = Arc::new(
            OllamaClient::new(settings.ollama_url, settings.ollama_model)
                .with_instruction(settings.prompt_instruction),
        );
        let server = PrivchatMcpServer::new(PrivchatApi::new(recognizer, generation));

        eprintln!("privchat mcp server starting on stdio...");

        let service = match server.serve(rmcp::transport::stdio()).await {
            Ok(s) => s,
            Err(e) => {
                eprintln!("failed to start MCP server: {}", e);
                return 1;
            }
        };

        if let Err(e) = service.waiting().await {
            eprintln!("MCP server error: {}", e);
            return 1;
        }

        0
    })
}
