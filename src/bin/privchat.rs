//! Privchat CLI — PII-sanitizing LLM proxy with MCP server.
//!
//! Usage:
//!   privchat mcp [--transport stdio]
//!   privchat process <prompt>
//!   privchat sanitize <prompt>

use clap::{Parser, Subcommand};
use privchat::{HttpRecognizer, OllamaClient, PrivchatApi, Settings};
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "privchat",
    version,
    about = "PII-sanitizing proxy for local LLM chat"
)]
struct Cli {
    /// Base URL of the NER sidecar service
    #[arg(long, global = true)]
    recognizer_url: Option<String>,
    /// Base URL of the Ollama instance
    #[arg(long, global = true)]
    ollama_url: Option<String>,
    /// Ollama model name
    #[arg(long, global = true)]
    model: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the MCP (Model Context Protocol) server
    Mcp {
        /// Transport type (currently only stdio)
        #[arg(long, default_value = "stdio")]
        transport: String,
    },
    /// Sanitize a prompt, forward it to the generation backend, and restore the response
    Process {
        /// The prompt text
        prompt: String,
    },
    /// Show the sanitized form of a prompt without contacting the backend
    Sanitize {
        /// The prompt text
        prompt: String,
    },
}

fn build_settings(cli: &Cli) -> Settings {
    let mut settings = Settings::from_env();
    if let Some(url) = &cli.recognizer_url {
        settings.recognizer_url = url.clone();
    }
    if let Some(url) = &cli.ollama_url {
        settings.ollama_url = url.clone();
    }
    if let Some(model) = &cli.model {
        settings.ollama_model = model.clone();
    }
    settings
}

fn build_api(settings: Settings) -> PrivchatApi {
    let recognizer = Arc::new(HttpRecognizer::new(settings.recognizer_url));
    let generation = Arc::new(
        OllamaClient::new(settings.ollama_url, settings.ollama_model)
            .with_instruction(settings.prompt_instruction),
    );
    PrivchatApi::new(recognizer, generation)
}

fn cmd_process(settings: Settings, prompt: &str) -> i32 {
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("failed to create tokio runtime: {}", e);
            return 1;
        }
    };
    rt.block_on(async {
        let api = build_api(settings);
        match api.process(prompt).await {
            Ok(report) => {
                println!("{}", serde_json::to_string_pretty(&report).unwrap());
                0
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                1
            }
        }
    })
}

fn cmd_sanitize(settings: Settings, prompt: &str) -> i32 {
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("failed to create tokio runtime: {}", e);
            return 1;
        }
    };
    rt.block_on(async {
        let api = build_api(settings);
        match api.sanitize_preview(prompt).await {
            Ok(report) => {
                println!("{}", serde_json::to_string_pretty(&report).unwrap());
                0
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                1
            }
        }
    })
}

fn main() {
    // Keep stdout clean for JSON and MCP framing; logs go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = build_settings(&cli);

    match cli.command {
        Commands::Mcp { transport } => {
            if transport != "stdio" {
                eprintln!("error: only 'stdio' transport is currently supported");
                std::process::exit(1);
            }
            let code = privchat::mcp::run_mcp_server(settings);
            std::process::exit(code);
        }
        Commands::Process { prompt } => {
            std::process::exit(cmd_process(settings, &prompt));
        }
        Commands::Sanitize { prompt } => {
            std::process::exit(cmd_sanitize(settings, &prompt));
        }
    }
}
