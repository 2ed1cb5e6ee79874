// SPDX-License-Identifier: MIT OR Apache-2.0
#![deny(unsafe_code)]

mod printer;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::sync::Mutex;
use tokio_stream::StreamExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fd_agent::{Agent, ExtractFromFile, ExtractFromUrl, MemorySaver, ToolRegistry, wire_mcp_tools};
use fd_config::FormdeskConfig;
use fd_gemini_sdk::{GeminiClient, extract};
use fd_mcp::{McpClient, ServerSpec};
use fd_schema::{EXCLUDED_TOOLS, normalize_tools, retain_invocable};

#[derive(Parser, Debug)]
#[command(name = "formdesk", version, about = "Form-processing agent CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a formdesk.toml (defaults to ./formdesk.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive chat with the agent and the configured tool servers.
    Chat {
        /// Conversation thread id (history is kept per thread).
        #[arg(long, default_value = "console")]
        thread: String,
    },

    /// List tool definitions as the model will see them (normalized, filtered).
    Tools {
        /// Print JSON instead of pretty output.
        #[arg(long)]
        json: bool,
    },

    /// One-shot document extraction, no tool server involved.
    Extract {
        /// Path to a local file, or a URL with --url.
        source: String,

        /// Treat the source as a URL instead of a local path.
        #[arg(long)]
        url: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = FormdeskConfig::load(cli.config.as_deref()).context("loading configuration")?;

    let filter = if cli.debug {
        EnvFilter::new("formdesk=debug,fd_agent=debug,fd_mcp=debug,fd_gemini_sdk=debug")
    } else {
        EnvFilter::new(config.log_level.as_deref().unwrap_or("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    for warning in config.warnings() {
        tracing::warn!("{warning}");
    }

    match cli.command {
        Commands::Chat { thread } => cmd_chat(config, thread).await,
        Commands::Tools { json } => cmd_tools(config, json).await,
        Commands::Extract { source, url } => cmd_extract(config, source, url).await,
    }
}

/// Connect every configured tool server, returning the shared client handles.
async fn connect_servers(config: &FormdeskConfig) -> Result<Vec<Arc<Mutex<McpClient>>>> {
    let mut clients = Vec::new();
    for (name, entry) in &config.servers {
        let mut spec = ServerSpec::new(entry.command.as_str());
        spec.args = entry.args.clone();
        spec.env = entry.env.clone();
        let client = McpClient::connect(&spec)
            .await
            .with_context(|| format!("connecting tool server '{name}'"))?;
        info!(server = %name, "tool server connected");
        clients.push(Arc::new(Mutex::new(client)));
    }
    Ok(clients)
}

async fn cmd_chat(config: FormdeskConfig, thread: String) -> Result<()> {
    let gemini = GeminiClient::from_env().context("creating Gemini client")?;

    let mut registry = ToolRegistry::new();
    let clients = connect_servers(&config).await?;
    for client in &clients {
        wire_mcp_tools(&mut registry, client.clone(), EXCLUDED_TOOLS)
            .await
            .context("wiring tool server tools")?;
    }
    registry
        .register(Arc::new(ExtractFromUrl::new(
            gemini.clone(),
            config.model.as_str(),
        )))
        .context("registering URL extraction tool")?;
    registry
        .register(Arc::new(ExtractFromFile::new(
            gemini.clone(),
            config.model.as_str(),
        )))
        .context("registering file extraction tool")?;
    info!(tools = registry.len(), "agent ready");

    let mut agent = Agent::new(
        gemini,
        config.model.as_str(),
        Arc::new(registry),
        MemorySaver::new(),
    )
    .with_max_turns(config.max_turns);
    if let Some(prompt) = &config.system_prompt {
        agent = agent.with_system_prompt(prompt.clone());
    }

    loop {
        let Some(line) = read_instruction().await? else {
            break;
        };
        let instruction = if line.trim().is_empty() {
            // Mirror the demo default: extract the bundled form and file it.
            "Extract the delivery request information from './data/delivery_request.pdf' \
             and enter it into the delivery request app."
                .to_string()
        } else {
            line
        };
        if instruction.contains("quit") {
            break;
        }

        let mut events = agent.run(&thread, &instruction);
        while let Some(event) = events.next().await {
            if let Some(text) = printer::render(&event) {
                println!("{text}");
            }
        }
    }

    for client in &clients {
        client.lock().await.close().await;
    }
    Ok(())
}

/// Prompt and read one line; `None` on EOF.
async fn read_instruction() -> Result<Option<String>> {
    use std::io::Write;
    print!("instruction> ");
    std::io::stdout().flush()?;

    tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        match std::io::stdin().read_line(&mut line) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(line.trim_end().to_string())),
            Err(e) => Err(e.into()),
        }
    })
    .await
    .context("reading from stdin")?
}

async fn cmd_tools(config: FormdeskConfig, json: bool) -> Result<()> {
    let clients = connect_servers(&config).await?;
    if clients.is_empty() {
        anyhow::bail!("no tool servers configured");
    }

    for client in &clients {
        let listed = client.lock().await.list_tools().await?;
        let tools = retain_invocable(normalize_tools(&listed), EXCLUDED_TOOLS);
        if json {
            println!("{}", serde_json::to_string_pretty(&tools)?);
        } else {
            for tool in &tools {
                println!("{}  {}", tool.name, tool.description);
            }
        }
        client.lock().await.close().await;
    }
    Ok(())
}

async fn cmd_extract(config: FormdeskConfig, source: String, url: bool) -> Result<()> {
    let gemini = GeminiClient::from_env().context("creating Gemini client")?;
    let json = if url {
        extract::document_json_from_url(&gemini, &config.model, &source).await?
    } else {
        extract::document_json_from_file(&gemini, &config.model, &source).await?
    };
    println!("{json}");
    Ok(())
}
