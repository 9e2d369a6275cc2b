//! tabchat application binary - composition root.
//!
//! Ties the tabchat crates together into a terminal chat:
//! 1. Load configuration from TOML
//! 2. Build the data source (CSV uploads or an external table)
//! 3. Build the reasoning agent (HTTP backend or offline mock)
//! 4. Run the interactive loop, repainting the chat and visual panes from
//!    session state on every interaction
//!
//! The loop deliberately re-renders everything from the session store each
//! time around: all conversational state lives in the store, none in the
//! loop.

mod cli;

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use tabchat_agent::{MockAgent, OpenAiAgent, ReasoningAgent};
use tabchat_chat::{
    render_chat, render_visual, toggle_artifact, Dispatcher, MessagePayload, RenderInstruction,
    ResponseVariant, Role, Session, SessionStore, VisualPane,
};
use tabchat_core::{DataSource, ExternalTable, TabchatConfig, TabchatError, TableHandle};

use cli::CliArgs;

/// Expand ~ to the home directory in a path string.
fn resolve_dir(dir: &str) -> PathBuf {
    if dir.starts_with("~/") || dir.starts_with("~\\") {
        #[cfg(target_os = "windows")]
        let home = std::env::var("USERPROFILE").unwrap_or_else(|_| ".".to_string());
        #[cfg(not(target_os = "windows"))]
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(&dir[2..])
    } else {
        PathBuf::from(dir)
    }
}

/// Build the data source from CLI flags.
fn build_data_source(args: &CliArgs) -> Result<DataSource, TabchatError> {
    if !args.csv.is_empty() {
        return DataSource::from_csv_files(&args.csv);
    }
    if args.wants_external() {
        let ext = ExternalTable {
            host: args.host.clone().unwrap_or_default(),
            port: args.port,
            user: args.user.clone().unwrap_or_default(),
            password: args.password.clone().unwrap_or_default(),
            database: args.database.clone().unwrap_or_default(),
            table: args.table.clone().unwrap_or_default(),
        };
        return DataSource::from_external(ext);
    }
    Err(TabchatError::Config(
        "no data source: pass --csv FILE or the external table flags".to_string(),
    ))
}

/// Paint the chat pane from render instructions.
fn paint_chat(session: &Session) {
    println!("----------------------------------------");
    for instruction in render_chat(session) {
        match instruction {
            RenderInstruction::UserText { text, .. } => println!("you> {}", text),
            RenderInstruction::AssistantText { text, .. } => println!("bot> {}", text),
            RenderInstruction::AssistantTable { table, .. } => {
                println!("bot> table {}:", table.name);
                print_table(&table);
            }
            RenderInstruction::AssistantImageToggle {
                index, selected, ..
            } => {
                let marker = if selected { " (showing)" } else { "" };
                println!("bot> [chart ready, /show {} to view]{}", index, marker);
            }
            RenderInstruction::AssistantError { text, .. } => println!("bot! {}", text),
        }
    }
}

/// Paint the secondary visual pane.
fn paint_visual(session: &Session) {
    match render_visual(session) {
        VisualPane::Empty => {}
        VisualPane::Image { path, .. } => {
            println!("[visual pane] chart at {}", path.display());
        }
        VisualPane::Missing { artifact } => {
            println!("[visual pane] artifact {} not found", artifact);
        }
    }
}

fn print_table(table: &TableHandle) {
    println!("     {}", table.columns.join(" | "));
    for row in &table.rows {
        println!("     {}", row.join(" | "));
    }
}

fn greet(session: &mut Session, greeting: &str) {
    session.append(
        Role::Assistant,
        MessagePayload::Response(ResponseVariant::Text(greeting.to_string())),
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config first: the log level may come from it.
    let config_file = args.resolve_config_path();
    let config = TabchatConfig::load_or_default(&config_file);

    // Tracing. CLI flag wins over the config file.
    let log_level = args
        .resolve_log_level()
        .unwrap_or_else(|| config.general.log_level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    tracing::info!("Starting tabchat v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    // Data source: required before the first question can be dispatched.
    let source = match build_data_source(&args) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e);
            return Err(e.into());
        }
    };
    tracing::info!(tables = ?source.table_names(), "Data source ready");
    println!("Chatting with: {}", source.describe());

    // Reasoning agent. A missing access key is fatal before the loop.
    let agent: Arc<dyn ReasoningAgent> = if args.mock {
        tracing::info!("Using offline mock agent");
        Arc::new(MockAgent::new())
    } else {
        match OpenAiAgent::from_env(&config.agent) {
            Ok(agent) => Arc::new(agent.with_tables(&source)),
            Err(e) => {
                eprintln!("{}", e);
                return Err(TabchatError::from(e).into());
            }
        }
    };

    // Session state.
    let artifact_dir = resolve_dir(&config.artifacts.dir);
    let mut store = SessionStore::new(artifact_dir);
    let session_id = uuid::Uuid::new_v4();
    greet(store.get_or_create(session_id), &config.chat.greeting);

    let dispatcher = Dispatcher::new(agent, config.chat.max_question_len);

    println!("Commands: /show N, /reset, /quit");

    let stdin = std::io::stdin();
    loop {
        // Repaint everything from session state, then prompt.
        paint_chat(store.get_or_create(session_id));
        paint_visual(store.get_or_create(session_id));
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let line = line.trim();

        match line {
            "" => continue,
            "/quit" => break,
            "/reset" => {
                store.reset(session_id);
                greet(store.get_or_create(session_id), &config.chat.greeting);
            }
            _ if line.starts_with("/show ") => {
                let session = store.get_or_create(session_id);
                match line["/show ".len()..].trim().parse::<usize>() {
                    Ok(index) => {
                        if let Err(e) = toggle_artifact(session, index) {
                            println!("bot! {}", e);
                        }
                    }
                    Err(_) => println!("bot! usage: /show N"),
                }
            }
            question => {
                println!("thinking...");
                if let Err(e) = dispatcher.ask(&mut store, session_id, question).await {
                    // Rejected before dispatch (empty, too long, busy).
                    println!("bot! {}", e);
                }
            }
        }
    }

    tracing::info!("tabchat shutting down");
    Ok(())
}
