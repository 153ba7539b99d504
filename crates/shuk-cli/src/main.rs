//! Interactive chat REPL for the Shuk conversation engine.
//!
//! Wires the in-memory repositories to the message router so the whole
//! report/search dialogue can be driven from a terminal. Button taps are
//! simulated with `/btn <id>`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use shuk_application::{InboundMessage, MessageRouter, ReportFlowService, SearchFlowService};
use shuk_core::config::EngineConfig;
use shuk_core::i18n::{StaticTranslator, Translator};
use shuk_infrastructure::memory::{
    InMemoryCityRepository, InMemoryLookupSessionRepository, InMemoryPriceReportRepository,
    InMemoryProductRepository, InMemoryReportSessionRepository, InMemoryStoreRepository,
    InMemoryUserRepository,
};

#[derive(Parser)]
#[command(name = "shuk", about = "Chat REPL for the Shuk price-report engine")]
struct Cli {
    /// Optional engine configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulated chat sender id
    #[arg(long, default_value = "local-user")]
    user: String,
}

fn build_router(config: EngineConfig) -> MessageRouter {
    let users = Arc::new(InMemoryUserRepository::new());
    let cities = Arc::new(InMemoryCityRepository::new());
    let stores = Arc::new(InMemoryStoreRepository::new());
    let products = Arc::new(InMemoryProductRepository::new());
    let reports = Arc::new(InMemoryPriceReportRepository::new(
        stores.clone(),
        products.clone(),
        cities.clone(),
    ));
    let translator: Arc<dyn Translator> = Arc::new(StaticTranslator);

    let report_flow = ReportFlowService::new(
        Arc::new(InMemoryReportSessionRepository::new()),
        users.clone(),
        cities.clone(),
        stores.clone(),
        products.clone(),
        reports.clone(),
        translator.clone(),
        config.clone(),
    );
    let search_flow = SearchFlowService::new(
        Arc::new(InMemoryLookupSessionRepository::new()),
        reports,
        stores,
        products,
        cities,
        translator.clone(),
        config,
    );
    MessageRouter::new(users, report_flow, search_flow, translator)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let router = build_router(config);

    println!(
        "{}",
        "Shuk chat REPL. Type a message; /btn <id> taps a button; /quit exits.".dimmed()
    );

    let mut editor = DefaultEditor::new()?;
    loop {
        let line = match editor.readline("you> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        };
        let trimmed = line.trim();
        if trimmed == "/quit" {
            break;
        }
        editor.add_history_entry(trimmed)?;

        let message = match trimmed.strip_prefix("/btn ") {
            Some(id) => InboundMessage::button(id.trim()),
            None => InboundMessage::text(trimmed),
        };
        let reply = router.handle(&cli.user, message).await?;

        println!("{}", reply.text.green());
        for button in &reply.buttons {
            println!("  {} {}", format!("[{}]", button.id).cyan(), button.title);
        }
    }
    Ok(())
}
