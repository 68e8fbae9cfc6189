//! IYM CLI entry point.
//!
//! Subcommands: `chat`, `ask`, `check`, `moods`, `sos`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

use iym::agent::{builtin_moods, find_mood, ChatSession, MoodContext, Orchestrator, SessionError};
use iym::config::{runtime_paths, Config};
use iym::credentials::load_default_credentials;
use iym::logging;
use iym::safety::{is_instruction_extraction_attempt, CrisisCatalog};

/// IYM — a mood-aware support chat in your terminal.
#[derive(Debug, Parser)]
#[command(name = "iym", version, about)]
struct Cli {
    /// Config file (defaults to `$IYM_CONFIG` or `~/.iym/config.toml`).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start an interactive conversation.
    Chat {
        /// Starting mood id (see `iym moods`).
        #[arg(long)]
        mood: Option<String>,
    },
    /// Send a single message and print the reply.
    Ask {
        /// Message text.
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
        /// Mood id for this turn.
        #[arg(long)]
        mood: Option<String>,
    },
    /// Show how the safety screens classify a message, without calling providers.
    Check {
        /// Message text.
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// List available moods.
    Moods,
    /// List emergency lines.
    Sos,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Chat { mood } => {
            let paths = runtime_paths()?;
            let _guard = logging::init_production(&paths.logs_dir)?;
            let config = Config::load(cli.config.as_deref())?;
            let mood = resolve_mood(mood.as_deref(), &config)?;
            run_chat(&config, mood).await
        }
        Command::Ask { text, mood } => {
            logging::init_cli();
            let config = Config::load(cli.config.as_deref())?;
            let mood = resolve_mood(mood.as_deref(), &config)?;
            let session = ChatSession::new(Arc::new(build_orchestrator(&config)?), Some(mood));
            let reply = session.send(&text.join(" ")).await?;
            println!("{reply}");
            Ok(())
        }
        Command::Check { text } => {
            logging::init_cli();
            let config = Config::load(cli.config.as_deref())?;
            print_check(&config.crisis_catalog(), &text.join(" "));
            Ok(())
        }
        Command::Moods => {
            for mood in builtin_moods() {
                println!("{:<8} {} {}", mood.id, mood.emoji, mood.label);
            }
            Ok(())
        }
        Command::Sos => {
            logging::init_cli();
            let config = Config::load(cli.config.as_deref())?;
            print_directory(&config.crisis_catalog());
            Ok(())
        }
    }
}

fn resolve_mood(requested: Option<&str>, config: &Config) -> anyhow::Result<MoodContext> {
    let id = requested.unwrap_or(config.conversation.default_mood.as_str());
    find_mood(id).ok_or_else(|| anyhow::anyhow!("unknown mood '{id}', see `iym moods`"))
}

fn build_orchestrator(config: &Config) -> anyhow::Result<Orchestrator> {
    let credentials = load_default_credentials().context("failed to load credentials")?;
    Orchestrator::from_config(config, &credentials)
}

fn print_check(catalog: &CrisisCatalog, text: &str) {
    let guarded = is_instruction_extraction_attempt(text);
    println!("guard: {}", if guarded { "deflected" } else { "clear" });

    let categories = catalog.detect(text);
    if categories.is_empty() {
        println!("categories: none");
    } else {
        let listed = categories
            .iter()
            .map(|c| format!("{} ({})", c.key, c.emergency_number))
            .collect::<Vec<_>>()
            .join(", ");
        println!("categories: {listed}");
    }
    println!(
        "urgent: {}",
        if catalog.is_urgent(text) { "yes" } else { "no" }
    );
}

fn print_directory(catalog: &CrisisCatalog) {
    for category in catalog.emergency_directory() {
        println!(
            "{:<5} {} - {}",
            category.emergency_number, category.name, category.short_description
        );
    }
}

async fn run_chat(config: &Config, mood: MoodContext) -> anyhow::Result<()> {
    let orchestrator = Arc::new(build_orchestrator(config)?);
    let catalog = orchestrator.catalog().clone();
    let session = ChatSession::new(orchestrator, Some(mood.clone()));
    info!(mood = %mood.id, "chat session started");

    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(
            format!(
                "IYM {} ({})  /mood <id>  /reset  /sos  /quit\n",
                mood.emoji, mood.label
            )
            .as_bytes(),
        )
        .await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let output = match input.split_once(' ').unwrap_or((input, "")) {
            ("/quit", _) => break,
            ("/reset", _) => {
                session.reset().await;
                "Listo, empezamos de cero.".to_owned()
            }
            ("/sos", _) => catalog
                .emergency_directory()
                .iter()
                .map(|c| {
                    format!(
                        "{} - {} ({})",
                        c.emergency_number, c.name, c.short_description
                    )
                })
                .collect::<Vec<_>>()
                .join("\n"),
            ("/mood", id) => match find_mood(id) {
                Some(mood) => {
                    let note = format!("Ambiente cambiado a: {} {}", mood.emoji, mood.label);
                    session.set_mood(mood).await;
                    note
                }
                None => format!(
                    "No conozco el ánimo '{}'. Probá con: {}",
                    id.trim(),
                    mood_ids()
                ),
            },
            _ => match session.send(input).await {
                Ok(reply) => reply,
                Err(SessionError::Busy) => "Todavía estoy pensando, dame un segundo.".to_owned(),
            },
        };

        stdout.write_all(format!("\n{output}\n\n").as_bytes()).await?;
    }

    info!("chat session ended");
    Ok(())
}

fn mood_ids() -> String {
    builtin_moods()
        .into_iter()
        .map(|m| m.id)
        .collect::<Vec<_>>()
        .join(", ")
}
