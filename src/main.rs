mod chat;
mod normalize;
mod settings;
mod source;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use normalize::subjects::{SubjectTable, ALL_SUBJECTS, SUBJECTS};
use normalize::DisplayRecord;
use settings::Settings;

#[derive(Parser)]
#[command(name = "notes_feed", about = "Serve study notes as blog articles")]
struct Cli {
    /// JSON export of the notes collection (overrides BLOG_NOTES_PATH)
    #[arg(long, global = true)]
    notes: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print normalized articles, newest first
    Articles {
        /// Only articles in this category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Print "All" followed by the distinct categories
    Subjects,
    /// Ask the model a question about one article
    Chat {
        /// Article id
        #[arg(short, long)]
        article: String,
        /// Question to ask
        #[arg(short, long)]
        message: String,
        /// JSON file with prior turns: [{"role": "user", "content": "..."}]
        #[arg(long)]
        history: Option<PathBuf>,
    },
    /// Show which settings are configured
    Status,
}

#[derive(Serialize)]
struct Status<'a> {
    notes_source: &'static str,
    gemini_api_key: &'static str,
    model: &'a str,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let mut settings = Settings::load()?;
    if let Some(path) = cli.notes {
        settings.notes_path = path;
    }

    match cli.command {
        Commands::Articles { category } => {
            let docs = source::load_documents(&settings.notes_path)?;
            let list = articles(&docs, &SUBJECTS, category.as_deref());
            info!(count = list.len(), "normalized articles");
            print_json(&list)?;
        }
        Commands::Subjects => {
            let docs = source::load_documents(&settings.notes_path)?;
            print_json(&SUBJECTS.distinct(source::raw_subjects(&docs)))?;
        }
        Commands::Chat {
            article,
            message,
            history,
        } => {
            let client = chat::GeminiClient::from_settings(&settings)?;
            let docs = source::load_documents(&settings.notes_path)?;
            let found = articles(&docs, &SUBJECTS, None)
                .into_iter()
                .find(|a| a.id == article)
                .with_context(|| format!("no article with id {}", article))?;
            let history = match history {
                Some(path) => load_history(&path)?,
                None => Vec::new(),
            };
            let reply = client.ask(&found.content, &history, &message).await?;
            print_json(&reply)?;
        }
        Commands::Status => {
            let configured = |ok: bool| if ok { "configured" } else { "missing" };
            print_json(&Status {
                notes_source: configured(settings.notes_path.is_file()),
                gemini_api_key: configured(settings.api_key().is_some()),
                model: &settings.gemini_model,
            })?;
        }
    }

    info!(elapsed_ms = t0.elapsed().as_millis() as u64, "done");
    Ok(())
}

/// Normalized articles, optionally limited to one category.
fn articles(docs: &[Value], subjects: &SubjectTable, category: Option<&str>) -> Vec<DisplayRecord> {
    let records = source::parse_records(docs);
    let mut out = normalize::normalize_all(&records, subjects);
    if let Some(category) = category.filter(|c| *c != ALL_SUBJECTS) {
        out.retain(|a| a.category == category);
    }
    out
}

fn load_history(path: &Path) -> Result<Vec<chat::Turn>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading history {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not a list of turns", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
