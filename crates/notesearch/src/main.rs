use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use notesearch::commands;
use notesearch::config::{Config, Overrides};
use notesearch::credential::API_KEY_ENV_VAR;
use notesearch::search::SearchOptions;

#[derive(Parser)]
#[command(name = "notesearch")]
#[command(
  about = "Notesearch - Semantic Note Search\nRank a CSV of embedded notes against a natural-language query"
)]
#[command(version)]
struct Cli {
  /// API key for the embedding provider (prompted for when omitted)
  #[arg(long, global = true, env = API_KEY_ENV_VAR, hide_env_values = true)]
  api_key: Option<String>,
  /// Embedding model; must match the model the dataset was embedded with
  #[arg(long, global = true)]
  model: Option<String>,
  /// Base URL of an OpenAI-compatible embeddings API
  #[arg(long, global = true)]
  base_url: Option<String>,
  /// Name of the column holding note text
  #[arg(long, global = true)]
  text_column: Option<String>,
  /// Name of the column holding embeddings
  #[arg(long, global = true)]
  embedding_column: Option<String>,
  /// Configuration file (YAML)
  #[arg(short, long, global = true)]
  config: Option<PathBuf>,
  /// Enable verbose logging
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Find the notes most similar to a query
  Search {
    /// CSV file with note text and embeddings
    file: PathBuf,
    #[command(flatten)]
    options: SearchOptions,
    /// Search query (space-separated)
    #[arg(required = true)]
    terms: Vec<String>,
  },
  /// Load the notes once and run queries until an empty line
  Interactive {
    /// CSV file with note text and embeddings
    file: PathBuf,
    #[command(flatten)]
    options: SearchOptions,
  },
  /// Preview the notes in an embeddings file
  Show {
    /// CSV file with note text and embeddings
    file: PathBuf,
    /// Maximum number of rows to show
    #[arg(short, long, default_value_t = commands::DEFAULT_PREVIEW_ROWS)]
    limit: usize,
  },
}

fn init_logging(verbose: bool) {
  let filter = if verbose {
    EnvFilter::new("notesearch=debug,warn")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("notesearch=warn"))
  };

  tracing_subscriber::registry()
    .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
    .with(filter)
    .init();
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_logging(cli.verbose);

  let config = Config::load(cli.config.as_deref())?.with_overrides(Overrides {
    model: cli.model,
    base_url: cli.base_url,
    text_column: cli.text_column,
    embedding_column: cli.embedding_column,
  });

  match cli.command {
    Commands::Search { file, options, terms } => {
      commands::search_notes(&file, &terms, &options, &config, cli.api_key)?;
    }
    Commands::Interactive { file, options } => {
      commands::interactive(&file, &options, &config, cli.api_key)?;
    }
    Commands::Show { file, limit } => {
      commands::show(&file, limit, &config)?;
    }
  }

  Ok(())
}
