//! contentcode CLI - Content-code research essays with a chat model
//!
//! Scores essays in concurrent batches, writes the scores to CSV, and
//! prepares fine-tuning files from human-coded data.

mod adapters;
mod config;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use dialoguer::Password;
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use adapters::{CsvCorpusStore, OpenAiClient};
use config::Config;
use contentcode::{
    prepare_training_records, write_scores, write_training_file, BatchDispatcher,
    CompletionService, EssayCorpus, EssayType, GenerationOptions, RequestBuilder, RunEvent,
    ScoringRun, TemplateCache,
};

#[derive(Parser)]
#[command(name = "contentcode")]
#[command(about = "Content-code research essays with GPT chat models", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send prompts and essays to the chat completion API
    Chat {
        #[command(subcommand)]
        action: ChatAction,
    },

    /// Prepare a JSONL training file from a human-coded CSV file
    Prepare {
        /// Scored CSV file (humility or spirituality layout)
        input: PathBuf,
        /// JSONL file to write
        output: PathBuf,
        /// Append to the output instead of replacing it
        #[arg(short, long)]
        append: bool,
    },

    /// Login and store API key
    Login {
        /// API key (will prompt if not provided)
        #[arg(short, long)]
        key: Option<String>,
    },

    /// Show current configuration
    Config,
}

/// Generation parameters shared by the chat commands
#[derive(Args)]
struct GenerationArgs {
    /// Maximum tokens to generate (0 leaves it to the model)
    #[arg(short = 't', long, default_value_t = 0)]
    max_tokens: u32,
    /// Sampling temperature
    #[arg(short = 'T', long, default_value_t = 0.2)]
    temperature: f32,
    /// Model ID (defaults to the configured model)
    #[arg(short, long)]
    model: Option<String>,
}

#[derive(Subcommand)]
enum ChatAction {
    /// Send the contents of a prompt file
    Prompt {
        /// File containing the prompt
        file: PathBuf,
        /// Precede the prompt with the system instruction
        #[arg(short, long)]
        system: bool,
        /// Print the raw JSON response
        #[arg(long)]
        raw: bool,
        /// Print the request before sending it
        #[arg(short, long)]
        verbose: bool,
        #[command(flatten)]
        generation: GenerationArgs,
    },

    /// Score one random (or selected) essay and print the exchange as JSON
    Random {
        /// Essay type: dream, dejavu, conflict, angry, award
        essay_type: EssayType,
        /// Participant ID to score instead of a random one
        #[arg(long)]
        id: Option<i64>,
        /// Prompt template with {{prompt}} and {{essay}} placeholders
        #[arg(short, long)]
        prompt: Option<PathBuf>,
        /// Take the last number in the reply as the score
        #[arg(short, long)]
        reverse: bool,
        /// Print the raw JSON response
        #[arg(long)]
        raw: bool,
        /// Essay corpus (defaults to the configured path)
        #[arg(long)]
        corpus: Option<PathBuf>,
        #[command(flatten)]
        generation: GenerationArgs,
    },

    /// Score every essay of one type and write the scores to CSV
    Essay {
        /// Essay type: dream, dejavu, conflict, angry, award
        essay_type: EssayType,
        /// CSV file to write
        output: PathBuf,
        /// Essays sent concurrently per batch
        #[arg(short, long, default_value = "10")]
        batch_size: NonZeroUsize,
        /// Prompt template with {{prompt}} and {{essay}} placeholders
        #[arg(short, long)]
        prompt: Option<PathBuf>,
        /// Take the last number in the reply as the score
        #[arg(short, long)]
        reverse: bool,
        /// Essay corpus (defaults to the configured path)
        #[arg(long)]
        corpus: Option<PathBuf>,
        #[command(flatten)]
        generation: GenerationArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Chat { action } => cmd_chat(action).await,
        Commands::Prepare {
            input,
            output,
            append,
        } => cmd_prepare(&input, &output, append),
        Commands::Login { key } => cmd_login(key).await,
        Commands::Config => cmd_config(),
    }
}

// ============================================
// Command Implementations
// ============================================

/// A client for the configured service, checked against the requested model
async fn connect(
    config: &Config,
    generation: &GenerationArgs,
) -> Result<(Arc<OpenAiClient>, RequestBuilder)> {
    let client = OpenAiClient::new(
        &config.base_url,
        config.require_api_key()?,
        config.org_id.as_deref(),
        config.timeout(),
    )?;

    let model = generation
        .model
        .clone()
        .unwrap_or_else(|| config.model.clone());
    if !client
        .validate_model(&model)
        .await
        .context("Could not validate model")?
    {
        bail!("invalid model ID: {}", model);
    }

    let options = GenerationOptions {
        model,
        temperature: Some(generation.temperature),
        max_tokens: (generation.max_tokens > 0).then_some(generation.max_tokens),
        ..Default::default()
    };
    let builder = RequestBuilder::new(options, Arc::new(TemplateCache::new()));

    Ok((Arc::new(client), builder))
}

async fn cmd_chat(action: ChatAction) -> Result<()> {
    let config = Config::load()?;

    match action {
        ChatAction::Prompt {
            file,
            system,
            raw,
            verbose,
            generation,
        } => {
            let prompt = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read prompt file: {}", file.display()))?;

            let (client, builder) = connect(&config, &generation).await?;
            let request = builder.prompt_request(prompt, system);

            if verbose {
                // Request goes to stderr so stdout stays clean for piping
                eprintln!("{}", request.to_string().dimmed());
            }

            if raw {
                println!("{}", client.chat_completion_raw(&request).await?);
            } else {
                let response = client.chat_completion(&request).await?;
                print!("{}", response);
            }
        }

        ChatAction::Random {
            essay_type,
            id,
            prompt,
            reverse,
            raw,
            corpus,
            generation,
        } => {
            let corpus_path = corpus.unwrap_or_else(|| config.corpus_path.clone());
            let corpus = load_corpus(&corpus_path)?;
            let essay = match id {
                Some(id) => corpus.by_id(id)?,
                None => corpus.random()?,
            };

            let (client, builder) = connect(&config, &generation).await?;

            if raw {
                let request = builder.build(essay, essay_type, prompt.as_deref())?;
                println!("{}", client.chat_completion_raw(&request).await?);
                return Ok(());
            }

            let run = ScoringRun::new(builder, BatchDispatcher::new(client)).with_reverse(reverse);
            let completion = run.score_one(essay, essay_type, prompt.as_deref()).await?;

            println!(
                "{}",
                serde_json::to_string_pretty(&completion).context("Failed to serialize completion")?
            );
        }

        ChatAction::Essay {
            essay_type,
            output,
            batch_size,
            prompt,
            reverse,
            corpus,
            generation,
        } => {
            let corpus_path = corpus.unwrap_or_else(|| config.corpus_path.clone());
            let corpus = load_corpus(&corpus_path)?;
            if corpus.is_empty() {
                bail!("No essays found in {}", corpus_path.display());
            }

            let (client, builder) = connect(&config, &generation).await?;
            let run = ScoringRun::new(builder, BatchDispatcher::new(client))
                .with_batch_size(batch_size)
                .with_reverse(reverse);

            let summary = run
                .run(corpus.records(), essay_type, prompt.as_deref(), print_event)
                .await?;

            write_scores(&CsvCorpusStore::new(), &output, &summary.scores)
                .with_context(|| format!("Failed to write scores to {}", output.display()))?;

            println!("{}", summary.to_string().green());
            if !summary.failures.is_empty() {
                println!(
                    "{} {} essays not scored",
                    "!".yellow(),
                    summary.failures.len()
                );
            }
            println!(
                "{} {} scores written to {}",
                "✓".green(),
                summary.scores.len(),
                output.display()
            );
        }
    }

    Ok(())
}

fn load_corpus(path: &Path) -> Result<EssayCorpus> {
    let corpus = EssayCorpus::load(&CsvCorpusStore::new(), path)
        .with_context(|| format!("Failed to load essays from {}", path.display()))?;

    if !corpus.diagnostics().is_empty() {
        eprintln!(
            "{} skipped {} invalid rows in {}",
            "!".yellow(),
            corpus.diagnostics().len(),
            path.display()
        );
    }
    Ok(corpus)
}

fn print_event(event: &RunEvent) {
    match event {
        RunEvent::Scored { .. } => println!("{}", event),
        RunEvent::Failed { .. } => println!("{}", event.to_string().red()),
        RunEvent::Missing { .. } => println!("{}", event.to_string().yellow()),
        RunEvent::BatchCompleted(_) => println!("{}", event.to_string().cyan()),
    }
}

fn cmd_prepare(input: &Path, output: &Path, append: bool) -> Result<()> {
    let set = prepare_training_records(&CsvCorpusStore::new(), input)
        .with_context(|| format!("Failed to prepare training records from {}", input.display()))?;

    write_training_file(output, append, &set.records)?;

    println!(
        "{} {} training records written to {}",
        "✓".green(),
        set.records.len(),
        output.display()
    );
    if !set.diagnostics.is_empty() {
        println!(
            "  {}",
            format!("{} invalid rows skipped", set.diagnostics.len()).dimmed()
        );
    }

    Ok(())
}

async fn cmd_login(key: Option<String>) -> Result<()> {
    let mut config = Config::load()?;

    let api_key = match key {
        Some(k) => k,
        None => Password::new()
            .with_prompt("OpenAI API Key")
            .interact()
            .context("Failed to read API key")?,
    };

    let client = OpenAiClient::new(
        &config.base_url,
        &api_key,
        config.org_id.as_deref(),
        config.timeout(),
    )?;
    print!("Testing connection... ");

    match client.check_connection().await {
        Ok(()) => println!("{}", "OK".green()),
        Err(e) => {
            println!("{}", "Failed".red());
            bail!("Could not connect to {}: {}", config.base_url, e);
        }
    }

    config.set_api_key(api_key);
    config.save()?;

    println!("{} API key saved to {:?}", "✓".green(), Config::config_path()?);

    Ok(())
}

fn cmd_config() -> Result<()> {
    let config = Config::load()?;

    println!("{}", "Configuration:".bold());
    println!("  Path: {:?}", Config::config_path()?);
    println!("  Base URL: {}", config.base_url);
    let api_key_status = if config.api_key.is_some() {
        "Set".green()
    } else {
        "Not set".red()
    };
    println!("  API Key: {}", api_key_status);
    println!(
        "  Organization: {}",
        config.org_id.as_deref().unwrap_or("None").cyan()
    );
    println!("  Model: {}", config.model.cyan());
    println!("  Timeout: {}s", config.timeout_secs);
    println!("  Corpus: {}", config.corpus_path.display());

    Ok(())
}
