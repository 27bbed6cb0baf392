use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

use postcall::io::write_json;
use postcall::{
    Extractor, ExtractorConfig, RawCallInput, SummaryReport, WebhookError, complete_call,
    parse_webhook_file, read_call_input,
};

#[derive(Parser)]
#[command(name = "postcall")]
#[command(author, version, long_about = None)]
#[command(about = "Structured data extraction for completed driver calls")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a structured summary from a transcript and optional analysis
    Extract {
        /// Transcript file (plain text)
        #[arg(short, long, conflicts_with = "text")]
        transcript: Option<PathBuf>,

        /// Transcript given inline
        #[arg(long)]
        text: Option<String>,

        /// Provider analysis file (JSON object)
        #[arg(short, long)]
        analysis: Option<PathBuf>,

        /// Output file for the structured record (JSON); stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print a human-readable summary instead of JSON
        #[arg(long)]
        summary: bool,

        /// Extra emergency trigger term (repeatable)
        #[arg(long = "trigger")]
        triggers: Vec<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Process a call_ended webhook payload into a completion update
    Webhook {
        /// Webhook payload file (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the completion update (JSON); stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output file for a human-readable summary (text)
        #[arg(long)]
        summary: Option<PathBuf>,

        /// Extra emergency trigger term (repeatable)
        #[arg(long = "trigger")]
        triggers: Vec<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            transcript,
            text,
            analysis,
            output,
            summary,
            triggers,
            verbose,
        } => {
            setup_logging(verbose);
            let mut input = read_call_input(transcript.as_deref(), analysis.as_deref())?;
            if let Some(text) = text {
                input.transcript = text;
            }
            run_extract(input, output, summary, triggers)
        }
        Commands::Webhook {
            input,
            output,
            summary,
            triggers,
            verbose,
        } => {
            setup_logging(verbose);
            run_webhook(input, output, summary, triggers)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn build_extractor(triggers: Vec<String>) -> Extractor {
    let config = ExtractorConfig::from_env().with_extra_triggers(triggers);
    info!("Using {} emergency triggers", config.emergency_triggers.len());
    Extractor::new(config)
}

fn run_extract(
    input: RawCallInput,
    output: Option<PathBuf>,
    summary: bool,
    triggers: Vec<String>,
) -> Result<()> {
    let extractor = build_extractor(triggers);
    info!(
        "Extracting from {} transcript chars (analysis: {})",
        input.transcript.len(),
        input.usable_analysis().is_some()
    );

    let record = extractor.extract_call(&input);
    info!(
        "Extracted {} call: {}",
        record.call_type().as_str(),
        record.call_outcome()
    );

    if summary {
        print!("{}", SummaryReport::new(&record).format());
        return Ok(());
    }

    match output {
        Some(path) => {
            write_json(&path, &record)?;
            info!("Record written to {:?}", path);
        }
        None => println!(
            "{}",
            serde_json::to_string_pretty(&record).context("Failed to serialize record")?
        ),
    }

    Ok(())
}

fn run_webhook(
    input: PathBuf,
    output: Option<PathBuf>,
    summary: Option<PathBuf>,
    triggers: Vec<String>,
) -> Result<()> {
    info!("Loading webhook payload from {:?}", input);
    let event = parse_webhook_file(&input).context("Failed to parse webhook payload")?;
    let extractor = build_extractor(triggers);

    let update = match complete_call(&event, &extractor, Utc::now()) {
        Ok(update) => update,
        Err(WebhookError::IgnoredEvent(event_type)) => {
            warn!("Ignoring event type: {:?}", event_type);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    match output {
        Some(path) => {
            update.write_json(&path)?;
            info!("Completion update written to {:?}", path);
        }
        None => println!(
            "{}",
            serde_json::to_string_pretty(&update).context("Failed to serialize update")?
        ),
    }

    if let Some(path) = summary {
        SummaryReport::new(&update.metadata.structured_data).write_file(&path)?;
        info!("Summary written to {:?}", path);
    }

    Ok(())
}
