use anyhow::Context;
use clap::{Parser, Subcommand};
use logexport_core::config::Config;
use logexport_core::schema::{added_columns, merge_schemas, parse_schema_document, strip_modes};
use logexport_core::{LogsExtractor, SchemaField};
use logexport_pipeline::{Pipeline, RecordSource, RowTarget};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "logexport", about = "Normalize platform logs into flat analytics rows")]
struct Cli {
    /// Log at debug level (logs go to stderr; RUST_LOG overrides).
    #[arg(long, global = true)]
    debug: bool,

    /// Config file (default: $XDG_CONFIG_HOME/logexport/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the output table schema as JSON.
    Schema {
        /// Single-line output.
        #[arg(long)]
        compact: bool,
    },
    /// Merge the output schema into an existing table schema and print it.
    MergeSchema {
        /// Existing schema: a field list, or a table resource with `schema.fields`.
        #[arg(long)]
        existing: PathBuf,
    },
    /// Convert NDJSON log records into NDJSON rows.
    Run {
        /// Input file, or `-` for stdin.
        #[arg(long)]
        input: Option<PathBuf>,
        /// Output file, or `-` for stdout.
        #[arg(long)]
        output: Option<PathBuf>,
        /// File that receives the raw text of records that fail.
        #[arg(long)]
        dead_letter: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let config = Config::load(cli.config.as_deref()).context("failed to load config")?;
    let extractor = LogsExtractor::with_options(config.output.extractor_options());

    match cli.command {
        Command::Schema { compact } => {
            let schema = extractor.schema();
            println!("{}", render(&schema, config.output.pretty_schema && !compact)?);
        }
        Command::MergeSchema { existing } => {
            let text = std::fs::read_to_string(&existing)
                .with_context(|| format!("failed to read {}", existing.display()))?;
            let current = parse_schema_document(&text)?;
            let mut merged = merge_schemas(&current, &extractor.schema());
            strip_modes(&mut merged);

            let added = added_columns(&current, &merged);
            if added.is_empty() {
                tracing::info!("no new top-level columns");
            } else {
                tracing::info!(columns = ?added, "adding columns");
            }
            println!("{}", render(&merged, config.output.pretty_schema)?);
        }
        Command::Run {
            input,
            output,
            dead_letter,
        } => {
            let pipeline = Pipeline::new(Arc::new(extractor), config.pipeline);
            let stats = pipeline
                .run(
                    RecordSource::from_arg(input.as_deref()),
                    &RowTarget::from_arg(output.as_deref()),
                    dead_letter,
                )
                .await?;
            tracing::info!(
                read = stats.read,
                emitted = stats.emitted,
                failed = stats.failed,
                anomalies = stats.anomalies,
                "done"
            );
        }
    }
    Ok(())
}

fn render(schema: &[SchemaField], pretty: bool) -> anyhow::Result<String> {
    Ok(if pretty {
        serde_json::to_string_pretty(schema)?
    } else {
        serde_json::to_string(schema)?
    })
}
