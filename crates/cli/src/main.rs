//! content-kit CLI: scaffold, inspect, and run content pipelines.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

use ck_core::config::loader::load_config;
use ck_core::content::read_record;
use ck_core::engine::Sequencer;
use ck_core::init::{generate_structure, InitOptions};
use ck_core::scoring::{extract_candidates, KeywordScorer};
use ck_core::state::CancelToken;
use ck_core::tasks::registry::TaskRegistry;
use ck_protocol::events::Event;
use ck_protocol::run_models::{Run, RunStatus, StepOutcome};

#[derive(Parser)]
#[command(name = "content-kit", version, about = "Content processing pipeline engine")]
struct Cli {
    /// Project root containing the .content-kit/ directory
    #[arg(long, global = true, default_value = ".")]
    path: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scaffold a starter .content-kit directory
    Init {
        /// Overwrite an existing .content-kit directory
        #[arg(long)]
        force: bool,

        /// Generate only the minimal configuration
        #[arg(long)]
        minimal: bool,
    },

    /// List pipelines, sub-pipelines, and registered tasks
    List,

    /// Run a pipeline against a content file (.json or .md)
    Run {
        /// Pipeline name from .content-kit/pipelines/
        #[arg(long)]
        pipeline: String,

        /// Content record file
        #[arg(long)]
        content: PathBuf,

        /// Print the full run report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Score keywords for a content file
    Score {
        /// Content record file
        file: PathBuf,

        /// Maximum number of keywords to report
        #[arg(long)]
        max: Option<usize>,

        /// Candidate keywords (comma separated); extracted from the text
        /// when omitted
        #[arg(long, value_delimiter = ',')]
        keywords: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Init { force, minimal } => cmd_init(cli.path, force, minimal).await,
        Command::List => cmd_list(cli.path).await,
        Command::Run {
            pipeline,
            content,
            json,
        } => cmd_run(cli.path, pipeline, content, json).await,
        Command::Score {
            file,
            max,
            keywords,
        } => cmd_score(cli.path, file, max, keywords).await,
    }
}

async fn cmd_init(path: PathBuf, force: bool, minimal: bool) -> color_eyre::Result<()> {
    generate_structure(InitOptions {
        target_dir: path.clone(),
        force,
        minimal,
    })
    .await?;

    println!(
        "{} .content-kit directory in {}",
        "Created".green().bold(),
        path.display()
    );
    Ok(())
}

async fn cmd_list(path: PathBuf) -> color_eyre::Result<()> {
    let registry = TaskRegistry::builtin();
    let config = load_config(&path, &registry).await?;
    let definition = &config.definition;

    println!("{}", "Pipelines".bold());
    if definition.pipelines.is_empty() {
        println!("  (none - run `content-kit init` to scaffold)");
    }
    for name in definition.pipeline_names() {
        let steps = definition.pipeline(name).unwrap_or(&[]);
        println!("  {} -> {}", name.cyan(), steps.join(" -> "));
    }

    if !definition.sub_pipelines.is_empty() {
        println!("\n{}", "Sub-pipelines".bold());
        let mut names: Vec<&String> = definition.sub_pipelines.keys().collect();
        names.sort();
        for name in names {
            println!("  {} -> {}", name.cyan(), definition.sub_pipelines[name].join(" -> "));
        }
    }

    println!("\n{}", "Registered tasks".bold());
    for task in registry.task_names() {
        println!("  {}", task);
    }

    Ok(())
}

async fn cmd_run(
    path: PathBuf,
    pipeline: String,
    content: PathBuf,
    json: bool,
) -> color_eyre::Result<()> {
    let registry = TaskRegistry::builtin();
    let config = load_config(&path, &registry).await?;
    let registry = TaskRegistry::builtin_with(config.global.scoring.clone());
    let sequencer = Sequencer::new(Arc::new(config.definition), registry, config.global.engine);

    let record = read_record(&content)?;

    let (events_tx, mut events_rx) = mpsc::channel(256);
    let printer = (!json).then(|| {
        tokio::spawn(async move {
            while let Some(event) = events_rx.recv().await {
                match event {
                    Event::StepStarted { step, .. } => {
                        println!("{} {}", "->".blue(), step);
                    }
                    Event::StepCompleted { step, .. } => {
                        println!("{} {}", "ok".green(), step);
                    }
                    Event::StepFailed { step, error, .. } => {
                        println!("{} {}: {}", "failed".red(), step, error);
                    }
                    Event::StepSkipped {
                        step, missing_key, ..
                    } => {
                        println!(
                            "{} {} (missing input '{}')",
                            "skipped".yellow(),
                            step,
                            missing_key
                        );
                    }
                    _ => {}
                }
            }
        })
    });

    let run = sequencer
        .run(&pipeline, record, events_tx, CancelToken::new())
        .await?;

    if let Some(printer) = printer {
        let _ = printer.await;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&run)?);
    } else {
        print_summary(&run);
    }

    if !run.succeeded() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_summary(run: &Run) {
    let status = match run.status {
        RunStatus::Completed => "COMPLETED".green().bold(),
        RunStatus::Failed => "FAILED".red().bold(),
        RunStatus::Cancelled => "CANCELLED".yellow().bold(),
        RunStatus::Pending | RunStatus::Running => "IN PROGRESS".normal(),
    };

    println!(
        "\n{} {} ({} steps, content {})",
        status, run.pipeline_name, run.steps.len(), run.content_id
    );

    if let Some(halted) = &run.halted_at {
        println!("halted at: {}", halted.red());
        for report in &run.steps {
            if let StepOutcome::Failed { error, code } = &report.outcome {
                println!("  {} [{:?}] {}", report.step, code, error);
            }
        }
    }

    let mut keys: Vec<&String> = run.context.values.keys().collect();
    keys.sort();
    let keys: Vec<&str> = keys.iter().map(|k| k.as_str()).collect();
    println!("context keys: {}", keys.join(", "));
}

async fn cmd_score(
    path: PathBuf,
    file: PathBuf,
    max: Option<usize>,
    keywords: Vec<String>,
) -> color_eyre::Result<()> {
    let registry = TaskRegistry::builtin();
    let config = load_config(&path, &registry).await?;

    let record = read_record(&file)?;
    let text = record.full_text();

    let candidates = if keywords.is_empty() {
        extract_candidates(&text)
    } else {
        keywords
    };

    let scorer = KeywordScorer::new(config.global.scoring.clone());
    let max_results = max.unwrap_or(config.global.scoring.max_results);
    let scored = scorer.score(&text, &candidates, max_results);

    if scored.is_empty() {
        println!("No keywords scored for {}", file.display());
        return Ok(());
    }

    println!("{} ({})", "Scored keywords".bold(), record.id);
    for keyword in scored {
        println!(
            "  {:>2}. {}  score={:.3} freq={}",
            keyword.rank,
            keyword.keyword.cyan(),
            keyword.score,
            keyword.frequency
        );
    }

    Ok(())
}
