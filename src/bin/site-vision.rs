//! CLI binary for site-vision.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ClassifierConfig`, drives a `TestSession`, and prints the result.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use site_vision::{
    ClassifierConfig, Feedback, FeedbackCallback, ImageFile, ModelChoice, ResultStatus,
    RunProgressCallback, Selection, TestResult, TestSession,
};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Spinner shown while the single request is outstanding.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Processing");
        Arc::new(Self { bar })
    }
}

impl RunProgressCallback for CliProgressCallback {
    fn on_run_start(&self, model: ModelChoice, image_name: &str) {
        self.bar.set_message(format!("{image_name} → {}", model.title()));
        self.bar.enable_steady_tick(Duration::from_millis(80));
    }

    fn on_run_complete(&self, _result: &TestResult) {
        self.bar.finish_and_clear();
    }

    fn on_run_skipped(&self, _model: ModelChoice) {
        self.bar.finish_and_clear();
    }
}

// ── Feedback sink ────────────────────────────────────────────────────────────

/// Feedback is not persisted; it is logged and acknowledged.
struct LogFeedback {
    quiet: bool,
}

impl FeedbackCallback for LogFeedback {
    fn on_submit(&self, feedback: Feedback) {
        info!(
            rating = feedback.rating,
            comment = %feedback.comment,
            "Feedback submitted"
        );
    }

    fn on_close(&self) {
        if !self.quiet {
            eprintln!("{}", dim("Thanks for your feedback."));
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Check a wall photo for cracks
  site-vision classify wall.jpg --model structural-analysis --config endpoints.json

  # Helmet compliance, JSON output
  site-vision classify crew.png --model safety-compliance --json

  # Export the result as test_result.pdf in the current directory
  site-vision classify wall.jpg --model structural-analysis --export

  # Rate the result
  site-vision classify wall.jpg --model structural-analysis --rating 4 --comment "Great"

  # Show which models have an endpoint
  site-vision models --config endpoints.json

ENDPOINT FILE (JSON):
  {
    "timeout_secs": 30,
    "endpoints": {
      "structural-analysis": {
        "url": "https://classify.example.com/crack-damage-recognition/2",
        "api_key": "YOUR_KEY",
        "payload": "form",              // or "json"
        "confidence_scale": "fraction"  // or "percent"
      }
    }
  }

ENVIRONMENT VARIABLES:
  SITE_VISION_CONFIG      Path to the endpoint file
  SITE_VISION_API_KEY     API key applied to every endpoint
  SITE_VISION_TIMEOUT     Per-request timeout in seconds
  RUST_LOG                Log filter (overrides -v / -q)
  PDFIUM_LIB_PATH         Path to an existing libpdfium for --export
  PDFIUM_AUTO_CACHE_DIR   Override the pdfium download cache
"#;

/// Send site-inspection photos to hosted image classifiers.
#[derive(Parser, Debug)]
#[command(
    name = "site-vision",
    version,
    about = "Send site-inspection photos to hosted image classifiers",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// JSON file mapping model tags to endpoints.
    #[arg(long, global = true, env = "SITE_VISION_CONFIG")]
    config: Option<PathBuf>,

    /// API key for every endpoint (overrides the file).
    #[arg(long, global = true, env = "SITE_VISION_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Per-request timeout in seconds (overrides the file).
    #[arg(long, global = true, env = "SITE_VISION_TIMEOUT",
          value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "SITE_VISION_VERBOSE")]
    verbose: bool,

    /// Suppress all output except the result and errors.
    #[arg(short, long, global = true, env = "SITE_VISION_QUIET")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify one image.
    Classify {
        /// Image file to test.
        image: PathBuf,

        /// Capability: structural-analysis, safety-compliance, solar-panel-analysis.
        #[arg(short, long)]
        model: ModelChoice,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,

        /// Disable the processing spinner.
        #[arg(long)]
        no_progress: bool,

        /// Export the result as PDF (default: ./test_result.pdf; a directory gets test_result.pdf).
        #[arg(long, value_name = "PATH", num_args = 0..=1)]
        export: Option<Option<PathBuf>>,

        /// Star rating for the result (1–5).
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: Option<u8>,

        /// Feedback comment (sent with --rating).
        #[arg(long, requires = "rating")]
        comment: Option<String>,
    },

    /// List model tags and whether each has an endpoint.
    Models,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Models => {
            let config = load_config(&cli.config, &cli.api_key, cli.timeout, None)?;
            for model in ModelChoice::ALL {
                let mapped = if config.is_supported(model) {
                    green("configured")
                } else {
                    dim("no endpoint")
                };
                println!("{:<22} {:<22} {}", model.tag(), model.title(), mapped);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Classify {
            ref image,
            model,
            json,
            no_progress,
            ref export,
            rating,
            ref comment,
        } => {
            let show_progress = !cli.quiet && !no_progress && !json && !cli.verbose;
            let progress = show_progress
                .then(|| CliProgressCallback::new() as Arc<dyn RunProgressCallback>);
            let config = load_config(&cli.config, &cli.api_key, cli.timeout, progress)?;

            let mut session = TestSession::new(config);
            if let Selection::Ignored(reason) = session
                .select_file(ImageFile::from_path(image))
                .context("Failed to load image")?
            {
                bail!("{reason}");
            }

            let Some(result) = session.run_test(model).await.cloned() else {
                bail!(
                    "No endpoint configured for '{model}'. Add it to the endpoint file \
                     (see `site-vision classify --help`)."
                );
            };

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&result).context("Failed to serialize result")?
                );
            } else {
                print_result(&result);
            }

            if let Some(target) = export {
                let path = session
                    .export_result(target.as_deref())
                    .await
                    .context("PDF export failed")?;
                if let (Some(path), false) = (path, cli.quiet) {
                    eprintln!("{} Exported {}", green("✔"), bold(&path.display().to_string()));
                }
            }

            if let Some(rating) = rating {
                let sink = Arc::new(LogFeedback { quiet: cli.quiet });
                if let Some(mut form) = session.feedback_form(sink) {
                    form.set_rating(rating);
                    if let Some(c) = comment {
                        form.set_comment(c.as_str());
                    }
                    form.submit();
                }
            }

            Ok(if result.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

/// Build the config from the endpoint file plus CLI overrides.
fn load_config(
    path: &Option<PathBuf>,
    api_key: &Option<String>,
    timeout: Option<u64>,
    progress: Option<Arc<dyn RunProgressCallback>>,
) -> Result<ClassifierConfig> {
    let mut config = match path {
        Some(p) => ClassifierConfig::from_json_file(p)
            .with_context(|| format!("Failed to load endpoint file '{}'", p.display()))?,
        None => ClassifierConfig::default(),
    };
    if let Some(key) = api_key {
        config.api_key_override = Some(key.clone());
    }
    if let Some(secs) = timeout {
        config.timeout_secs = secs;
    }
    config.progress_callback = progress;
    Ok(config)
}

fn print_result(result: &TestResult) {
    let (mark, label) = match result.status {
        ResultStatus::Success => (green(result.status.indicator()), bold(&result.label)),
        ResultStatus::Error => (red(result.status.indicator()), red(&result.label)),
    };
    println!("{mark} {label}");
    println!("  {}", dim(&format!("Confidence: {}", result.confidence_display())));
}
