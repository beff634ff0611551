//! # article_draft
//!
//! Drafts posts from article URLs: fetches each page, summarizes it through
//! an OpenAI-compatible chat completion service (or locally, without a
//! credential) and prints the drafts as JSON or Markdown.
//!
//! ## Usage
//!
//! ```sh
//! article_draft https://example.com/news/1
//! article_draft -j ./drafts --format markdown https://a.example/1 https://b.example/2
//! ```
//!
//! ## Architecture
//!
//! 1. **Configuration**: YAML file (optional), then flags and environment
//! 2. **Drafting**: one [`Drafter`] shared by all URLs, 4 drafts in flight
//! 3. **Overrides**: user-supplied title/summary/content win over the draft
//! 4. **Output**: stdout plus optional JSON files

use article_draft::outputs::{json, markdown};
use article_draft::utils::ensure_writable_dir;
use article_draft::{DraftConfig, Drafter};
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;

use cli::{Cli, OutputFormat};

const PARALLEL_DRAFTS: usize = 4;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("article_draft starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(urls = args.urls.len(), ?args.json_output_dir, ?args.format, "Parsed CLI arguments");

    // ---- Load config ----
    let mut config = match &args.config {
        Some(path) => DraftConfig::from_yaml_file(path)?,
        None => DraftConfig::default(),
    };
    args.apply_to(&mut config);
    if config.credential().is_none() {
        warn!("No API key configured; drafts will be built offline");
    }
    debug!(?config, "Effective configuration");

    // Early check: ensure JSON output dir is writable
    if let Some(dir) = &args.json_output_dir {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(
                path = %dir,
                error = %e,
                "JSON output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e.into());
        }
    }

    let summary_char_limit = config.summary_char_limit;
    let drafter = Drafter::new(config)?;

    // ---- Ctrl-C abandons in-flight service calls ----
    let interrupt = drafter.interrupt_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received; remaining drafts will be built offline");
            interrupt.trigger();
        }
    });

    // ---- Draft URLs concurrently ----
    use futures::stream::{self, StreamExt};

    info!(count = args.urls.len(), parallel = PARALLEL_DRAFTS, "Starting drafts");
    let drafter = &drafter;
    let outcomes: Vec<_> = stream::iter(args.urls.iter())
        .map(|url| async move { (url, drafter.build_draft_traced(url).await) })
        .buffered(PARALLEL_DRAFTS)
        .collect()
        .await;

    // ---- Output ----
    let overrides = args.overrides();
    let mut external = 0usize;
    for (url, outcome) in outcomes {
        if outcome.path == article_draft::DraftPath::External {
            external += 1;
        }
        let post = outcome.draft.into_post(&overrides, summary_char_limit);

        match args.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&post)?),
            OutputFormat::Markdown => println!("{}", markdown::draft_to_markdown(&post, url)),
        }

        if let Some(dir) = &args.json_output_dir {
            if let Err(e) = json::write_draft(&post, url, dir).await {
                error!(%url, error = %e, "Failed to write draft JSON");
            }
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        drafts = args.urls.len(),
        external,
        offline = args.urls.len() - external,
        "Execution complete"
    );

    Ok(())
}
