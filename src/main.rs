use anyhow::Context;
use clap::Parser;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use company_enricher::app::ports::EventSinkPort;
use company_enricher::common::constants::API_KEY_ENV;
use company_enricher::config::Config;
use company_enricher::domain::identifiers::parse_raw_list;
use company_enricher::infra::event_sink::TracingEventSink;
use company_enricher::infra::http_client::ReqwestHttp;
use company_enricher::infra::sleeper::TokioSleeper;
use company_enricher::observability::{logging, metrics};
use company_enricher::{EnrichUseCase, RawIdentifier, ResilientFetcher, RetryPolicy};

#[derive(Parser)]
#[command(name = "company_enricher")]
#[command(about = "Enrich company numbers with Companies House company profiles")]
#[command(version)]
struct Cli {
    /// Companies House API key
    #[arg(short = 'a', long, env = API_KEY_ENV, hide_env_values = true)]
    api_key: String,

    /// TOML config file (defaults to ./config.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the registry base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Override the attempt budget per company
    #[arg(long)]
    max_retries: Option<u32>,

    /// Company numbers to enrich (comma-separated)
    #[arg(long, value_delimiter = ',', conflicts_with = "input")]
    ids: Vec<String>,

    /// JSON file holding an array of raw identifiers; stdin is read when neither --ids nor --input is given
    #[arg(long)]
    input: Option<PathBuf>,

    /// Print the run summary to stderr
    #[arg(long)]
    summary: bool,

    /// Print Prometheus metrics to stderr after the run
    #[arg(long)]
    metrics: bool,
}

fn read_raw_ids(cli: &Cli) -> anyhow::Result<Vec<RawIdentifier>> {
    if !cli.ids.is_empty() {
        return Ok(cli.ids.iter().map(|s| RawIdentifier::from(s.as_str())).collect());
    }

    let json = match &cli.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file '{}'", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read identifiers from stdin")?;
            buf
        }
    };
    parse_raw_list(&json).context("Input must be a JSON array of identifiers")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before clap reads them
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging
    let _log_guard = logging::init_logging();

    if cli.metrics {
        metrics::init()?;
    }

    let mut config = Config::resolve(cli.config.as_deref())?;
    if let Some(url) = &cli.base_url {
        config.api.base_url = url.clone();
    }
    if let Some(max_retries) = cli.max_retries {
        config.retry.max_attempts = max_retries;
    }
    config.validate()?;

    let raw_ids = read_raw_ids(&cli)?;
    info!("Loaded {} raw identifiers", raw_ids.len());

    let events: Arc<dyn EventSinkPort> = Arc::new(TracingEventSink);
    let http = Arc::new(ReqwestHttp::new(cli.api_key.clone(), config.api.timeout())?);
    let fetcher = ResilientFetcher::new(
        http,
        Arc::new(TokioSleeper),
        events.clone(),
        config.api.base_url.clone(),
        RetryPolicy::from(&config.retry),
    );
    let use_case = EnrichUseCase::new(fetcher, events);

    let enrichment = use_case.enrich_with_report(&raw_ids).await;

    println!("{}", serde_json::to_string_pretty(&enrichment.records)?);

    if cli.summary {
        eprintln!("{}", serde_json::to_string_pretty(&enrichment.report)?);
    }
    if cli.metrics {
        if let Some(text) = metrics::render() {
            eprintln!("{}", text);
        }
    }

    Ok(())
}
