use analysis_service::AnalysisService;
use clap::Parser;
use feddit_client::FedditClient;
use sentiment_core::{AnalysisRequest, AppConfig, ErrorExt, ServiceError};
use sentiment_engine::{LexiconModel, SentimentAnalyzer};
use std::sync::Arc;
use std::time::Duration;

/// Analyze the sentiment of recent comments in a Feddit subfeddit.
#[derive(Debug, Parser)]
#[command(name = "feddit-sentiment", version)]
struct Cli {
    /// Subfeddit title (case-insensitive exact match)
    subfeddit: String,

    /// Maximum number of comments to analyze
    #[arg(long)]
    limit: Option<i64>,

    /// Only include comments created at or after this date
    #[arg(long)]
    start_date: Option<String>,

    /// Only include comments created at or before this date
    #[arg(long)]
    end_date: Option<String>,

    /// Sort by polarity score: "asc" (most negative first) or "desc"
    #[arg(long)]
    sort_order: Option<String>,

    /// Print the liveness probe and exit
    #[arg(long)]
    health: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            "feddit_sentiment=info,analysis_service=info,feddit_client=info,sentiment_engine=info",
        )
        .init();

    let cli = Cli::parse();

    let config = AppConfig::from_env()?;
    tracing::info!(
        "Starting Feddit sentiment analysis against {}",
        config.feddit_base_url
    );

    let client = Arc::new(FedditClient::new(&config)?);
    let analyzer = Arc::new(SentimentAnalyzer::new(
        Arc::new(LexiconModel::new()),
        Duration::from_secs(config.score_cache_ttl_secs),
    ));
    let service = AnalysisService::new(client, analyzer, &config);

    if cli.health {
        println!("{}", serde_json::to_string_pretty(&service.health())?);
        return Ok(());
    }

    // The service API takes an unsigned limit; negative CLI input fails
    // validation here with the same message the service uses for zero.
    let limit = match cli.limit {
        Some(l) if l < 0 => {
            report_failure(&ServiceError::validation("limit must be greater than 0"))
        }
        Some(l) => Some(l as u32),
        None => None,
    };

    let request = AnalysisRequest {
        subfeddit: cli.subfeddit,
        limit,
        start_date: cli.start_date,
        end_date: cli.end_date,
        sort_order: cli.sort_order,
    };

    match service.analyze(request).await {
        Ok(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Err(e) => report_failure(&e),
    }
}

fn report_failure(error: &ServiceError) -> ! {
    error.log_error();
    eprintln!("{}: {}", error.error_code(), error.user_friendly_message());
    std::process::exit(1)
}
