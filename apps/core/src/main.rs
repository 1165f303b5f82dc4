// Dialogix NLP Backend Entry Point
// Loads configuration and models once, then serves the analysis API.

use anyhow::Result;
use tracing::info;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use dialogix_nlp::brain::{NlpModels, TextAnalyzer};
use dialogix_nlp::config::{Config, LogFormat};
use dialogix_nlp::server::{create_router, AppState};

const DEFAULT_LOG_FILTER: &str = "dialogix_nlp=info,tower_http=info";

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match format {
        LogFormat::Json => Registry::default()
            .with(filter)
            .with(JsonStorageLayer)
            .with(BunyanFormattingLayer::new(
                env!("CARGO_PKG_NAME").to_string(),
                std::io::stdout,
            ))
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(config.log_format);

    info!("Loading NLP models...");
    let models = NlpModels::load(&config)?;
    let analyzer = TextAnalyzer::with_models(&models);

    let address = config.bind_address();
    let app = create_router(AppState::new(analyzer, config));

    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Dialogix NLP listening on http://{}", address);
    axum::serve(listener, app).await?;

    Ok(())
}
