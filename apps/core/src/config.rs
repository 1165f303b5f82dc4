//! Service configuration.
//!
//! Read once from `DIALOGIX_*` environment variables (a `.env` file is loaded by
//! `main`), validated, then used to build the shared [`NlpModels`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use crate::brain::{
    GazetteerRecognizer, IntentLexicon, NlpModels, PolarityLexicon, DEFAULT_SUMMARY_MAX_LENGTH,
    PROMPT_SUMMARY_MAX_LENGTH,
};
use crate::error::{invalid_fields, AppError};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8001;

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    /// Bunyan-style JSON lines
    Json,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(AppError::Config(format!(
                "DIALOGIX_LOG_FORMAT must be 'pretty' or 'json', got '{}'",
                other
            ))),
        }
    }
}

/// Runtime configuration for the analysis service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Config {
    /// Address to bind.
    #[validate(length(min = 1))]
    pub host: String,
    /// Port to bind.
    #[validate(range(min = 1))]
    pub port: u16,
    /// Summary length for `document_summary` on the analyze endpoint.
    #[validate(range(min = 1))]
    pub summary_max_length: usize,
    /// Summary length for persona prompt context.
    #[validate(range(min = 1))]
    pub prompt_summary_max_length: usize,
    /// Optional VADER-format lexicon replacing the bundled one.
    pub sentiment_lexicon: Option<PathBuf>,
    /// Optional JSON intent lexicon replacing the bundled one.
    pub intent_lexicon: Option<PathBuf>,
    /// Optional JSON gazetteer replacing the bundled one.
    pub gazetteer: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            summary_max_length: DEFAULT_SUMMARY_MAX_LENGTH,
            prompt_summary_max_length: PROMPT_SUMMARY_MAX_LENGTH,
            sentiment_lexicon: None,
            intent_lexicon: None,
            gazetteer: None,
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Expected variables (all optional):
    /// - DIALOGIX_HOST, DIALOGIX_PORT
    /// - DIALOGIX_SUMMARY_MAX_LENGTH, DIALOGIX_PROMPT_SUMMARY_MAX_LENGTH
    /// - DIALOGIX_SENTIMENT_LEXICON, DIALOGIX_INTENT_LEXICON, DIALOGIX_GAZETTEER
    /// - DIALOGIX_LOG_FORMAT: "pretty" or "json"
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();

        let config = Self {
            host: env_string("DIALOGIX_HOST").unwrap_or(defaults.host),
            port: env_parse("DIALOGIX_PORT")?.unwrap_or(defaults.port),
            summary_max_length: env_parse("DIALOGIX_SUMMARY_MAX_LENGTH")?
                .unwrap_or(defaults.summary_max_length),
            prompt_summary_max_length: env_parse("DIALOGIX_PROMPT_SUMMARY_MAX_LENGTH")?
                .unwrap_or(defaults.prompt_summary_max_length),
            sentiment_lexicon: env_string("DIALOGIX_SENTIMENT_LEXICON").map(PathBuf::from),
            intent_lexicon: env_string("DIALOGIX_INTENT_LEXICON").map(PathBuf::from),
            gazetteer: env_string("DIALOGIX_GAZETTEER").map(PathBuf::from),
            log_format: match env_string("DIALOGIX_LOG_FORMAT") {
                Some(format) => format.parse()?,
                None => defaults.log_format,
            },
        };

        config
            .validate()
            .map_err(|e| AppError::Config(format!("invalid configuration: {}", invalid_fields(&e))))?;
        Ok(config)
    }

    /// `host:port` for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Non-empty value of an environment variable
fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: FromStr>(key: &str) -> Result<Option<T>, AppError>
where
    T::Err: std::fmt::Display,
{
    env_string(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| AppError::Config(format!("{} has invalid value '{}': {}", key, raw, e)))
        })
        .transpose()
}

impl NlpModels {
    /// Build the shared models described by `config`.
    ///
    /// A sentiment lexicon that cannot be read leaves sentiment unavailable (neutral
    /// scores). An unreadable or invalid intent lexicon or gazetteer is an error.
    pub fn load(config: &Config) -> Result<Self, AppError> {
        let polarity = match &config.sentiment_lexicon {
            None => Some(Arc::new(PolarityLexicon::builtin())),
            Some(path) => match PolarityLexicon::load(path) {
                Ok(lexicon) if !lexicon.is_empty() => Some(Arc::new(lexicon)),
                Ok(_) => {
                    warn!("Sentiment lexicon {} is empty; sentiment model unavailable", path.display());
                    None
                }
                Err(e) => {
                    warn!(
                        "Failed to load sentiment lexicon {}: {}; sentiment model unavailable",
                        path.display(),
                        e
                    );
                    None
                }
            },
        };

        let intents = match &config.intent_lexicon {
            None => IntentLexicon::default(),
            Some(path) => IntentLexicon::load(path)?,
        };

        let recognizer = match &config.gazetteer {
            None => GazetteerRecognizer::builtin(),
            Some(path) => GazetteerRecognizer::load(path)?,
        };

        info!(
            "Models loaded: sentiment={}, intents={} categories, recognizer={}",
            polarity.as_ref().map_or(0, |l| l.len()),
            intents.categories().count(),
            describe(config.gazetteer.as_deref()),
        );

        Ok(Self {
            polarity,
            recognizer: Arc::new(recognizer),
            intents: Arc::new(intents),
        })
    }
}

fn describe(path: Option<&Path>) -> String {
    path.map_or_else(|| "builtin gazetteer".to_string(), |p| p.display().to_string())
}
