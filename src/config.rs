//! Configuration management for the prediction pipeline

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub nats: NatsConfig,
    pub model: ModelConfig,
    pub provider: ProviderConfig,
    pub pipeline: PipelineConfig,
    pub logging: LoggingConfig,
}

/// NATS connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NatsConfig {
    /// NATS server URL
    pub url: String,
    /// Subject for incoming prediction requests
    pub request_subject: String,
    /// Subject for results when a request carries no reply subject
    pub result_subject: String,
    /// Subject answered with the service health status
    #[serde(default = "default_health_subject")]
    pub health_subject: String,
    /// Subject answered with a competition's upcoming fixtures
    #[serde(default = "default_fixtures_subject")]
    pub fixtures_subject: String,
}

fn default_health_subject() -> String {
    "predictions.health".to_string()
}

fn default_fixtures_subject() -> String {
    "predictions.fixtures".to_string()
}

/// Trained model artifact configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// ONNX classifier file
    pub model_path: String,
    /// JSON metadata with feature columns and class encoding
    pub metadata_path: String,
    /// Number of threads for ONNX inference (default: 1)
    #[serde(default = "default_onnx_threads")]
    pub onnx_threads: usize,
}

fn default_onnx_threads() -> usize {
    1
}

/// Statistics provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// API base URL
    pub base_url: String,
    /// API key sent as `x-apisports-key`
    #[serde(default)]
    pub api_key: String,
    /// Seasons tried in order until one returns data
    #[serde(default = "default_seasons")]
    pub seasons: Vec<i32>,
    /// Number of past meetings requested for head-to-head
    #[serde(default = "default_h2h_last")]
    pub h2h_last: u32,
    /// Number of upcoming fixtures listed per competition
    #[serde(default = "default_upcoming_next")]
    pub upcoming_next: u32,
    /// Cup competitions whose statistics come from a domestic league
    #[serde(default = "default_cup_leagues")]
    pub cup_leagues: Vec<CupLeague>,
}

/// Maps a cup competition to the league its teams' statistics come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CupLeague {
    pub cup: i64,
    pub league: i64,
}

impl ProviderConfig {
    /// League whose statistics and standings describe teams playing in
    /// `league_id`: the mapped league for a cup, otherwise itself.
    pub fn statistics_league(&self, league_id: i64) -> i64 {
        self.cup_leagues
            .iter()
            .find(|c| c.cup == league_id)
            .map(|c| c.league)
            .unwrap_or(league_id)
    }
}

fn default_seasons() -> Vec<i32> {
    vec![2025, 2024]
}

fn default_h2h_last() -> u32 {
    10
}

fn default_upcoming_next() -> u32 {
    10
}

fn default_cup_leagues() -> Vec<CupLeague> {
    [
        // Coupe de France, Trophée des Champions
        (66, 61),
        (65, 61),
        // FA Cup, League Cup
        (45, 39),
        (48, 39),
        // Copa del Rey
        (143, 140),
        // DFB Pokal
        (81, 78),
        // Coppa Italia
        (137, 135),
    ]
    .into_iter()
    .map(|(cup, league)| CupLeague { cup, league })
    .collect()
}

/// Pipeline configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Number of requests processed concurrently
    pub workers: usize,
    /// Provider HTTP timeout in milliseconds
    pub timeout_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl AppConfig {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path, with `PREDICTOR__*`
    /// environment overrides (e.g. `PREDICTOR__PROVIDER__API_KEY`).
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(Environment::with_prefix("PREDICTOR").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            nats: NatsConfig {
                url: "nats://localhost:4222".to_string(),
                request_subject: "predictions.requests".to_string(),
                result_subject: "predictions.results".to_string(),
                health_subject: default_health_subject(),
                fixtures_subject: default_fixtures_subject(),
            },
            model: ModelConfig {
                model_path: "models/football_model.onnx".to_string(),
                metadata_path: "models/football_model.json".to_string(),
                onnx_threads: 1,
            },
            provider: ProviderConfig {
                base_url: "https://v3.football.api-sports.io".to_string(),
                api_key: String::new(),
                seasons: default_seasons(),
                h2h_last: default_h2h_last(),
                upcoming_next: default_upcoming_next(),
                cup_leagues: default_cup_leagues(),
            },
            pipeline: PipelineConfig {
                workers: 4,
                timeout_ms: 10_000,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}
