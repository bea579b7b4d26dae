//! Test Prediction Requester
//!
//! Publishes sample prediction requests to NATS and logs the replies.

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

/// Request payload matching the pipeline's expected format
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PredictionRequest {
    request_id: String,
    home_team_id: i64,
    away_team_id: i64,
    league_id: i64,
}

/// Real provider ids: (league id, team ids)
const LEAGUES: &[(i64, &[i64])] = &[
    // Ligue 1: PSG, Marseille, Lyon, Monaco, Lille
    (61, &[85, 81, 80, 91, 79]),
    // Premier League: Man United, Liverpool, Arsenal, Chelsea, Man City
    (39, &[33, 40, 42, 49, 50]),
    // La Liga: Barcelona, Atletico, Real Madrid
    (140, &[529, 530, 541]),
    // Coupe de France (cup: statistics come from Ligue 1)
    (66, &[85, 81, 80]),
];

/// Request generator for testing
struct RequestGenerator {
    rng: rand::rngs::ThreadRng,
    counter: u64,
}

impl RequestGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
            counter: 0,
        }
    }

    /// Random fixture between two distinct teams of one league
    fn generate(&mut self) -> PredictionRequest {
        self.counter += 1;
        let (league_id, teams) = *LEAGUES.choose(&mut self.rng).unwrap_or(&LEAGUES[0]);
        let pair: Vec<i64> = teams.choose_multiple(&mut self.rng, 2).copied().collect();

        PredictionRequest {
            request_id: format!("req_{:08}", self.counter),
            home_team_id: pair[0],
            away_team_id: pair[1],
            league_id,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("test_requester=info".parse()?),
        )
        .init();

    info!("Starting Test Prediction Requester");

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let nats_url = args.get(1).map(|s| s.as_str()).unwrap_or("nats://localhost:4222");
    let subject = args.get(2).map(|s| s.as_str()).unwrap_or("predictions.requests");
    let count: u64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(10);
    let delay_ms: u64 = args.get(4).and_then(|s| s.parse().ok()).unwrap_or(500);

    info!(
        nats_url = %nats_url,
        subject = %subject,
        count = count,
        delay_ms = delay_ms,
        "Configuration loaded"
    );

    let client = match async_nats::connect(nats_url).await {
        Ok(c) => {
            info!("Connected to NATS");
            c
        }
        Err(e) => {
            warn!(error = %e, "Failed to connect to NATS. Running in dry-run mode.");
            return run_dry_mode(count, delay_ms).await;
        }
    };

    let mut generator = RequestGenerator::new();
    let mut answered = 0;

    for _ in 0..count {
        let request = generator.generate();
        let payload = serde_json::to_vec(&request)?;

        let reply = tokio::time::timeout(
            Duration::from_secs(30),
            client.request(subject.to_string(), payload.into()),
        )
        .await;

        match reply {
            Ok(Ok(message)) => {
                answered += 1;
                let body: serde_json::Value = serde_json::from_slice(&message.payload)?;
                info!(
                    request_id = %request.request_id,
                    league_id = request.league_id,
                    home_team_id = request.home_team_id,
                    away_team_id = request.away_team_id,
                    "Response: {}",
                    body
                );
            }
            Ok(Err(e)) => warn!(request_id = %request.request_id, error = %e, "Request failed"),
            Err(_) => warn!(request_id = %request.request_id, "Request timed out"),
        }

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    info!("Completed! {}/{} requests answered", answered, count);

    Ok(())
}

async fn run_dry_mode(count: u64, delay_ms: u64) -> anyhow::Result<()> {
    info!("Running in dry-run mode (no NATS connection)");

    let mut generator = RequestGenerator::new();

    for i in 0..count {
        let json = serde_json::to_string_pretty(&generator.generate())?;
        info!("Sample request {}:\n{}", i + 1, json);
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    Ok(())
}
