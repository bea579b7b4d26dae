//! Football Prediction Pipeline - Main Entry Point
//!
//! Consumes match prediction requests from NATS, fetches team statistics,
//! runs the outcome classifier and replies with outcome probabilities.

use anyhow::Result;
use football_prediction_pipeline::{
    config::{AppConfig, LoggingConfig},
    consumer::{decode_fixtures_request, RequestConsumer},
    metrics::{MetricsReporter, PipelineMetrics},
    models::ModelArtifact,
    pipeline::PredictionPipeline,
    producer::ResultProducer,
    provider::StatisticsProvider,
    types::{ErrorResponse, FixturesResponse, HealthStatus, PredictionResponse},
};
use futures::StreamExt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(format!("football_prediction_pipeline={}", logging.level))
    })?;

    if logging.format == "json" {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load()?;
    init_logging(&config.logging)?;

    info!("Starting Football Prediction Pipeline");
    info!(
        seasons = ?config.provider.seasons,
        cup_leagues = config.provider.cup_leagues.len(),
        workers = config.pipeline.workers,
        "Configuration loaded successfully"
    );

    // Load the trained model once; every request reads it
    let artifact = Arc::new(ModelArtifact::load(&config.model)?);
    let pipeline = Arc::new(PredictionPipeline::new(artifact.clone()));
    info!(
        model = %artifact.model_name(),
        features = artifact.schema.len(),
        "Prediction pipeline initialized"
    );

    let provider = Arc::new(StatisticsProvider::new(
        &config.provider,
        Duration::from_millis(config.pipeline.timeout_ms),
    )?);
    let metrics = Arc::new(PipelineMetrics::new());

    // Connect to NATS
    let client = async_nats::connect(&config.nats.url).await?;
    info!("Connected to NATS at {}", config.nats.url);

    let consumer = RequestConsumer::new(client.clone(), &config.nats.request_subject);
    let producer = Arc::new(ResultProducer::new(client.clone(), &config.nats.result_subject));

    // Health checks
    let mut health = client.subscribe(config.nats.health_subject.clone()).await?;
    let health_client = client.clone();
    let health_status = HealthStatus {
        status: "healthy".to_string(),
        model_loaded: true,
        feature_count: artifact.schema.len(),
        accuracy: artifact.accuracy,
    };
    tokio::spawn(async move {
        while let Some(message) = health.next().await {
            let Some(reply) = message.reply else { continue };
            match serde_json::to_vec(&health_status) {
                Ok(payload) => {
                    if let Err(e) = health_client.publish(reply, payload.into()).await {
                        warn!(error = %e, "Failed to answer health check");
                    }
                }
                Err(e) => warn!(error = %e, "Failed to serialize health status"),
            }
        }
    });

    // Upcoming fixtures listing
    let mut fixtures = client.subscribe(config.nats.fixtures_subject.clone()).await?;
    let fixtures_provider = provider.clone();
    let fixtures_producer = producer.clone();
    tokio::spawn(async move {
        while let Some(message) = fixtures.next().await {
            let provider = fixtures_provider.clone();
            let producer = fixtures_producer.clone();
            tokio::spawn(async move {
                let reply = message.reply.as_ref();
                let published = match decode_fixtures_request(&message.payload) {
                    Err(response) => producer.respond(reply, &response).await,
                    Ok((request_id, league_id)) => match provider.upcoming_fixtures(league_id).await {
                        Some(matches) => {
                            info!(request_id = %request_id, league_id, fixtures = matches.len(), "Fixtures listed");
                            let response = FixturesResponse::new(request_id, league_id, matches);
                            producer.respond(reply, &response).await
                        }
                        None => {
                            let response = ErrorResponse::new(request_id, "no fixtures found")
                                .with_details(format!("league {}", league_id));
                            producer.respond(reply, &response).await
                        }
                    },
                };
                if let Err(e) = published {
                    error!(error = %e, "Failed to publish fixtures response");
                }
            });
        }
    });

    // Start metrics reporter (prints summary every 60 seconds)
    let metrics_clone = metrics.clone();
    tokio::spawn(async move {
        MetricsReporter::new(metrics_clone, 60).start().await;
    });

    // Semaphore to limit concurrent requests
    let semaphore = Arc::new(Semaphore::new(config.pipeline.workers.max(1)));

    info!(
        subject = %consumer.subject(),
        results = %producer.subject(),
        "Listening for prediction requests"
    );

    let mut requests = consumer.subscribe().await?;

    while let Some(incoming) = requests.next().await {
        let permit = semaphore.clone().acquire_owned().await?;

        let pipeline = pipeline.clone();
        let provider = provider.clone();
        let producer = producer.clone();
        let metrics = metrics.clone();

        tokio::spawn(async move {
            let start_time = Instant::now();
            let reply = incoming.reply.as_ref();

            let accepted = match incoming.decoded {
                Ok(accepted) => accepted,
                Err(response) => {
                    metrics.record_failure();
                    if let Err(e) = producer.respond(reply, &response).await {
                        error!(error = %e, "Failed to publish error response");
                    }
                    return;
                }
            };
            let request_id = accepted.request_id;
            let ctx = accepted.context;

            info!(
                request_id = %request_id,
                home_team_id = ctx.home_team_id,
                away_team_id = ctx.away_team_id,
                league_id = ctx.league_id,
                "Prediction requested"
            );

            let stats = provider.fetch(&ctx).await;

            let publish_result = match pipeline.predict(&ctx, &stats) {
                Ok(output) => {
                    let processing_time = start_time.elapsed();
                    metrics.record_prediction(
                        processing_time,
                        output.result.prediction,
                        output.result.confidence,
                        output.coverage,
                    );

                    info!(
                        request_id = %request_id,
                        home_win = format!("{:.1}", output.result.home_win),
                        draw = format!("{:.1}", output.result.draw),
                        away_win = format!("{:.1}", output.result.away_win),
                        prediction = %output.result.prediction,
                        coverage = output.coverage,
                        processing_time_ms = processing_time.as_millis(),
                        "Prediction complete"
                    );

                    let artifact = pipeline.artifact();
                    let response = PredictionResponse::new(
                        request_id.clone(),
                        output.result,
                        artifact.model_name().to_string(),
                        artifact.accuracy,
                    );
                    producer.respond(reply, &response).await
                }
                Err(e) => {
                    error!(request_id = %request_id, error = %e, "Prediction failed");
                    metrics.record_failure();
                    let response =
                        ErrorResponse::new(request_id.clone(), "prediction failed").with_details(format!("{:#}", e));
                    producer.respond(reply, &response).await
                }
            };

            match publish_result {
                Ok(()) => debug!(request_id = %request_id, "Response published"),
                Err(e) => error!(request_id = %request_id, error = %e, "Failed to publish response"),
            }

            drop(permit);
        });
    }

    info!("Pipeline shutting down...");
    metrics.print_summary();

    Ok(())
}
