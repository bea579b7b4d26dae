//! NATS consumer for incoming prediction requests
//!
//! Turns raw messages into either a validated fixture or the error reply
//! the caller should receive.

use crate::types::{ErrorResponse, FixturesRequest, MatchContext, PredictionRequest};
use anyhow::Result;
use async_nats::{Client, Subject, Subscriber};
use futures::StreamExt;
use tracing::{info, warn};

/// A prediction request that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedRequest {
    pub request_id: String,
    pub context: MatchContext,
}

/// One message from the request subject
pub struct IncomingRequest {
    /// Where the caller waits for the answer, if anywhere
    pub reply: Option<Subject>,
    pub decoded: std::result::Result<AcceptedRequest, ErrorResponse>,
}

/// Decode and validate a prediction request payload.
pub fn decode_request(payload: &[u8]) -> std::result::Result<AcceptedRequest, ErrorResponse> {
    let request = serde_json::from_slice::<PredictionRequest>(payload).map_err(|e| {
        warn!(error = %e, "Failed to deserialize prediction request");
        ErrorResponse::new(String::new(), "invalid request").with_details(e.to_string())
    })?;

    match request.match_context() {
        Some(context) => Ok(AcceptedRequest {
            request_id: request.request_id,
            context,
        }),
        None => {
            warn!(request_id = %request.request_id, "Prediction request missing match data");
            Err(ErrorResponse::new(request.request_id, "missing match data"))
        }
    }
}

/// Decode a fixtures listing request into its request id and league.
pub fn decode_fixtures_request(payload: &[u8]) -> std::result::Result<(String, i64), ErrorResponse> {
    let request = serde_json::from_slice::<FixturesRequest>(payload)
        .map_err(|e| ErrorResponse::new(String::new(), "invalid request").with_details(e.to_string()))?;

    match request.league() {
        Some(league_id) => Ok((request.request_id, league_id)),
        None => Err(ErrorResponse::new(request.request_id, "missing league")),
    }
}

/// Consumer for receiving prediction requests from NATS
pub struct RequestConsumer {
    client: Client,
    subject: String,
}

impl RequestConsumer {
    pub fn new(client: Client, subject: &str) -> Self {
        Self {
            client,
            subject: subject.to_string(),
        }
    }

    /// Subscribe to the request subject
    pub async fn subscribe(&self) -> Result<RequestStream> {
        let subscriber = self.client.subscribe(self.subject.clone()).await?;
        info!(subject = %self.subject, "Subscribed to prediction request subject");
        Ok(RequestStream { subscriber })
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }
}

/// Decoded prediction requests as they arrive
pub struct RequestStream {
    subscriber: Subscriber,
}

impl RequestStream {
    /// Next request, or `None` once the subscription closes.
    pub async fn next(&mut self) -> Option<IncomingRequest> {
        let message = self.subscriber.next().await?;
        Some(IncomingRequest {
            decoded: decode_request(&message.payload),
            reply: message.reply,
        })
    }
}
