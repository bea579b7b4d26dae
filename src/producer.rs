//! NATS message producer for prediction responses

use anyhow::Result;
use async_nats::{Client, Subject};
use serde::Serialize;
use tracing::debug;

/// Producer for publishing prediction responses to NATS
#[derive(Clone)]
pub struct ResultProducer {
    client: Client,
    subject: String,
}

impl ResultProducer {
    /// Create a new result producer
    pub fn new(client: Client, subject: &str) -> Self {
        Self {
            client,
            subject: subject.to_string(),
        }
    }

    /// Publish a response to the request's reply subject, or to the
    /// configured result subject when the request expects no reply.
    pub async fn respond<T: Serialize>(&self, reply: Option<&Subject>, response: &T) -> Result<()> {
        let payload = serde_json::to_vec(response)?;
        let subject = self.target(reply);

        self.client.publish(subject.clone(), payload.into()).await?;

        debug!(subject = %subject, "Published prediction response");
        Ok(())
    }

    fn target(&self, reply: Option<&Subject>) -> Subject {
        reply
            .cloned()
            .unwrap_or_else(|| Subject::from(self.subject.as_str()))
    }

    /// Get the subject name
    pub fn subject(&self) -> &str {
        &self.subject
    }
}

#[cfg(test)]
mod tests {
    // Integration tests would require a running NATS server
}
