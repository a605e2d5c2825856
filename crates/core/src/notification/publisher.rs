//! RabbitMQ publisher with lazily-initialized, guarded connection state.

use lapin::options::{BasicPublishOptions, QueueDeclareOptions};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

/// Notification publish errors.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// Event payload could not be serialized.
    #[error("failed to serialize event payload: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Broker connection, channel, or publish failure.
    #[error("message broker error: {0}")]
    Broker(#[from] lapin::Error),
}

/// AMQP delivery mode for messages that survive a broker restart.
const PERSISTENT: u8 = 2;

/// Publishes JSON events to named durable queues.
///
/// The connection and channel are opened on first use and reused across
/// requests. A mutex guards the shared state so concurrent publishers
/// cannot race to open duplicate connections. On any failure the state
/// resets to unconnected and the next publish pays a fresh connect; there
/// is no reconnect backoff and no retry.
pub struct QueuePublisher {
    url: String,
    state: Mutex<Option<(Connection, Channel)>>,
}

impl QueuePublisher {
    /// Creates a publisher for the given AMQP URL without connecting.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            state: Mutex::new(None),
        }
    }

    /// Publishes `message` as persistent JSON to the durable queue
    /// `queue`, declaring it if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or if the broker rejects
    /// the connection, channel, queue declaration, or publish.
    pub async fn publish_json<T: Serialize>(
        &self,
        queue: &str,
        message: &T,
    ) -> Result<(), NotificationError> {
        let payload = serde_json::to_vec(message)?;

        let mut state = self.state.lock().await;
        let channel = match state.as_ref() {
            Some((connection, channel))
                if connection.status().connected() && channel.status().connected() =>
            {
                channel.clone()
            }
            _ => {
                let connection =
                    Connection::connect(&self.url, ConnectionProperties::default()).await?;
                let channel = connection.create_channel().await?;
                debug!("message broker channel opened");
                let handle = channel.clone();
                *state = Some((connection, channel));
                handle
            }
        };

        let result = Self::publish_on(&channel, queue, &payload).await;
        if result.is_err() {
            // Drop the broken channel; the next publish reconnects.
            *state = None;
        }
        result
    }

    async fn publish_on(
        channel: &Channel,
        queue: &str,
        payload: &[u8],
    ) -> Result<(), NotificationError> {
        channel
            .queue_declare(
                queue,
                QueueDeclareOptions {
                    durable: true,
                    ..QueueDeclareOptions::default()
                },
                FieldTable::default(),
            )
            .await?;

        channel
            .basic_publish(
                "",
                queue,
                BasicPublishOptions::default(),
                payload,
                BasicProperties::default().with_delivery_mode(PERSISTENT),
            )
            .await?
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Ping {
        value: i64,
    }

    #[test]
    fn test_new_does_not_connect() {
        // Construction must be infallible and side-effect free even with
        // an unreachable broker.
        let _publisher = QueuePublisher::new("amqp://127.0.0.1:1");
    }

    #[tokio::test]
    async fn test_publish_to_unreachable_broker_fails_cleanly() {
        let publisher = QueuePublisher::new("amqp://127.0.0.1:1");

        let err = publisher
            .publish_json("test-queue", &Ping { value: 1 })
            .await
            .expect_err("unreachable broker must error");
        assert!(matches!(err, NotificationError::Broker(_)));

        // The publisher stays usable; the next call attempts a fresh
        // connect rather than reusing poisoned state.
        let err = publisher
            .publish_json("test-queue", &Ping { value: 2 })
            .await
            .expect_err("still unreachable");
        assert!(matches!(err, NotificationError::Broker(_)));
    }

    #[tokio::test]
    #[ignore = "requires a running RabbitMQ broker on localhost"]
    async fn test_publish_round_trip() {
        let url =
            std::env::var("AMQP_URL").unwrap_or_else(|_| "amqp://localhost:5672".to_string());
        let publisher = QueuePublisher::new(url);

        publisher
            .publish_json("ritefolio-publisher-test", &Ping { value: 42 })
            .await
            .expect("publish succeeds");

        // Reuses the cached channel.
        publisher
            .publish_json("ritefolio-publisher-test", &Ping { value: 43 })
            .await
            .expect("second publish succeeds");
    }
}
