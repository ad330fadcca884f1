//! Google Cloud Pub/Sub transport.

use crate::error::PublishError;
use crate::publisher::{MessageId, TopicHandle, Transport};
use async_trait::async_trait;
use gcloud_gax::grpc::{Code, Status};
use gcloud_googleapis::pubsub::v1::PubsubMessage;
use gcloud_pubsub::client::{Client, ClientConfig};
use gcloud_pubsub::publisher::{Publisher, PublisherConfig};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

/// [`Transport`] backed by the `gcloud-pubsub` client.
///
/// Credentials come from Application Default Credentials, or the emulator
/// when `PUBSUB_EMULATOR_HOST` is set. One background publisher is kept per
/// topic and flushed on [`Transport::shutdown`].
pub struct PubSubTransport {
    client: Client,
    publishers: Mutex<HashMap<String, Publisher>>,
}

impl PubSubTransport {
    /// Create a client for the given project.
    pub async fn new(project_id: &str) -> Result<Self, PublishError> {
        let config = ClientConfig {
            project_id: Some(project_id.to_string()),
            ..Default::default()
        }
        .with_auth()
        .await
        .map_err(|e| PublishError::Transport(format!("Failed to load credentials: {e}")))?;

        let client = Client::new(config)
            .await
            .map_err(|e| PublishError::Transport(format!("Failed to create Pub/Sub client: {e}")))?;

        Ok(Self {
            client,
            publishers: Mutex::new(HashMap::new()),
        })
    }

    async fn publisher_for(&self, topic: &TopicHandle) -> Publisher {
        let path = topic.path();
        let mut publishers = self.publishers.lock().await;
        publishers
            .entry(path)
            .or_insert_with_key(|path| {
                debug!("Starting publisher for {path}");
                self.client
                    .topic(path)
                    .new_publisher(Some(publisher_config()))
            })
            .clone()
    }
}

#[async_trait]
impl Transport for PubSubTransport {
    async fn topic_exists(&self, topic: &TopicHandle) -> Result<bool, PublishError> {
        self.client
            .topic(&topic.path())
            .exists(None)
            .await
            .map_err(|status| status_to_error(topic, status))
    }

    async fn publish(
        &self,
        topic: &TopicHandle,
        data: Vec<u8>,
        attributes: HashMap<String, String>,
    ) -> Result<MessageId, PublishError> {
        let publisher = self.publisher_for(topic).await;
        let message = PubsubMessage {
            data,
            attributes,
            ..Default::default()
        };

        let awaiter = publisher.publish(message).await;
        awaiter
            .get()
            .await
            .map_err(|status| status_to_error(topic, status))
    }

    async fn shutdown(&self) {
        let mut publishers = self.publishers.lock().await;
        for (path, mut publisher) in publishers.drain() {
            publisher.shutdown().await;
            debug!("Publisher for {path} shut down");
        }
    }
}

/// Every publish is awaited on its own, so each message is sent as its own
/// bundle instead of waiting for the flush interval.
fn publisher_config() -> PublisherConfig {
    PublisherConfig {
        workers: 1,
        bundle_size: 1,
        ..Default::default()
    }
}

fn status_to_error(topic: &TopicHandle, status: Status) -> PublishError {
    match status.code() {
        Code::NotFound => PublishError::TopicNotFound(topic.path()),
        Code::PermissionDenied => PublishError::PermissionDenied(topic.path()),
        code => PublishError::Transport(format!("{code:?}: {}", status.message())),
    }
}
