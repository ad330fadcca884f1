//! Publishing messages to a topic.
//!
//! [`Publisher`] drives a [`Transport`], the seam to the messaging service.
//! Publishing is strictly sequential: every message is confirmed by the
//! transport before the next one is submitted.

use crate::attributes::Attributes;
use crate::error::PublishError;
use crate::message::Message;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, info};

/// Server-assigned identifier of an accepted message.
pub type MessageId = String;

/// Reference to a topic within a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TopicHandle {
    project_id: String,
    topic: String,
}

impl TopicHandle {
    pub fn new(project_id: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            topic: topic.into(),
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Fully qualified name, `projects/{project}/topics/{topic}`.
    pub fn path(&self) -> String {
        format!("projects/{}/topics/{}", self.project_id, self.topic)
    }
}

impl fmt::Display for TopicHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Messaging service operations the publisher relies on.
///
/// Implemented by [`PubSubTransport`](crate::PubSubTransport) for Google Cloud
/// and by [`MemoryTransport`](crate::testing::MemoryTransport) for tests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Whether the topic exists. Access problems are reported as errors.
    async fn topic_exists(&self, topic: &TopicHandle) -> Result<bool, PublishError>;

    /// Submit one payload and wait until the service accepts it.
    async fn publish(
        &self,
        topic: &TopicHandle,
        data: Vec<u8>,
        attributes: HashMap<String, String>,
    ) -> Result<MessageId, PublishError>;

    /// Release background resources held for publishing.
    async fn shutdown(&self) {}
}

/// Outcome of a best-effort batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Ids of accepted messages, in publish order.
    pub message_ids: Vec<MessageId>,
    pub attempted: usize,
    pub failed: usize,
}

impl BatchReport {
    pub fn published(&self) -> usize {
        self.message_ids.len()
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Publishes messages through a [`Transport`].
pub struct Publisher<T> {
    transport: T,
}

impl<T: Transport> Publisher<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build the handle for a topic. Does not contact the service.
    pub fn resolve_topic(&self, project_id: &str, topic: &str) -> TopicHandle {
        TopicHandle::new(project_id, topic)
    }

    /// Fail with [`PublishError::TopicNotFound`] unless the topic exists.
    pub async fn verify_topic_exists(&self, topic: &TopicHandle) -> Result<(), PublishError> {
        if self.transport.topic_exists(topic).await? {
            debug!("Topic {topic} exists");
            Ok(())
        } else {
            Err(PublishError::TopicNotFound(topic.path()))
        }
    }

    /// Publish a single message and return its id.
    ///
    /// Default attributes are merged in without replacing caller supplied keys.
    pub async fn publish_one(
        &self,
        topic: &TopicHandle,
        message: &Message,
        attributes: Attributes,
    ) -> Result<MessageId, PublishError> {
        let data = message.to_bytes()?;
        let attributes = attributes.with_defaults();

        debug!(
            "Publishing {} byte(s) to {topic} with {} attribute(s)",
            data.len(),
            attributes.len()
        );

        self.transport
            .publish(topic, data, attributes.into_inner())
            .await
    }

    /// Publish messages one at a time, waiting `delay` after each accepted
    /// message except the last.
    ///
    /// Messages are pulled from the iterator only when their turn comes, so
    /// lazily generated ones are stamped at send time. Failed messages are
    /// logged and skipped without waiting, so the report may hold fewer ids
    /// than there were messages.
    pub async fn publish_many<I>(
        &self,
        topic: &TopicHandle,
        messages: I,
        delay: Duration,
    ) -> BatchReport
    where
        I: IntoIterator<Item = Message>,
        I::IntoIter: ExactSizeIterator,
    {
        let messages = messages.into_iter();
        let total = messages.len();
        let mut report = BatchReport::default();

        for (i, message) in messages.enumerate() {
            let index = i + 1;
            let event_id = message.event_id().unwrap_or("-");
            report.attempted += 1;

            match self.publish_one(topic, &message, Attributes::new()).await {
                Ok(message_id) => {
                    info!("Published message {index}/{total}: {message_id} (event_id: {event_id})");
                    report.message_ids.push(message_id);

                    if !delay.is_zero() && index < total {
                        tokio::time::sleep(delay).await;
                    }
                }
                Err(e) => {
                    error!("Failed to publish message {index}/{total} (event_id: {event_id}): {e}");
                    report.failed += 1;
                }
            }
        }

        report
    }

    pub async fn shutdown(&self) {
        self.transport.shutdown().await;
    }
}
