//! In-memory transport for exercising publishing without a Pub/Sub backend.

use crate::error::PublishError;
use crate::publisher::{MessageId, TopicHandle, Transport};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A message accepted by [`MemoryTransport`].
#[derive(Debug, Clone)]
pub struct PublishedMessage {
    pub id: MessageId,
    pub topic: String,
    pub body: Value,
    pub attributes: HashMap<String, String>,
}

#[derive(Default)]
struct State {
    attempts: usize,
    existence_checks: usize,
    published: Vec<PublishedMessage>,
    shut_down: bool,
}

/// Records publishes in memory and assigns ids `msg-1`, `msg-2`, ...
/// numbered by attempt.
#[derive(Default)]
pub struct MemoryTransport {
    topic_missing: bool,
    access_denied: bool,
    failing_attempts: HashSet<usize>,
    state: Mutex<State>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report every topic as absent.
    pub fn without_topic(mut self) -> Self {
        self.topic_missing = true;
        self
    }

    /// Reject existence checks with a permission error.
    pub fn deny_access(mut self) -> Self {
        self.access_denied = true;
        self
    }

    /// Fail the given publish attempt (1-based).
    pub fn fail_on(mut self, attempt: usize) -> Self {
        self.failing_attempts.insert(attempt);
        self
    }

    pub fn published(&self) -> Vec<PublishedMessage> {
        self.state().published.clone()
    }

    pub fn attempts(&self) -> usize {
        self.state().attempts
    }

    pub fn existence_checks(&self) -> usize {
        self.state().existence_checks
    }

    pub fn is_shut_down(&self) -> bool {
        self.state().shut_down
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn topic_exists(&self, topic: &TopicHandle) -> Result<bool, PublishError> {
        self.state().existence_checks += 1;
        if self.access_denied {
            return Err(PublishError::PermissionDenied(topic.path()));
        }
        Ok(!self.topic_missing)
    }

    async fn publish(
        &self,
        topic: &TopicHandle,
        data: Vec<u8>,
        attributes: HashMap<String, String>,
    ) -> Result<MessageId, PublishError> {
        let mut state = self.state();
        state.attempts += 1;
        let attempt = state.attempts;

        if self.failing_attempts.contains(&attempt) {
            return Err(PublishError::Transport(format!(
                "simulated failure on attempt {attempt}"
            )));
        }

        let id = format!("msg-{attempt}");
        state.published.push(PublishedMessage {
            id: id.clone(),
            topic: topic.path(),
            body: serde_json::from_slice(&data)?,
            attributes,
        });
        Ok(id)
    }

    async fn shutdown(&self) {
        self.state().shut_down = true;
    }
}
