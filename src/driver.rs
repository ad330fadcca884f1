//! Publish mode selection and execution.

use crate::cli::Cli;
use pubsub_producer::{
    build_batch, load_from_file, Attributes, Message, MessageId, PublishError, Publisher,
    Transport,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// What to publish. Chosen from the arguments with `--file` taking
/// precedence over `--message`, which takes precedence over generation.
/// Empty `--file` or `--message` values count as absent.
#[derive(Debug, Clone, PartialEq)]
pub enum PublishMode {
    /// Messages loaded from a JSON file, published without delay.
    File(PathBuf),
    /// One inline JSON message; any failure is fatal.
    Single(String),
    /// Generated demonstration messages.
    Generate {
        count: usize,
        delay: Duration,
        event_type: String,
    },
}

impl PublishMode {
    pub fn select(cli: &Cli) -> Self {
        let file = cli.file.as_ref().filter(|path| !path.as_os_str().is_empty());
        let message = cli.message.as_ref().filter(|message| !message.is_empty());

        if let Some(path) = file {
            PublishMode::File(path.clone())
        } else if let Some(message) = message {
            PublishMode::Single(message.clone())
        } else {
            PublishMode::Generate {
                count: cli.count,
                delay: cli.delay,
                event_type: cli.event_type.clone(),
            }
        }
    }
}

/// Validated run configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub project_id: String,
    pub topic: String,
    pub mode: PublishMode,
    pub strict: bool,
}

impl Settings {
    /// Check required values and pick the publish mode. Performs no I/O.
    pub fn from_cli(cli: &Cli) -> Result<Self, PublishError> {
        let project_id = required(
            cli.project_id.as_deref(),
            "Project ID is required. Use --project-id or set GOOGLE_CLOUD_PROJECT",
        )?;
        let topic = required(
            cli.topic.as_deref(),
            "Topic name is required. Use --topic or set PUBSUB_TOPIC",
        )?;

        Ok(Self {
            project_id,
            topic,
            mode: PublishMode::select(cli),
            strict: cli.strict,
        })
    }
}

fn required(value: Option<&str>, message: &str) -> Result<String, PublishError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(PublishError::Validation(message.to_string())),
    }
}

/// Result of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub message_ids: Vec<MessageId>,
    pub failed: usize,
}

/// Verify the topic and publish according to the selected mode.
///
/// Per-message failures in file and generate modes are counted in the
/// summary rather than returned as errors.
pub async fn run<T: Transport>(
    settings: &Settings,
    publisher: &Publisher<T>,
) -> Result<RunSummary, PublishError> {
    let topic = publisher.resolve_topic(&settings.project_id, &settings.topic);
    info!("Publishing to topic: {topic}");

    publisher.verify_topic_exists(&topic).await?;

    let summary = match &settings.mode {
        PublishMode::File(path) => {
            let messages = load_from_file(path)?;
            info!("Publishing {} message(s) from {}", messages.len(), path.display());
            let report = publisher.publish_many(&topic, messages, Duration::ZERO).await;
            RunSummary {
                message_ids: report.message_ids,
                failed: report.failed,
            }
        }
        PublishMode::Single(text) => {
            let message = Message::parse_inline(text)?;
            let message_id = publisher
                .publish_one(&topic, &message, Attributes::new())
                .await?;
            info!("Published message: {message_id}");
            RunSummary {
                message_ids: vec![message_id],
                failed: 0,
            }
        }
        PublishMode::Generate {
            count,
            delay,
            event_type,
        } => {
            let report = publisher
                .publish_many(&topic, build_batch(event_type, *count), *delay)
                .await;
            RunSummary {
                message_ids: report.message_ids,
                failed: report.failed,
            }
        }
    };

    info!(
        "Successfully published {} message(s) to {}",
        summary.message_ids.len(),
        settings.topic
    );
    Ok(summary)
}

/// Run to completion, shut the transport down, and apply `--strict`.
pub async fn execute<T: Transport>(
    settings: &Settings,
    publisher: &Publisher<T>,
) -> anyhow::Result<RunSummary> {
    let result = run(settings, publisher).await;
    publisher.shutdown().await;
    let summary = result?;

    if settings.strict && summary.failed > 0 {
        anyhow::bail!(
            "{} of {} message(s) failed to publish",
            summary.failed,
            summary.failed + summary.message_ids.len()
        );
    }
    Ok(summary)
}
