//! Command-line arguments.

use crate::config::parse_delay;
use clap::Parser;
use pubsub_producer::DEFAULT_EVENT_TYPE;
use std::path::PathBuf;
use std::time::Duration;

const EXAMPLES: &str = "\
Examples:
  # Publish a single test message
  pubsub-publisher --project-id my-project --topic dev-events-events

  # Publish a custom JSON message
  pubsub-publisher -p my-project -t my-topic --message '{\"event_type\": \"order\", \"data\": {\"id\": 123}}'

  # Publish 10 messages with 0.5s delay
  pubsub-publisher -p my-project -t my-topic --count 10 --delay 0.5

  # Publish messages from a JSON file
  pubsub-publisher -p my-project -t my-topic --file messages.json

  # Simulate error scenario (for DLQ testing)
  pubsub-publisher -p my-project -t my-topic --event-type error --count 5";

#[derive(Parser, Debug, Clone)]
#[command(name = "pubsub-publisher")]
#[command(about = "Publish test messages to Google Cloud Pub/Sub")]
#[command(after_help = EXAMPLES)]
pub struct Cli {
    /// GCP project ID
    #[arg(short = 'p', long, env = "GOOGLE_CLOUD_PROJECT")]
    pub project_id: Option<String>,

    /// Pub/Sub topic name
    #[arg(short = 't', long, env = "PUBSUB_TOPIC")]
    pub topic: Option<String>,

    /// JSON message to publish (single message)
    #[arg(short = 'm', long)]
    pub message: Option<String>,

    /// Number of messages to generate
    #[arg(short = 'c', long, default_value_t = 1)]
    pub count: usize,

    /// Delay between generated messages, in seconds or with a unit ("250ms", "2s")
    #[arg(short = 'd', long, default_value = "0.1", value_parser = parse_delay)]
    pub delay: Duration,

    /// JSON file containing one message or an array of messages
    #[arg(short = 'f', long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Event type for generated messages
    #[arg(short = 'e', long, default_value = DEFAULT_EVENT_TYPE)]
    pub event_type: String,

    /// Enable debug logging
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Exit with an error if any message in a batch fails to publish
    #[arg(long)]
    pub strict: bool,
}
