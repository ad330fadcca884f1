//! Pub/Sub test publisher
//!
//! Command-line driver that publishes synthetic or user supplied JSON
//! messages to a Google Cloud Pub/Sub topic for exercising event-driven
//! deployments: subscriber pipelines, dead-letter queues and throughput.
//!
//! # CLI Usage
//!
//! ```bash
//! # One generated test message
//! pubsub-publisher --project-id my-project --topic dev-events
//!
//! # Ten generated messages, half a second apart
//! pubsub-publisher -p my-project -t dev-events --count 10 --delay 0.5
//!
//! # Every message in a file
//! pubsub-publisher -p my-project -t dev-events --file messages.json
//! ```
//!
//! Message building and the Pub/Sub transport live in the `pubsub_producer`
//! crate.

pub mod cli;
pub mod config;
pub mod driver;

pub use cli::Cli;
pub use driver::{execute, run, PublishMode, RunSummary, Settings};
