//! Pub/Sub test message producer
//!
//! Builds JSON test messages and publishes them to a Google Cloud Pub/Sub
//! topic, one at a time, for exercising event-driven deployments.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pubsub_producer::{build_batch, Publisher, PubSubTransport};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let publisher = Publisher::new(PubSubTransport::new("my-project").await?);
//!     let topic = publisher.resolve_topic("my-project", "dev-events");
//!     publisher.verify_topic_exists(&topic).await?;
//!
//!     let report = publisher
//!         .publish_many(&topic, build_batch("test", 10), Duration::from_millis(100))
//!         .await;
//!     println!("published {} message(s)", report.published());
//!
//!     publisher.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod attributes;
pub mod error;
pub mod message;
pub mod publisher;
pub mod pubsub;
pub mod testing;

pub use attributes::Attributes;
pub use error::PublishError;
pub use message::{build_batch, load_from_file, Message, DEFAULT_EVENT_TYPE, PUBLISHER_NAME};
pub use publisher::{BatchReport, MessageId, Publisher, TopicHandle, Transport};
pub use pubsub::PubSubTransport;
