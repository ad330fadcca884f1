//! Command-line value parsing.

pub mod duration;

pub use duration::parse_delay;
