//! Topic-based event bus for battle log entries.
//!
//! The driver publishes every newly applied log entry; consumers such as a
//! renderer or a network relay subscribe only to the topics they need.

mod bus;

pub use bus::{Event, EventBus, Topic};
