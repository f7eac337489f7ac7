//! Domain events

mod engagement_event;

pub use engagement_event::{EngagementEvent, EventCounts};
