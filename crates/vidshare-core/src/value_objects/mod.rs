//! Value objects - immutable types that represent domain concepts

mod disposition;
mod snowflake;

pub use disposition::{Disposition, DispositionParseError, EngagementKind, Presence, Rating};
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
