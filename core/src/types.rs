//! Shared primitive types used across the entire simulation.

/// Wall-clock instant in milliseconds. Signed so a backwards step is
/// representable and can be detected.
pub type Timestamp = i64;

/// A stable, unique identifier for a character.
pub type CharacterId = String;

/// Handle returned by `CalendarClock::on_tick`.
pub type ObserverId = u64;
