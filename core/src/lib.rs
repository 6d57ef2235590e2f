pub mod calendar;
pub mod character;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod needs;
pub mod snapshot;
pub mod store;
pub mod timer;
pub mod types;
pub mod wall_clock;
