use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid clock speed: {value} (expected one of 0, 1, 2, 5, 10)")]
    InvalidSpeed { value: i64 },

    #[error("Invalid time: year {year}, month {month}, day {day}, hour {hour}")]
    InvalidTime { year: u32, month: u32, day: u32, hour: u32 },

    #[error("Malformed persisted value for '{key}': {reason}")]
    Deserialization { key: String, reason: String },

    #[error("Satisfaction amount must be a non-negative number, got {amount}")]
    NegativeSatisfaction { amount: f64 },

    #[error("Character '{id}' not found")]
    CharacterNotFound { id: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SimResult<T> = Result<T, SimError>;
