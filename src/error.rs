use crate::time::Time;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BillingError {
    #[error("logout {logout} precedes login {login}")]
    MalformedInput { login: Time, logout: Time },
    #[error("schedule entry {flight} at {departure} inserted after a departure at {previous}")]
    InvalidIndexConstruction {
        flight: String,
        departure: Time,
        previous: Time,
    },
    #[error("schedule line {line}: {reason}")]
    Schedule { line: u64, reason: String },
    #[error("login line {line}: {reason}")]
    Login { line: u64, reason: String },
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error("invalid configuration: {field} = {value} is outside 0..={max}")]
    ConfigValue { field: String, value: i64, max: i64 },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
