use std::time::Duration;

use thiserror::Error;

/// Errors that can occur within the subscription subsystem.
#[derive(Debug, Error)]
pub enum SubsError {
    /// The requested notification interval is below the minimum of one second.
    #[error("Invalid interval: {0:?} (minimum 1s)")]
    InvalidInterval(Duration),
}

pub type Result<T> = std::result::Result<T, SubsError>;
