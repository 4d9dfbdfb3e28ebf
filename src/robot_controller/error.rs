use crate::hardware::hardware::HardwareError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RobotError {
    /// A required device was not found at startup.
    #[error("{0} not initialized")]
    HardwareUnavailable(&'static str),
    #[error("Robot movement error: {0}")]
    ActuationError(#[source] HardwareError),
    #[error("Could not find {0} circle")]
    NotFound(&'static str),
    #[error("Color search error: {0}")]
    SensingError(#[source] HardwareError),
    #[error("Invalid move duration: {0} seconds")]
    InvalidDuration(f64),
    #[error("Unknown command")]
    UnknownCommand,
    #[error("Operation cancelled")]
    Cancelled,
}
