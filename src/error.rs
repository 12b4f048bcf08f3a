use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum PlugError {
    #[error("Failed to configure output pin {pin}: {reason}")]
    OutputConfig { pin: u8, reason: String },

    #[error("Controller is no longer running")]
    ControllerStopped,

    #[error("Unknown console command: {0}")]
    UnknownCommand(String),

    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PlugError>;
