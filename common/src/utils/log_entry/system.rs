use std::io::Error as IoError;
use thiserror::Error;
use tokio::task::JoinError;

#[derive(Error, Debug)]
pub enum SystemEntry {
    #[error("Online now")]
    Online,
    #[error("Initializing")]
    Initializing,
    #[error("Initialization completed")]
    InitializeComplete,
    #[error("Termination in process")]
    Terminating,
    #[error("Termination completed")]
    TerminateComplete,
    #[error("Cleaning up")]
    Cleaning,
    #[error("Cleanup completed")]
    CleanComplete,
    #[error("Invalid configuration")]
    InvalidConfig,
    #[error("Configuration not found, using defaults")]
    ConfigNotFound,
    #[error("Unable to parse configuration: {0}")]
    ConfigParseError(String),
    #[error("Configuration updated")]
    ConfigUpdated,
    #[error("Web service ready")]
    WebReady,
    #[error("Web service panic: {0}")]
    WebPanic(IoError),
    #[error("Task panic while execution: {0}")]
    TaskPanickedError(JoinError),
}

impl From<SystemEntry> for String {
    #[inline(always)]
    fn from(value: SystemEntry) -> Self {
        value.to_string()
    }
}
