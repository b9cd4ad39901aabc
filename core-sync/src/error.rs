use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Device is offline")]
    Offline,

    #[error("Operation {operation_id} is already being synced")]
    AlreadyInProgress { operation_id: String },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Gave up after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded { attempts: u32, last_error: String },

    #[error("Remote store error: {0}")]
    Remote(String),

    #[error("Sync cancelled")]
    Cancelled,

    #[error("Sync engine already started")]
    AlreadyStarted,

    #[error("Invalid sync configuration: {0}")]
    Config(String),

    #[error("Runtime error: {0}")]
    Runtime(#[from] core_runtime::Error),

    #[error("Sync task failed: {0}")]
    Task(String),

    #[error("Invalid operation ID: {0}")]
    InvalidOperationId(String),
}

impl SyncError {
    /// Whether the same operation may succeed if attempted again later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Offline | Self::Remote(_))
    }

    /// Whether the operation has left the system for good.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::InvalidData(_) | Self::MaxRetriesExceeded { .. })
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
