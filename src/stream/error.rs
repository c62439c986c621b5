use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("device enumeration failed: {0}")]
    Enumerate(String),
    #[error("failed to open {id}: {reason}")]
    Open { id: String, reason: String },
    #[error("hardware fault: {0}")]
    Hardware(String),
}
