use thiserror::Error;

/// Errors that can occur at the hosted media service boundary.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The upload was rejected or the transfer failed. Carries the
    /// service's message.
    #[error("upload failed: {0}")]
    Upload(String),

    /// The deletion request was rejected or the transfer failed. Carries
    /// the service's message.
    #[error("deletion failed: {0}")]
    Deletion(String),

    /// The inline file payload is not a valid `data:` URI.
    #[error("invalid file payload: {0}")]
    Payload(String),
}
