use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::MediaError;

/// A remotely stored asset: the opaque identifier the service assigned to
/// it and the public URL it is served from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    pub public_id: String,
    pub url: String,
}

/// Hosted upload/delete media service.
///
/// Payloads are inline-encoded files (`data:<mime>;base64,<bytes>`), not
/// multipart streams. Every successful upload consumes remote quota, and
/// a failed delete leaves the remote asset orphaned; there is no
/// compensating retry at this layer.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Upload an inline-encoded PDF under `folder`.
    ///
    /// Delivery goes through the image pipeline so the document renders
    /// inline in a browser instead of forcing a download.
    async fn upload(&self, file: &str, folder: &str) -> Result<StoredFile, MediaError>;

    /// Upload an inline-encoded image under `folder`, with automatic
    /// quality and format negotiation.
    async fn upload_image(&self, file: &str, folder: &str) -> Result<StoredFile, MediaError>;

    /// Delete a remote asset by its public identifier.
    ///
    /// Returns `true` if the service removed the asset, `false` if it
    /// reported the asset as already gone.
    async fn delete(&self, public_id: &str) -> Result<bool, MediaError>;
}
