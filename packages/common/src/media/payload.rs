//! Inline file payloads.
//!
//! Files cross the API boundary as `data:<mime>;base64,<bytes>` strings,
//! the form browsers produce from `FileReader.readAsDataURL`.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::error::MediaError;

/// A decoded inline payload.
#[derive(Debug, PartialEq, Eq)]
pub struct InlineFile {
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Render bytes as a `data:` URI.
pub fn encode(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Parse a `data:` URI into its MIME type and raw bytes.
pub fn decode(payload: &str) -> Result<InlineFile, MediaError> {
    let rest = payload
        .strip_prefix("data:")
        .ok_or_else(|| MediaError::Payload("missing data: prefix".into()))?;

    let (mime, data) = rest
        .split_once(";base64,")
        .ok_or_else(|| MediaError::Payload("missing ;base64, separator".into()))?;

    if mime.is_empty() {
        return Err(MediaError::Payload("empty MIME type".into()));
    }

    let bytes = STANDARD
        .decode(data)
        .map_err(|e| MediaError::Payload(format!("base64 decode error: {e}")))?;

    Ok(InlineFile {
        mime: mime.to_string(),
        bytes,
    })
}
