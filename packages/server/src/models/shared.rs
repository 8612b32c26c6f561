use serde::Serialize;

use crate::error::AppError;

/// Response envelope for operations that return no record.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = "Instruction deleted")]
    pub message: String,
}

pub const TITLE_MAX_CHARS: usize = 200;

/// Validate a trimmed title (non-empty, at most 200 Unicode characters).
pub fn validate_title(title: &str) -> Result<(), AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::Validation(
            "Please provide instruction title".into(),
        ));
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(AppError::Validation(
            "Title cannot exceed 200 characters".into(),
        ));
    }
    Ok(())
}
