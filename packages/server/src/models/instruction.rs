use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{instruction, product};
use crate::error::AppError;

use super::shared::validate_title;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateInstructionRequest {
    /// Product the manual belongs to.
    pub product: Option<i32>,
    pub title: Option<String>,
    /// Inline-encoded PDF (`data:application/pdf;base64,...`).
    pub file: Option<String>,
}

#[derive(Deserialize, Default, utoipa::ToSchema)]
pub struct UpdateInstructionRequest {
    pub title: Option<String>,
    pub product: Option<i32>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct ReplaceFileRequest {
    /// Inline-encoded PDF replacing the current one.
    pub file: Option<String>,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct InstructionListQuery {
    /// Restrict the listing to one product.
    pub product: Option<i32>,
}

/// The persisted file descriptor: opaque storage identifier plus the
/// public URL.
#[derive(Serialize, utoipa::ToSchema)]
pub struct FileDescriptor {
    pub public_id: String,
    pub url: String,
}

/// Partial product view projected into instruction reads.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ProductBrief {
    pub id: i32,
    pub product_name: String,
    pub item_code: Option<String>,
}

/// Product reference: the projected product on reads, the plain id on
/// mutation responses (which don't join).
#[derive(Serialize, utoipa::ToSchema)]
#[serde(untagged)]
pub enum ProductRef {
    Id(i32),
    Brief(ProductBrief),
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct InstructionResponse {
    pub id: String,
    pub product: ProductRef,
    pub title: String,
    pub file: FileDescriptor,
    pub is_active: bool,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InstructionResponse {
    pub fn from_model(m: instruction::Model, product: Option<product::Model>) -> Self {
        let product = match product {
            Some(p) => ProductRef::Brief(ProductBrief {
                id: p.id,
                product_name: p.product_name,
                item_code: p.item_code,
            }),
            None => ProductRef::Id(m.product_id),
        };
        Self {
            id: m.id.to_string(),
            product,
            title: m.title,
            file: FileDescriptor {
                public_id: m.file_public_id,
                url: m.file_url,
            },
            is_active: m.is_active,
            created_by: m.created_by,
            updated_by: m.updated_by,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct InstructionListResponse {
    pub success: bool,
    pub instructions: Vec<InstructionResponse>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct InstructionDetailResponse {
    pub success: bool,
    pub instruction: InstructionResponse,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct InstructionMutationResponse {
    pub success: bool,
    pub message: String,
    pub instruction: InstructionResponse,
}

/// Check the create payload and hand back the required fields.
pub fn validate_create_instruction(
    req: &CreateInstructionRequest,
) -> Result<(i32, String, String), AppError> {
    let (Some(product), Some(title), Some(file)) =
        (req.product, req.title.as_deref(), req.file.as_deref())
    else {
        return Err(AppError::Validation(
            "Product, title and file are required".into(),
        ));
    };

    if title.is_empty() || file.is_empty() {
        return Err(AppError::Validation(
            "Product, title and file are required".into(),
        ));
    }

    validate_title(title)?;

    Ok((product, title.trim().to_string(), file.to_string()))
}

pub fn validate_update_instruction(req: &UpdateInstructionRequest) -> Result<(), AppError> {
    if let Some(ref title) = req.title {
        validate_title(title)?;
    }
    Ok(())
}
