use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::product;
use crate::error::AppError;

use super::shared::validate_title;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateProductRequest {
    pub product_name: Option<String>,
    pub item_code: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ProductResponse {
    pub id: i32,
    pub product_name: String,
    pub item_code: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ProductListResponse {
    pub success: bool,
    pub products: Vec<ProductResponse>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ProductMutationResponse {
    pub success: bool,
    pub message: String,
    pub product: ProductResponse,
}

impl From<product::Model> for ProductResponse {
    fn from(m: product::Model) -> Self {
        Self {
            id: m.id,
            product_name: m.product_name,
            item_code: m.item_code,
            created_at: m.created_at,
        }
    }
}

/// Check the create payload and hand back the cleaned fields.
pub fn validate_create_product(
    req: &CreateProductRequest,
) -> Result<(String, Option<String>), AppError> {
    let Some(name) = req.product_name.as_deref() else {
        return Err(AppError::Validation("Please provide product name".into()));
    };
    validate_title(name)
        .map_err(|_| AppError::Validation("Product name must be 1-200 characters".into()))?;

    let item_code = req
        .item_code
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);

    Ok((name.trim().to_string(), item_code))
}
