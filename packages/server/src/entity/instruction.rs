use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A product instruction manual: a catalog product paired with a
/// downloadable PDF held by the hosted media service.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "instruction")]
pub struct Model {
    /// UUIDv7 primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Must reference an existing product when set; not re-checked
    /// afterwards (no cascade if the product vanishes).
    pub product_id: i32,
    #[sea_orm(belongs_to, from = "product_id", to = "id")]
    pub product: HasOne<super::product::Entity>,

    pub title: String,

    /// Opaque identifier the media service assigned to the PDF. The
    /// remote asset's lifetime is tied to this row.
    pub file_public_id: String,
    /// Public URL of the PDF (`https?://...`).
    pub file_url: String,

    pub is_active: bool,

    /// Stamped from the authenticated user; not a relation, never joined.
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
