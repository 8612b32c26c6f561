use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Catalog product stub. The real catalog lives elsewhere in the
/// application; instructions only need the fields their views project.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub product_name: String,
    /// Vendor item code shown next to the name in admin views.
    pub item_code: Option<String>,

    #[sea_orm(has_many)]
    pub instructions: HasMany<super::instruction::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
