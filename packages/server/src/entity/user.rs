use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role new registrations receive.
pub const DEFAULT_ROLE: &str = "customer";

/// Roles allowed through the admin gates.
pub const STAFF_ROLES: &[&str] = &["admin", "employee"];

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub username: String,
    /// Argon2 hash, never the plaintext.
    pub password: String,
    /// One of: admin, employee, customer.
    pub role: String,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
