use sea_orm::sea_query::{Index, PostgresQueryBuilder};
use sea_orm::*;

use crate::entity::instruction;

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync doesn't support composite non-unique indexes,
/// so we create them manually on startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Composite index for the product-filtered, newest-first listing:
    // SELECT ... FROM instruction WHERE product_id = ? ORDER BY created_at DESC
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_instruction_product_created")
        .table(instruction::Entity)
        .col(instruction::Column::ProductId)
        .col(instruction::Column::CreatedAt)
        .to_string(PostgresQueryBuilder);

    db.execute_unprepared(&stmt).await?;

    Ok(())
}
