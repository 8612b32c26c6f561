use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/products", product_routes())
        .nest("/instructions", instruction_routes())
        .nest("/admin", admin_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::register))
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::me))
}

fn product_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::product::list_products))
}

/// Public read access: listing and single-record fetch.
fn instruction_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::instruction::list_instructions))
        .routes(routes!(handlers::instruction::get_instruction))
}

/// Staff-gated management routes. The role check itself lives in the
/// handlers; this nest just groups them under `/admin`.
fn admin_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest(
            "/products",
            OpenApiRouter::new().routes(routes!(handlers::product::create_product)),
        )
        .nest("/instructions", admin_instruction_routes())
}

fn admin_instruction_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::instruction::create_instruction))
        .routes(routes!(
            handlers::instruction::update_instruction,
            handlers::instruction::delete_instruction
        ))
        .routes(routes!(handlers::instruction::replace_instruction_file))
        .layer(handlers::instruction::upload_body_limit())
}
