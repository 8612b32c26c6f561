use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{product, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::product::*;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Products",
    operation_id = "listProducts",
    summary = "List products",
    description = "Returns all products, alphabetically. Feeds the product selector in the \
        admin instruction forms.",
    responses(
        (status = 200, description = "Product list", body = ProductListResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<ProductListResponse>, AppError> {
    let products = product::Entity::find()
        .order_by_asc(product::Column::ProductName)
        .all(&state.db)
        .await?
        .into_iter()
        .map(ProductResponse::from)
        .collect();

    Ok(Json(ProductListResponse {
        success: true,
        products,
    }))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Products",
    operation_id = "createProduct",
    summary = "Create a product",
    description = "Minimal catalog entry. Requires the admin or employee role.",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductMutationResponse),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn create_product(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateProductRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_role(user::STAFF_ROLES)?;
    let (product_name, item_code) = validate_create_product(&payload)?;

    let new_product = product::ActiveModel {
        product_name: Set(product_name),
        item_code: Set(item_code),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let model = new_product.insert(&state.db).await?;

    Ok((
        StatusCode::CREATED,
        Json(ProductMutationResponse {
            success: true,
            message: "Product created".into(),
            product: ProductResponse::from(model),
        }),
    ))
}
