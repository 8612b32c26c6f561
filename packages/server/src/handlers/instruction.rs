use axum::Json;
use axum::extract::{DefaultBodyLimit, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::entity::{instruction, product, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::instruction::*;
use crate::models::shared::MessageResponse;
use crate::state::AppState;

/// Inline-encoded PDFs inflate by ~4/3; allow well past the service's
/// own upload ceiling so the error comes from one place.
pub fn upload_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(32 * 1024 * 1024) // 32 MB
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Instructions",
    operation_id = "createInstruction",
    summary = "Create an instruction",
    description = "Creates an instruction manual for a product: verifies the product exists, \
        uploads the inline-encoded PDF to the media service, then persists the record. \
        Requires the admin or employee role.",
    request_body = CreateInstructionRequest,
    responses(
        (status = 201, description = "Instruction created", body = InstructionMutationResponse),
        (status = 400, description = "Missing product, title or file", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Product not found", body = ErrorBody),
        (status = 502, description = "Media service failure", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn create_instruction(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateInstructionRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_role(user::STAFF_ROLES)?;
    let (product_id, title, file) = validate_create_instruction(&payload)?;

    // Existence check before the upload so a bad product id costs nothing.
    ensure_product_exists(&state.db, product_id).await?;

    let uploaded = state
        .media
        .upload(&file, &state.config.media.folder)
        .await?;

    let now = chrono::Utc::now();
    let new_instruction = instruction::ActiveModel {
        id: Set(Uuid::now_v7()),
        product_id: Set(product_id),
        title: Set(title),
        file_public_id: Set(uploaded.public_id),
        file_url: Set(uploaded.url),
        is_active: Set(true),
        created_by: Set(Some(auth_user.user_id)),
        updated_by: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let model = new_instruction.insert(&state.db).await?;

    Ok((
        StatusCode::CREATED,
        Json(InstructionMutationResponse {
            success: true,
            message: "Instruction created".into(),
            instruction: InstructionResponse::from_model(model, None),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Instructions",
    operation_id = "listInstructions",
    summary = "List instructions",
    description = "Returns all instructions, newest first, each with a partial view of its \
        product (name and item code). Optionally filtered to one product.",
    params(InstructionListQuery),
    responses(
        (status = 200, description = "Instruction list", body = InstructionListResponse),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_instructions(
    State(state): State<AppState>,
    Query(query): Query<InstructionListQuery>,
) -> Result<Json<InstructionListResponse>, AppError> {
    let mut select = instruction::Entity::find();
    if let Some(product_id) = query.product {
        select = select.filter(instruction::Column::ProductId.eq(product_id));
    }

    let rows = select
        .order_by_desc(instruction::Column::CreatedAt)
        .find_also_related(product::Entity)
        .all(&state.db)
        .await?;

    let instructions = rows
        .into_iter()
        .map(|(m, p)| InstructionResponse::from_model(m, p))
        .collect();

    Ok(Json(InstructionListResponse {
        success: true,
        instructions,
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Instructions",
    operation_id = "getInstruction",
    summary = "Get a single instruction",
    params(("id" = String, Path, description = "Instruction ID (UUID)")),
    responses(
        (status = 200, description = "Instruction", body = InstructionDetailResponse),
        (status = 404, description = "Instruction not found", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(instruction_id = %id))]
pub async fn get_instruction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<InstructionDetailResponse>, AppError> {
    let id = parse_instruction_id(&id)?;

    let (model, product) = instruction::Entity::find_by_id(id)
        .find_also_related(product::Entity)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Instruction not found".into()))?;

    Ok(Json(InstructionDetailResponse {
        success: true,
        instruction: InstructionResponse::from_model(model, product),
    }))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Instructions",
    operation_id = "updateInstruction",
    summary = "Update instruction metadata",
    description = "Updates title and/or product. A given product id must exist; the PDF is \
        untouched (see the file-replace operation). Requires the admin or employee role.",
    params(("id" = String, Path, description = "Instruction ID (UUID)")),
    request_body = UpdateInstructionRequest,
    responses(
        (status = 200, description = "Instruction updated", body = InstructionMutationResponse),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Product or instruction not found", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(instruction_id = %id, user_id = auth_user.user_id))]
pub async fn update_instruction(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateInstructionRequest>,
) -> Result<Json<InstructionMutationResponse>, AppError> {
    auth_user.require_role(user::STAFF_ROLES)?;
    let id = parse_instruction_id(&id)?;
    validate_update_instruction(&payload)?;

    if let Some(product_id) = payload.product {
        ensure_product_exists(&state.db, product_id).await?;
    }

    let model = find_instruction(&state.db, id).await?;

    let mut active: instruction::ActiveModel = model.into();
    if let Some(title) = payload.title {
        active.title = Set(title.trim().to_string());
    }
    if let Some(product_id) = payload.product {
        active.product_id = Set(product_id);
    }
    active.updated_by = Set(Some(auth_user.user_id));
    active.updated_at = Set(chrono::Utc::now());
    let model = active.update(&state.db).await?;

    Ok(Json(InstructionMutationResponse {
        success: true,
        message: "Instruction updated".into(),
        instruction: InstructionResponse::from_model(model, None),
    }))
}

#[utoipa::path(
    put,
    path = "/{id}/file",
    tag = "Instructions",
    operation_id = "replaceInstructionFile",
    summary = "Replace the PDF",
    description = "Deletes the current remote asset, uploads the new inline-encoded PDF and \
        persists the new file descriptor. Requires the admin or employee role.",
    params(("id" = String, Path, description = "Instruction ID (UUID)")),
    request_body = ReplaceFileRequest,
    responses(
        (status = 200, description = "File replaced", body = InstructionMutationResponse),
        (status = 400, description = "Missing file", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Instruction not found", body = ErrorBody),
        (status = 502, description = "Media service failure", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(instruction_id = %id, user_id = auth_user.user_id))]
pub async fn replace_instruction_file(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<ReplaceFileRequest>,
) -> Result<Json<InstructionMutationResponse>, AppError> {
    auth_user.require_role(user::STAFF_ROLES)?;
    let id = parse_instruction_id(&id)?;

    let file = match payload.file.as_deref() {
        Some(f) if !f.is_empty() => f,
        _ => return Err(AppError::Validation("File is required".into())),
    };

    let model = find_instruction(&state.db, id).await?;

    // Old asset goes first; a failed re-upload after this point leaves the
    // record pointing at a deleted asset. Known trade-off, kept as-is.
    if !model.file_public_id.is_empty() {
        let removed = state.media.delete(&model.file_public_id).await?;
        if !removed {
            warn!(public_id = %model.file_public_id, "remote asset was already gone");
        }
    }

    let uploaded = state
        .media
        .upload(file, &state.config.media.folder)
        .await?;

    let mut active: instruction::ActiveModel = model.into();
    active.file_public_id = Set(uploaded.public_id);
    active.file_url = Set(uploaded.url);
    active.updated_by = Set(Some(auth_user.user_id));
    active.updated_at = Set(chrono::Utc::now());
    let model = active.update(&state.db).await?;

    Ok(Json(InstructionMutationResponse {
        success: true,
        message: "File replaced".into(),
        instruction: InstructionResponse::from_model(model, None),
    }))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Instructions",
    operation_id = "deleteInstruction",
    summary = "Delete an instruction",
    description = "Deletes the remote PDF asset, then the record. \
        Requires the admin or employee role.",
    params(("id" = String, Path, description = "Instruction ID (UUID)")),
    responses(
        (status = 200, description = "Instruction deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Instruction not found", body = ErrorBody),
        (status = 502, description = "Media service failure", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(instruction_id = %id, user_id = auth_user.user_id))]
pub async fn delete_instruction(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    auth_user.require_role(user::STAFF_ROLES)?;
    let id = parse_instruction_id(&id)?;

    let model = find_instruction(&state.db, id).await?;

    if !model.file_public_id.is_empty() {
        let removed = state.media.delete(&model.file_public_id).await?;
        if !removed {
            warn!(public_id = %model.file_public_id, "remote asset was already gone");
        }
    }

    instruction::Entity::delete_by_id(id)
        .exec(&state.db)
        .await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Instruction deleted".into(),
    }))
}

fn parse_instruction_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::Validation("Invalid instruction ID".into()))
}

async fn find_instruction<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<instruction::Model, AppError> {
    instruction::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Instruction not found".into()))
}

async fn ensure_product_exists<C: ConnectionTrait>(db: &C, id: i32) -> Result<(), AppError> {
    product::Entity::find_by_id(id)
        .one(db)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::NotFound("Product not found".into()))
}
