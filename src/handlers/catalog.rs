// src/handlers/catalog.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{common::error::AppError, config::AppState, models::catalog::PackDefinition};

// ---
// Validação customizada
// ---
fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePackDefinitionPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Pacote Massagem 10x")]
    pub name: String,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(example = "1000.00")]
    pub price: Decimal,

    #[validate(range(min = 1, message = "O pacote precisa de ao menos 1 sessão."))]
    #[schema(example = 10)]
    pub total_sessions: i32,

    #[validate(range(min = 1, message = "A validade mínima é de 1 dia."))]
    #[schema(example = 90)]
    pub validity_days: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePackDefinitionPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    #[validate(custom(function = "validate_not_negative"))]
    pub price: Decimal,

    #[validate(range(min = 1, message = "O pacote precisa de ao menos 1 sessão."))]
    pub total_sessions: i32,

    #[validate(range(min = 1, message = "A validade mínima é de 1 dia."))]
    pub validity_days: i32,

    #[schema(example = true)]
    pub active: bool,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CatalogQuery {
    /// Quando true, só definições ainda à venda
    #[serde(default)]
    pub only_active: bool,
}

// POST /api/catalog/packs
#[utoipa::path(
    post,
    path = "/api/catalog/packs",
    tag = "Catálogo",
    request_body = CreatePackDefinitionPayload,
    responses(
        (status = 201, description = "Definição de pacote criada", body = PackDefinition),
        (status = 400, description = "Dados inválidos")
    )
)]
pub async fn create_pack_definition(
    State(app_state): State<AppState>,
    Json(payload): Json<CreatePackDefinitionPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let definition = app_state
        .catalog_service
        .create_definition(
            &app_state.db_pool,
            &payload.name,
            payload.price,
            payload.total_sessions,
            payload.validity_days,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(definition)))
}

// GET /api/catalog/packs
#[utoipa::path(
    get,
    path = "/api/catalog/packs",
    tag = "Catálogo",
    params(CatalogQuery),
    responses(
        (status = 200, description = "Definições de pacote", body = Vec<PackDefinition>)
    )
)]
pub async fn list_pack_definitions(
    State(app_state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<impl IntoResponse, AppError> {
    let definitions = app_state
        .catalog_service
        .list_definitions(&app_state.db_pool, query.only_active)
        .await?;

    Ok((StatusCode::OK, Json(definitions)))
}

// PUT /api/catalog/packs/{id}
#[utoipa::path(
    put,
    path = "/api/catalog/packs/{id}",
    tag = "Catálogo",
    params(("id" = Uuid, Path, description = "ID da definição")),
    request_body = UpdatePackDefinitionPayload,
    responses(
        (status = 200, description = "Definição atualizada (não retroage em pacotes vendidos)", body = PackDefinition),
        (status = 404, description = "Definição não encontrada")
    )
)]
pub async fn update_pack_definition(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePackDefinitionPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let definition = app_state
        .catalog_service
        .update_definition(
            &app_state.db_pool,
            id,
            &payload.name,
            payload.price,
            payload.total_sessions,
            payload.validity_days,
            payload.active,
        )
        .await?;

    Ok((StatusCode::OK, Json(definition)))
}
