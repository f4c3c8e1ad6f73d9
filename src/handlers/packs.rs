// src/handlers/packs.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        packs::{PackLedger, PackLedgerDetail, SessionEntry},
        payments::PaymentMethod,
    },
};

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
pub struct PurchasePackPayload {
    pub client_id: Uuid,
    pub pack_definition_id: Uuid,

    #[schema(value_type = String, format = Date, example = "2026-08-30")]
    pub purchase_date: NaiveDate,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(example = "1000.00")]
    pub total_amount: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(example = "600.00")]
    pub amount_paid: Decimal,

    pub payment_method: PaymentMethod,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConsumeSessionPayload {
    #[schema(value_type = String, format = Date, example = "2026-09-02")]
    pub session_date: NaiveDate,

    pub service_id: Option<Uuid>,
    pub appointment_id: Option<Uuid>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditSessionPayload {
    #[schema(value_type = String, format = Date, example = "2026-09-03")]
    pub session_date: NaiveDate,

    pub service_id: Option<Uuid>,
    pub notes: Option<String>,
}

/// Resposta do consumo: o ledger atualizado e a sessão recém-criada.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConsumeSessionResponse {
    pub pack: PackLedgerDetail,
    pub session: SessionEntry,
}

// POST /api/packs/purchase
#[utoipa::path(
    post,
    path = "/api/packs/purchase",
    tag = "Pacotes",
    request_body = PurchasePackPayload,
    responses(
        (status = 201, description = "Pacote vendido (pagamento + ledger criados juntos)", body = PackLedgerDetail),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Cliente ou definição inexistente")
    )
)]
pub async fn purchase_pack(
    State(app_state): State<AppState>,
    Json(payload): Json<PurchasePackPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let detail = app_state
        .pack_service
        .purchase_pack(
            &app_state.db_pool,
            payload.client_id,
            payload.pack_definition_id,
            payload.purchase_date,
            payload.total_amount,
            payload.amount_paid,
            payload.payment_method,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(detail)))
}

// GET /api/packs/{id}
#[utoipa::path(
    get,
    path = "/api/packs/{id}",
    tag = "Pacotes",
    params(("id" = Uuid, Path, description = "ID do pacote vendido")),
    responses(
        (status = 200, description = "Pacote com pagamento e sessões", body = PackLedgerDetail),
        (status = 404, description = "Pacote não encontrado")
    )
)]
pub async fn get_pack(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state
        .pack_service
        .get_ledger_detail(&app_state.db_pool, id)
        .await?;

    Ok((StatusCode::OK, Json(detail)))
}

// GET /api/clients/{id}/packs
#[utoipa::path(
    get,
    path = "/api/clients/{id}/packs",
    tag = "Pacotes",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Histórico de pacotes do cliente", body = Vec<PackLedgerDetail>),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn list_client_packs(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let details = app_state
        .pack_service
        .list_client_packs(&app_state.db_pool, id)
        .await?;

    Ok((StatusCode::OK, Json(details)))
}

// POST /api/packs/{id}/sessions
#[utoipa::path(
    post,
    path = "/api/packs/{id}/sessions",
    tag = "Pacotes",
    params(("id" = Uuid, Path, description = "ID do pacote vendido")),
    request_body = ConsumeSessionPayload,
    responses(
        (status = 201, description = "Sessão consumida", body = ConsumeSessionResponse),
        (status = 404, description = "Pacote não encontrado"),
        (status = 409, description = "Sem sessões restantes ou pacote inativo")
    )
)]
pub async fn consume_session(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ConsumeSessionPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let (pack, session) = app_state
        .pack_service
        .consume_session(
            &app_state.db_pool,
            id,
            payload.session_date,
            payload.service_id,
            payload.appointment_id,
            payload.notes.as_deref(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ConsumeSessionResponse { pack, session }),
    ))
}

// PUT /api/packs/sessions/{id}
#[utoipa::path(
    put,
    path = "/api/packs/sessions/{id}",
    tag = "Pacotes",
    params(("id" = Uuid, Path, description = "ID da sessão")),
    request_body = EditSessionPayload,
    responses(
        (status = 200, description = "Sessão editada (contadores intactos)", body = SessionEntry),
        (status = 404, description = "Sessão não encontrada")
    )
)]
pub async fn edit_session(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<EditSessionPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let session = app_state
        .pack_service
        .edit_session(
            &app_state.db_pool,
            id,
            payload.session_date,
            payload.service_id,
            payload.notes.as_deref(),
        )
        .await?;

    Ok((StatusCode::OK, Json(session)))
}

// DELETE /api/packs/sessions/{id}
#[utoipa::path(
    delete,
    path = "/api/packs/sessions/{id}",
    tag = "Pacotes",
    params(("id" = Uuid, Path, description = "ID da sessão")),
    responses(
        (status = 200, description = "Sessão excluída; ledger recontado na mesma transação", body = PackLedgerDetail),
        (status = 404, description = "Sessão não encontrada")
    )
)]
pub async fn delete_session(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state
        .pack_service
        .delete_session(&app_state.db_pool, id)
        .await?;

    Ok((StatusCode::OK, Json(detail)))
}

// DELETE /api/packs/{id}
#[utoipa::path(
    delete,
    path = "/api/packs/{id}",
    tag = "Pacotes",
    params(("id" = Uuid, Path, description = "ID do pacote vendido")),
    responses(
        (status = 204, description = "Pacote marcado como excluído (recuperável)"),
        (status = 404, description = "Pacote não encontrado")
    )
)]
pub async fn delete_pack(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .pack_service
        .delete_ledger(&app_state.db_pool, id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// POST /api/packs/{id}/restore
#[utoipa::path(
    post,
    path = "/api/packs/{id}/restore",
    tag = "Pacotes",
    params(("id" = Uuid, Path, description = "ID do pacote vendido")),
    responses(
        (status = 200, description = "Pacote restaurado", body = PackLedger),
        (status = 404, description = "Pacote não encontrado ou não excluído")
    )
)]
pub async fn restore_pack(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let ledger = app_state
        .pack_service
        .restore_ledger(&app_state.db_pool, id)
        .await?;

    Ok((StatusCode::OK, Json(ledger)))
}

// POST /api/packs/{id}/suspend
#[utoipa::path(
    post,
    path = "/api/packs/{id}/suspend",
    tag = "Pacotes",
    params(("id" = Uuid, Path, description = "ID do pacote vendido")),
    responses(
        (status = 200, description = "Pacote suspenso", body = PackLedger),
        (status = 404, description = "Pacote não encontrado"),
        (status = 409, description = "Pacote não está em andamento")
    )
)]
pub async fn suspend_pack(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let ledger = app_state
        .pack_service
        .suspend_ledger(&app_state.db_pool, id)
        .await?;

    Ok((StatusCode::OK, Json(ledger)))
}

// POST /api/packs/{id}/reactivate
#[utoipa::path(
    post,
    path = "/api/packs/{id}/reactivate",
    tag = "Pacotes",
    params(("id" = Uuid, Path, description = "ID do pacote vendido")),
    responses(
        (status = 200, description = "Pacote reativado", body = PackLedger),
        (status = 404, description = "Pacote não encontrado"),
        (status = 409, description = "Status não permite reativação ou sem sessões restantes")
    )
)]
pub async fn reactivate_pack(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let ledger = app_state
        .pack_service
        .reactivate_ledger(&app_state.db_pool, id)
        .await?;

    Ok((StatusCode::OK, Json(ledger)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purchase_payload_rejects_negative_amounts() {
        let payload = PurchasePackPayload {
            client_id: Uuid::new_v4(),
            pack_definition_id: Uuid::new_v4(),
            purchase_date: NaiveDate::from_ymd_opt(2026, 8, 30).unwrap(),
            total_amount: Decimal::from(-10),
            amount_paid: Decimal::ZERO,
            payment_method: PaymentMethod::Cash,
        };

        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("total_amount"));
    }

    #[test]
    fn purchase_payload_accepts_zero_paid() {
        // Venda fiada: entrada zero é válida, o status do pagamento sai Unpaid
        let payload = PurchasePackPayload {
            client_id: Uuid::new_v4(),
            pack_definition_id: Uuid::new_v4(),
            purchase_date: NaiveDate::from_ymd_opt(2026, 8, 30).unwrap(),
            total_amount: Decimal::from(1000),
            amount_paid: Decimal::ZERO,
            payment_method: PaymentMethod::Card,
        };

        assert!(payload.validate().is_ok());
    }
}
