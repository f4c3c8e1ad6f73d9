// src/handlers/payments.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    config::AppState,
    models::payments::{PaymentMethod, PaymentRecord},
};

// ---
// Validação customizada
// ---
fn validate_positive(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() || val.is_zero() {
        let mut err = ValidationError::new("range");
        err.add_param("exclusive_min".into(), &0.0);
        err.message = Some("O valor precisa ser maior que zero.".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddPaymentPayload {
    #[validate(custom(function = "validate_positive"))]
    #[schema(example = "500.00")]
    pub amount: Decimal,

    pub method: PaymentMethod,
}

// POST /api/payments/{id}/add
#[utoipa::path(
    post,
    path = "/api/payments/{id}/add",
    tag = "Pagamentos",
    params(("id" = Uuid, Path, description = "ID do registro de pagamento")),
    request_body = AddPaymentPayload,
    responses(
        (status = 200, description = "Pagamento acrescentado; resto e status recalculados", body = PaymentRecord),
        (status = 400, description = "Valor inválido"),
        (status = 404, description = "Pagamento não encontrado")
    )
)]
pub async fn add_payment(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddPaymentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let payment = app_state
        .payment_service
        .add_payment(&app_state.db_pool, id, payload.amount, payload.method)
        .await?;

    Ok((StatusCode::OK, Json(payment)))
}

// GET /api/payments/{id}
#[utoipa::path(
    get,
    path = "/api/payments/{id}",
    tag = "Pagamentos",
    params(("id" = Uuid, Path, description = "ID do registro de pagamento")),
    responses(
        (status = 200, description = "Registro de pagamento", body = PaymentRecord),
        (status = 404, description = "Pagamento não encontrado")
    )
)]
pub async fn get_payment(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let payment = app_state
        .payment_service
        .get_payment(&app_state.db_pool, id)
        .await?;

    Ok((StatusCode::OK, Json(payment)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_payment_payload_rejects_zero_and_negative() {
        for amount in [Decimal::ZERO, Decimal::from(-50)] {
            let payload = AddPaymentPayload {
                amount,
                method: PaymentMethod::Cash,
            };
            let errors = payload.validate().unwrap_err();
            assert!(errors.field_errors().contains_key("amount"));
        }
    }
}
