// src/models/catalog.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Definição de pacote no catálogo. Editar o catálogo nunca altera
/// pacotes já vendidos: o ledger guarda um snapshot no momento da venda.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PackDefinition {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440001")]
    pub id: Uuid,

    #[schema(example = "Pacote Massagem 10x")]
    pub name: String,

    #[schema(example = "1000.00")]
    pub price: Decimal,

    #[schema(example = 10)]
    pub total_sessions: i32,

    #[schema(example = 90)]
    pub validity_days: i32,

    #[schema(example = true)]
    pub active: bool,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
