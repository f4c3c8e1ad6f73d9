// src/models/clients.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    #[schema(example = "Maria da Silva")]
    pub full_name: String,

    #[schema(example = "+55 11 98888-7777")]
    pub phone: Option<String>,

    #[schema(example = "maria@email.com")]
    pub email: Option<String>,

    #[schema(value_type = Option<String>, format = Date, example = "1990-05-20")]
    pub birth_date: Option<NaiveDate>,

    pub notes: Option<String>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,

    // Soft-delete: clientes nunca são removidos fisicamente
    #[schema(ignore)]
    pub deleted_at: Option<DateTime<Utc>>,
}
