// src/db/payment_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::payments::{PaymentMethod, PaymentRecord, PaymentStatus},
};

#[derive(Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_payment<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
        total_amount: Decimal,
        amount_paid: Decimal,
        remainder: Decimal,
        payment_date: NaiveDate,
        method: PaymentMethod,
        status: PaymentStatus,
    ) -> Result<PaymentRecord, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, PaymentRecord>(
            r#"
            INSERT INTO payment_records (
                client_id, total_amount, amount_paid, remainder,
                payment_date, method, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(client_id)
        .bind(total_amount)
        .bind(amount_paid)
        .bind(remainder)
        .bind(payment_date)
        .bind(method)
        .bind(status)
        .fetch_one(executor)
        .await?;

        Ok(payment)
    }

    pub async fn get_payment<'e, E>(
        &self,
        executor: E,
        payment_id: Uuid,
    ) -> Result<Option<PaymentRecord>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, PaymentRecord>(
            "SELECT * FROM payment_records WHERE id = $1",
        )
        .bind(payment_id)
        .fetch_optional(executor)
        .await?;

        Ok(payment)
    }

    /// Carrega travando a linha (FOR UPDATE). Serializa "adicionar pagamento"
    /// concorrentes sobre o mesmo registro.
    pub async fn get_payment_for_update<'e, E>(
        &self,
        executor: E,
        payment_id: Uuid,
    ) -> Result<Option<PaymentRecord>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, PaymentRecord>(
            "SELECT * FROM payment_records WHERE id = $1 FOR UPDATE",
        )
        .bind(payment_id)
        .fetch_optional(executor)
        .await?;

        Ok(payment)
    }

    /// Persiste os valores recalculados. O `method` registrado passa a ser o
    /// da última entrada de pagamento.
    pub async fn update_payment_amounts<'e, E>(
        &self,
        executor: E,
        payment_id: Uuid,
        amount_paid: Decimal,
        remainder: Decimal,
        status: PaymentStatus,
        method: PaymentMethod,
    ) -> Result<PaymentRecord, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, PaymentRecord>(
            r#"
            UPDATE payment_records
            SET amount_paid = $2, remainder = $3, status = $4,
                method = $5, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(payment_id)
        .bind(amount_paid)
        .bind(remainder)
        .bind(status)
        .bind(method)
        .fetch_one(executor)
        .await?;

        Ok(payment)
    }
}
