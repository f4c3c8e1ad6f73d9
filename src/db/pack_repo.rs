// src/db/pack_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::packs::{LedgerStatus, PackLedger, SessionEntry},
};

#[derive(Clone)]
pub struct PackRepository {
    pool: PgPool,
}

impl PackRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  LEDGERS (Pacotes vendidos)
    // =========================================================================

    pub async fn create_ledger<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
        pack_definition_id: Uuid,
        payment_id: Option<Uuid>,
        purchase_date: NaiveDate,
        expiration_date: NaiveDate,
        total_sessions: i32,
        amount_total: Decimal,
        amount_paid: Decimal,
    ) -> Result<PackLedger, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // Snapshot: total_sessions e valores são copiados da definição aqui
        // e nunca relidos do catálogo.
        let ledger = sqlx::query_as::<_, PackLedger>(
            r#"
            INSERT INTO pack_ledgers (
                client_id, pack_definition_id, payment_id,
                purchase_date, expiration_date,
                total_sessions, sessions_consumed, sessions_remaining,
                amount_total, amount_paid, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, 0, $6, $7, $8, 'IN_PROGRESS')
            RETURNING *
            "#,
        )
        .bind(client_id)
        .bind(pack_definition_id)
        .bind(payment_id)
        .bind(purchase_date)
        .bind(expiration_date)
        .bind(total_sessions)
        .bind(amount_total)
        .bind(amount_paid)
        .fetch_one(executor)
        .await?;

        Ok(ledger)
    }

    pub async fn get_ledger<'e, E>(
        &self,
        executor: E,
        ledger_id: Uuid,
    ) -> Result<Option<PackLedger>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ledger = sqlx::query_as::<_, PackLedger>(
            "SELECT * FROM pack_ledgers WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(ledger_id)
        .fetch_optional(executor)
        .await?;

        Ok(ledger)
    }

    /// Carrega travando a linha (FOR UPDATE). Toda mutação de contadores
    /// passa por aqui para serializar consumos/exclusões concorrentes.
    pub async fn get_ledger_for_update<'e, E>(
        &self,
        executor: E,
        ledger_id: Uuid,
    ) -> Result<Option<PackLedger>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ledger = sqlx::query_as::<_, PackLedger>(
            "SELECT * FROM pack_ledgers WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(ledger_id)
        .fetch_optional(executor)
        .await?;

        Ok(ledger)
    }

    /// Histórico do cliente: ativos e históricos, sem os tombstonados.
    pub async fn list_ledgers_by_client<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
    ) -> Result<Vec<PackLedger>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ledgers = sqlx::query_as::<_, PackLedger>(
            r#"
            SELECT * FROM pack_ledgers
            WHERE client_id = $1 AND deleted_at IS NULL
            ORDER BY purchase_date DESC, created_at DESC
            "#,
        )
        .bind(client_id)
        .fetch_all(executor)
        .await?;

        Ok(ledgers)
    }

    pub async fn update_ledger_counters<'e, E>(
        &self,
        executor: E,
        ledger_id: Uuid,
        sessions_consumed: i32,
        sessions_remaining: i32,
        status: LedgerStatus,
    ) -> Result<PackLedger, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ledger = sqlx::query_as::<_, PackLedger>(
            r#"
            UPDATE pack_ledgers
            SET sessions_consumed = $2, sessions_remaining = $3,
                status = $4, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(ledger_id)
        .bind(sessions_consumed)
        .bind(sessions_remaining)
        .bind(status)
        .fetch_one(executor)
        .await?;

        Ok(ledger)
    }

    pub async fn set_ledger_status<'e, E>(
        &self,
        executor: E,
        ledger_id: Uuid,
        status: LedgerStatus,
    ) -> Result<PackLedger, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ledger = sqlx::query_as::<_, PackLedger>(
            r#"
            UPDATE pack_ledgers
            SET status = $2, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(ledger_id)
        .bind(status)
        .fetch_one(executor)
        .await?;

        Ok(ledger)
    }

    pub async fn soft_delete_ledger<'e, E>(
        &self,
        executor: E,
        ledger_id: Uuid,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE pack_ledgers SET deleted_at = now() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(ledger_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Reverte o tombstone de um ledger excluído.
    pub async fn restore_ledger<'e, E>(
        &self,
        executor: E,
        ledger_id: Uuid,
    ) -> Result<Option<PackLedger>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ledger = sqlx::query_as::<_, PackLedger>(
            r#"
            UPDATE pack_ledgers
            SET deleted_at = NULL, updated_at = now()
            WHERE id = $1 AND deleted_at IS NOT NULL
            RETURNING *
            "#,
        )
        .bind(ledger_id)
        .fetch_optional(executor)
        .await?;

        Ok(ledger)
    }

    // =========================================================================
    //  SESSÕES
    // =========================================================================

    pub async fn create_session<'e, E>(
        &self,
        executor: E,
        pack_ledger_id: Uuid,
        appointment_id: Option<Uuid>,
        service_id: Option<Uuid>,
        session_date: NaiveDate,
        notes: Option<&str>,
    ) -> Result<SessionEntry, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let session = sqlx::query_as::<_, SessionEntry>(
            r#"
            INSERT INTO session_entries (
                pack_ledger_id, appointment_id, service_id, session_date, notes
            )
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(pack_ledger_id)
        .bind(appointment_id)
        .bind(service_id)
        .bind(session_date)
        .bind(notes)
        .fetch_one(executor)
        .await?;

        Ok(session)
    }

    pub async fn get_session<'e, E>(
        &self,
        executor: E,
        session_id: Uuid,
    ) -> Result<Option<SessionEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let session = sqlx::query_as::<_, SessionEntry>(
            "SELECT * FROM session_entries WHERE id = $1",
        )
        .bind(session_id)
        .fetch_optional(executor)
        .await?;

        Ok(session)
    }

    /// Edita data/serviço/observações. Não mexe nos contadores do ledger:
    /// editar uma sessão não muda quantas foram consumidas.
    pub async fn update_session<'e, E>(
        &self,
        executor: E,
        session_id: Uuid,
        session_date: NaiveDate,
        service_id: Option<Uuid>,
        notes: Option<&str>,
    ) -> Result<Option<SessionEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let session = sqlx::query_as::<_, SessionEntry>(
            r#"
            UPDATE session_entries
            SET session_date = $2, service_id = $3, notes = $4, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(session_id)
        .bind(session_date)
        .bind(service_id)
        .bind(notes)
        .fetch_optional(executor)
        .await?;

        Ok(session)
    }

    pub async fn delete_session<'e, E>(
        &self,
        executor: E,
        session_id: Uuid,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM session_entries WHERE id = $1")
            .bind(session_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Contagem autoritativa das sessões vivas do ledger. É a fonte da
    /// verdade para a recontagem de sessions_consumed.
    pub async fn count_sessions<'e, E>(
        &self,
        executor: E,
        pack_ledger_id: Uuid,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM session_entries WHERE pack_ledger_id = $1",
        )
        .bind(pack_ledger_id)
        .fetch_one(executor)
        .await?;

        Ok(count)
    }

    pub async fn list_sessions<'e, E>(
        &self,
        executor: E,
        pack_ledger_id: Uuid,
    ) -> Result<Vec<SessionEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sessions = sqlx::query_as::<_, SessionEntry>(
            r#"
            SELECT * FROM session_entries
            WHERE pack_ledger_id = $1
            ORDER BY session_date ASC, created_at ASC
            "#,
        )
        .bind(pack_ledger_id)
        .fetch_all(executor)
        .await?;

        Ok(sessions)
    }
}
