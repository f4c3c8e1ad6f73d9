// src/db/client_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::clients::Client};

#[derive(Clone)]
pub struct ClientRepository {
    pool: PgPool,
}

impl ClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_client<'e, E>(
        &self,
        executor: E,
        full_name: &str,
        phone: Option<&str>,
        email: Option<&str>,
        birth_date: Option<NaiveDate>,
        notes: Option<&str>,
    ) -> Result<Client, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let client = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (full_name, phone, email, birth_date, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(full_name)
        .bind(phone)
        .bind(email)
        .bind(birth_date)
        .bind(notes)
        .fetch_one(executor)
        .await?;

        Ok(client)
    }

    /// Lista clientes vivos; `search` filtra por nome ou telefone.
    pub async fn list_clients<'e, E>(
        &self,
        executor: E,
        search: Option<&str>,
    ) -> Result<Vec<Client>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let pattern = search.map(|s| format!("%{}%", s));

        let clients = sqlx::query_as::<_, Client>(
            r#"
            SELECT * FROM clients
            WHERE deleted_at IS NULL
              AND ($1::TEXT IS NULL OR full_name ILIKE $1 OR phone ILIKE $1)
            ORDER BY full_name ASC
            "#,
        )
        .bind(pattern)
        .fetch_all(executor)
        .await?;

        Ok(clients)
    }

    pub async fn get_client<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
    ) -> Result<Option<Client>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let client = sqlx::query_as::<_, Client>(
            "SELECT * FROM clients WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(client_id)
        .fetch_optional(executor)
        .await?;

        Ok(client)
    }

    pub async fn update_client<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
        full_name: &str,
        phone: Option<&str>,
        email: Option<&str>,
        birth_date: Option<NaiveDate>,
        notes: Option<&str>,
    ) -> Result<Option<Client>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let client = sqlx::query_as::<_, Client>(
            r#"
            UPDATE clients
            SET full_name = $2, phone = $3, email = $4, birth_date = $5,
                notes = $6, updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(client_id)
        .bind(full_name)
        .bind(phone)
        .bind(email)
        .bind(birth_date)
        .bind(notes)
        .fetch_optional(executor)
        .await?;

        Ok(client)
    }

    /// Soft-delete: marca o tombstone; ledgers e pagamentos continuam
    /// referenciando o registro.
    pub async fn soft_delete_client<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE clients SET deleted_at = now() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(client_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
