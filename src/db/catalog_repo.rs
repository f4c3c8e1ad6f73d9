// src/db/catalog_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::catalog::PackDefinition};

#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_definition<'e, E>(
        &self,
        executor: E,
        name: &str,
        price: Decimal,
        total_sessions: i32,
        validity_days: i32,
    ) -> Result<PackDefinition, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let definition = sqlx::query_as::<_, PackDefinition>(
            r#"
            INSERT INTO pack_definitions (name, price, total_sessions, validity_days)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(price)
        .bind(total_sessions)
        .bind(validity_days)
        .fetch_one(executor)
        .await?;

        Ok(definition)
    }

    pub async fn list_definitions<'e, E>(
        &self,
        executor: E,
        only_active: bool,
    ) -> Result<Vec<PackDefinition>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let definitions = sqlx::query_as::<_, PackDefinition>(
            r#"
            SELECT * FROM pack_definitions
            WHERE ($1 = FALSE OR active = TRUE)
            ORDER BY name ASC
            "#,
        )
        .bind(only_active)
        .fetch_all(executor)
        .await?;

        Ok(definitions)
    }

    pub async fn get_definition<'e, E>(
        &self,
        executor: E,
        definition_id: Uuid,
    ) -> Result<Option<PackDefinition>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let definition = sqlx::query_as::<_, PackDefinition>(
            "SELECT * FROM pack_definitions WHERE id = $1",
        )
        .bind(definition_id)
        .fetch_optional(executor)
        .await?;

        Ok(definition)
    }

    pub async fn update_definition<'e, E>(
        &self,
        executor: E,
        definition_id: Uuid,
        name: &str,
        price: Decimal,
        total_sessions: i32,
        validity_days: i32,
        active: bool,
    ) -> Result<Option<PackDefinition>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let definition = sqlx::query_as::<_, PackDefinition>(
            r#"
            UPDATE pack_definitions
            SET name = $2, price = $3, total_sessions = $4,
                validity_days = $5, active = $6, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(definition_id)
        .bind(name)
        .bind(price)
        .bind(total_sessions)
        .bind(validity_days)
        .bind(active)
        .fetch_optional(executor)
        .await?;

        Ok(definition)
    }
}
