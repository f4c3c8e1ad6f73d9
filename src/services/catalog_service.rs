// src/services/catalog_service.rs

use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, db::CatalogRepository, models::catalog::PackDefinition};

#[derive(Clone)]
pub struct CatalogService {
    repo: CatalogRepository,
}

impl CatalogService {
    pub fn new(repo: CatalogRepository) -> Self {
        Self { repo }
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
        self.repo
            .create_definition(executor, name, price, total_sessions, validity_days)
            .await
    }

    pub async fn list_definitions<'e, E>(
        &self,
        executor: E,
        only_active: bool,
    ) -> Result<Vec<PackDefinition>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list_definitions(executor, only_active).await
    }

    /// Edição de catálogo. Não toca em pacotes já vendidos: o ledger guarda
    /// snapshot próprio de sessões e valores.
    pub async fn update_definition<'e, E>(
        &self,
        executor: E,
        definition_id: Uuid,
        name: &str,
        price: Decimal,
        total_sessions: i32,
        validity_days: i32,
        active: bool,
    ) -> Result<PackDefinition, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .update_definition(
                executor,
                definition_id,
                name,
                price,
                total_sessions,
                validity_days,
                active,
            )
            .await?
            .ok_or(AppError::PackDefinitionNotFound)
    }
}
