// src/services/client_service.rs

use chrono::NaiveDate;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, db::ClientRepository, models::clients::Client};

#[derive(Clone)]
pub struct ClientService {
    repo: ClientRepository,
}

impl ClientService {
    pub fn new(repo: ClientRepository) -> Self {
        Self { repo }
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
        self.repo
            .create_client(executor, full_name, phone, email, birth_date, notes)
            .await
    }

    pub async fn list_clients<'e, E>(
        &self,
        executor: E,
        search: Option<&str>,
    ) -> Result<Vec<Client>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list_clients(executor, search).await
    }

    pub async fn get_client<'e, E>(&self, executor: E, client_id: Uuid) -> Result<Client, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .get_client(executor, client_id)
            .await?
            .ok_or(AppError::ClientNotFound)
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
    ) -> Result<Client, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .update_client(executor, client_id, full_name, phone, email, birth_date, notes)
            .await?
            .ok_or(AppError::ClientNotFound)
    }

    /// Soft-delete: o cliente some das listagens mas continua referenciável
    /// por ledgers e pagamentos antigos.
    pub async fn delete_client<'e, E>(&self, executor: E, client_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let deleted = self.repo.soft_delete_client(executor, client_id).await?;
        if !deleted {
            return Err(AppError::ClientNotFound);
        }
        Ok(())
    }
}
