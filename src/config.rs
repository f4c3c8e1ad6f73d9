// src/config.rs

use crate::{
    db::{CatalogRepository, ClientRepository, PackRepository, PaymentRepository},
    services::{CatalogService, ClientService, PackService, PaymentService},
};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub client_service: ClientService,
    pub catalog_service: CatalogService,
    pub pack_service: PackService,
    pub payment_service: PaymentService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let client_repo = ClientRepository::new(db_pool.clone());
        let catalog_repo = CatalogRepository::new(db_pool.clone());
        let payment_repo = PaymentRepository::new(db_pool.clone());
        let pack_repo = PackRepository::new(db_pool.clone());

        let client_service = ClientService::new(client_repo.clone());
        let catalog_service = CatalogService::new(catalog_repo.clone());
        let payment_service = PaymentService::new(payment_repo.clone());
        let pack_service = PackService::new(pack_repo, payment_repo, client_repo, catalog_repo);

        Ok(Self {
            db_pool,
            client_service,
            catalog_service,
            pack_service,
            payment_service,
        })
    }
}
