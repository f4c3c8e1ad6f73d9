//src/main.rs

use axum::{
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod models;
mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Cadastro de clientes (+ histórico de pacotes do cliente)
    let client_routes = Router::new()
        .route(
            "/",
            post(handlers::clients::create_client).get(handlers::clients::list_clients),
        )
        .route(
            "/{id}",
            get(handlers::clients::get_client)
                .put(handlers::clients::update_client)
                .delete(handlers::clients::delete_client),
        )
        .route("/{id}/packs", get(handlers::packs::list_client_packs));

    // Catálogo de pacotes
    let catalog_routes = Router::new()
        .route(
            "/packs",
            post(handlers::catalog::create_pack_definition)
                .get(handlers::catalog::list_pack_definitions),
        )
        .route("/packs/{id}", put(handlers::catalog::update_pack_definition));

    // Pacotes vendidos: compra, sessões e ciclo de vida
    let pack_routes = Router::new()
        .route("/purchase", post(handlers::packs::purchase_pack))
        .route(
            "/{id}",
            get(handlers::packs::get_pack).delete(handlers::packs::delete_pack),
        )
        .route("/{id}/sessions", post(handlers::packs::consume_session))
        .route(
            "/sessions/{id}",
            put(handlers::packs::edit_session).delete(handlers::packs::delete_session),
        )
        .route("/{id}/restore", post(handlers::packs::restore_pack))
        .route("/{id}/suspend", post(handlers::packs::suspend_pack))
        .route("/{id}/reactivate", post(handlers::packs::reactivate_pack));

    // Pagamentos
    let payment_routes = Router::new()
        .route("/{id}", get(handlers::payments::get_payment))
        .route("/{id}/add", post(handlers::payments::add_payment));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/clients", client_routes)
        .nest("/api/catalog", catalog_routes)
        .nest("/api/packs", pack_routes)
        .nest("/api/payments", payment_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
