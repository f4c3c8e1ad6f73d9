// src/docs.rs

use crate::handlers;
use crate::models;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Clientes ---
        handlers::clients::create_client,
        handlers::clients::list_clients,
        handlers::clients::get_client,
        handlers::clients::update_client,
        handlers::clients::delete_client,

        // --- Catálogo ---
        handlers::catalog::create_pack_definition,
        handlers::catalog::list_pack_definitions,
        handlers::catalog::update_pack_definition,

        // --- Pacotes ---
        handlers::packs::purchase_pack,
        handlers::packs::get_pack,
        handlers::packs::list_client_packs,
        handlers::packs::consume_session,
        handlers::packs::edit_session,
        handlers::packs::delete_session,
        handlers::packs::delete_pack,
        handlers::packs::restore_pack,
        handlers::packs::suspend_pack,
        handlers::packs::reactivate_pack,

        // --- Pagamentos ---
        handlers::payments::add_payment,
        handlers::payments::get_payment,
    ),
    components(
        schemas(
            // --- Clientes ---
            models::clients::Client,
            handlers::clients::CreateClientPayload,

            // --- Catálogo ---
            models::catalog::PackDefinition,
            handlers::catalog::CreatePackDefinitionPayload,
            handlers::catalog::UpdatePackDefinitionPayload,

            // --- Pacotes ---
            models::packs::LedgerStatus,
            models::packs::PackLedger,
            models::packs::SessionEntry,
            models::packs::PackLedgerDetail,
            handlers::packs::PurchasePackPayload,
            handlers::packs::ConsumeSessionPayload,
            handlers::packs::EditSessionPayload,
            handlers::packs::ConsumeSessionResponse,

            // --- Pagamentos ---
            models::payments::PaymentMethod,
            models::payments::PaymentStatus,
            models::payments::PaymentRecord,
            handlers::payments::AddPaymentPayload,
        )
    ),
    tags(
        (name = "Clientes", description = "Cadastro de Clientes"),
        (name = "Catálogo", description = "Definições de Pacotes à Venda"),
        (name = "Pacotes", description = "Pacotes Vendidos e Consumo de Sessões"),
        (name = "Pagamentos", description = "Registros de Pagamento e Quitações")
    )
)]
pub struct ApiDoc;
