use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Cliente não encontrado")]
    ClientNotFound,

    #[error("Pacote do catálogo não encontrado")]
    PackDefinitionNotFound,

    #[error("Pacote vendido não encontrado")]
    LedgerNotFound,

    #[error("Sessão não encontrada")]
    SessionNotFound,

    #[error("Pagamento não encontrado")]
    PaymentNotFound,

    // Regras de negócio do ledger de pacotes
    #[error("Sem sessões restantes no pacote")]
    NoSessionsRemaining,

    #[error("Pacote não está ativo")]
    LedgerNotActive,

    // Variante para erros de banco de dados (a transação sofre rollback antes de chegar aqui)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::ClientNotFound => (StatusCode::NOT_FOUND, "Cliente não encontrado."),
            AppError::PackDefinitionNotFound => {
                (StatusCode::NOT_FOUND, "Pacote do catálogo não encontrado.")
            }
            AppError::LedgerNotFound => (StatusCode::NOT_FOUND, "Pacote vendido não encontrado."),
            AppError::SessionNotFound => (StatusCode::NOT_FOUND, "Sessão não encontrada."),
            AppError::PaymentNotFound => (StatusCode::NOT_FOUND, "Pagamento não encontrado."),

            // Pré-condições de negócio: o estado atual não permite a operação.
            AppError::NoSessionsRemaining => {
                (StatusCode::CONFLICT, "O pacote não possui sessões restantes.")
            }
            AppError::LedgerNotActive => (
                StatusCode::CONFLICT,
                "O pacote não está em andamento (concluído, vencido ou suspenso).",
            ),

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
