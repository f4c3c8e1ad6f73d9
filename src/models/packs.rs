// src/models/packs.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::payments::PaymentRecord;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "ledger_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LedgerStatus {
    InProgress, // Em andamento
    Completed,  // Todas as sessões consumidas
    Expired,    // Validade vencida
    Suspended,  // Suspenso manualmente
}

// --- Structs ---

/// Pacote vendido a um cliente. Guarda um snapshot da definição do catálogo
/// (total_sessions, valores) no momento da compra; edições posteriores no
/// catálogo não afetam este registro.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PackLedger {
    pub id: Uuid,
    pub client_id: Uuid,
    pub pack_definition_id: Uuid,
    pub payment_id: Option<Uuid>,

    #[schema(value_type = String, format = Date, example = "2026-08-30")]
    pub purchase_date: NaiveDate,

    // purchase_date + validity_days da definição, calculado na compra
    #[schema(value_type = String, format = Date, example = "2026-11-28")]
    pub expiration_date: NaiveDate,

    #[schema(example = 10)]
    pub total_sessions: i32,

    #[schema(example = 3)]
    pub sessions_consumed: i32,

    #[schema(example = 7)]
    pub sessions_remaining: i32,

    #[schema(example = "1000.00")]
    pub amount_total: Decimal,

    #[schema(example = "600.00")]
    pub amount_paid: Decimal,

    pub status: LedgerStatus,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,

    #[schema(ignore)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl PackLedger {
    /// Recalcula os contadores a partir da contagem autoritativa de sessões
    /// vivas (COUNT no banco), nunca por incremento/decremento cacheado.
    ///
    /// Transições de status:
    /// - InProgress -> Completed quando as sessões acabam;
    /// - Completed -> InProgress quando uma exclusão reabre saldo;
    /// - Expired/Suspended nunca mudam aqui (só por ação explícita).
    pub fn apply_session_count(&mut self, live_sessions: i64) {
        let consumed = (live_sessions.max(0) as i32).min(self.total_sessions);
        self.sessions_consumed = consumed;
        self.sessions_remaining = self.total_sessions - consumed;

        if self.sessions_remaining == 0 && self.status == LedgerStatus::InProgress {
            self.status = LedgerStatus::Completed;
        } else if self.sessions_remaining > 0 && self.status == LedgerStatus::Completed {
            self.status = LedgerStatus::InProgress;
        }
    }

    /// A validade venceu? Avaliada de forma preguiçosa nas mutações; não
    /// existe job de varredura marcando pacotes vencidos em lote.
    pub fn is_expired_on(&self, today: NaiveDate) -> bool {
        today > self.expiration_date
    }
}

/// Uma sessão consumida contra um pacote. Excluída fisicamente: a recontagem
/// do ledger usa o COUNT das sessões existentes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionEntry {
    pub id: Uuid,
    pub pack_ledger_id: Uuid,

    // Vínculos opcionais com a agenda e o catálogo de serviços
    pub appointment_id: Option<Uuid>,
    pub service_id: Option<Uuid>,

    #[schema(value_type = String, format = Date, example = "2026-09-02")]
    pub session_date: NaiveDate,

    pub notes: Option<String>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Resposta composta: o ledger com o pagamento e as sessões aninhadas,
/// como a tela de histórico do cliente consome.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PackLedgerDetail {
    #[serde(flatten)]
    pub ledger: PackLedger,
    pub payment: Option<PaymentRecord>,
    pub sessions: Vec<SessionEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn ledger(total: i32, consumed: i32, status: LedgerStatus) -> PackLedger {
        PackLedger {
            id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            pack_definition_id: Uuid::new_v4(),
            payment_id: None,
            purchase_date: NaiveDate::from_ymd_opt(2026, 8, 30).unwrap(),
            expiration_date: NaiveDate::from_ymd_opt(2026, 11, 28).unwrap(),
            total_sessions: total,
            sessions_consumed: consumed,
            sessions_remaining: total - consumed,
            amount_total: Decimal::from(1000),
            amount_paid: Decimal::from(600),
            status,
            created_at: None,
            updated_at: None,
            deleted_at: None,
        }
    }

    #[test]
    fn counters_always_sum_to_total() {
        let mut l = ledger(10, 0, LedgerStatus::InProgress);
        for live in 0..=10 {
            l.apply_session_count(live);
            assert_eq!(l.sessions_consumed + l.sessions_remaining, l.total_sessions);
        }
    }

    #[test]
    fn completes_when_last_session_is_consumed() {
        // Consome as 10 sessões uma a uma
        let mut l = ledger(10, 0, LedgerStatus::InProgress);
        for live in 1..=9 {
            l.apply_session_count(live);
            assert_eq!(l.status, LedgerStatus::InProgress);
        }
        l.apply_session_count(10);
        assert_eq!(l.sessions_remaining, 0);
        assert_eq!(l.status, LedgerStatus::Completed);
    }

    #[test]
    fn deleting_a_session_reopens_a_completed_pack() {
        let mut l = ledger(10, 10, LedgerStatus::Completed);
        l.apply_session_count(9);
        assert_eq!(l.sessions_consumed, 9);
        assert_eq!(l.sessions_remaining, 1);
        assert_eq!(l.status, LedgerStatus::InProgress);
    }

    #[test]
    fn expired_and_suspended_are_never_reopened_by_recount() {
        let mut expired = ledger(10, 10, LedgerStatus::Expired);
        expired.apply_session_count(9);
        assert_eq!(expired.status, LedgerStatus::Expired);

        let mut suspended = ledger(10, 5, LedgerStatus::Suspended);
        suspended.apply_session_count(4);
        assert_eq!(suspended.status, LedgerStatus::Suspended);
    }

    #[test]
    fn recount_is_idempotent() {
        let mut l = ledger(10, 3, LedgerStatus::InProgress);
        l.apply_session_count(7);
        let (c1, r1, s1) = (l.sessions_consumed, l.sessions_remaining, l.status);
        l.apply_session_count(7);
        assert_eq!((c1, r1, s1), (l.sessions_consumed, l.sessions_remaining, l.status));
    }

    #[test]
    fn recount_clamps_counters_into_range() {
        // Contagem acima do total não derruba o invariante dos contadores
        let mut l = ledger(10, 0, LedgerStatus::InProgress);
        l.apply_session_count(12);
        assert_eq!(l.sessions_consumed, 10);
        assert_eq!(l.sessions_remaining, 0);

        l.apply_session_count(-1);
        assert_eq!(l.sessions_consumed, 0);
        assert_eq!(l.sessions_remaining, 10);
    }

    #[test]
    fn expiration_is_exclusive_of_the_last_day() {
        let l = ledger(10, 0, LedgerStatus::InProgress);
        assert!(!l.is_expired_on(NaiveDate::from_ymd_opt(2026, 11, 28).unwrap()));
        assert!(l.is_expired_on(NaiveDate::from_ymd_opt(2026, 11, 29).unwrap()));
    }
}
