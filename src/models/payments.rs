// src/models/payments.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_method", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,     // Dinheiro
    Card,     // Cartão
    Transfer, // Transferência / PIX
    Check,    // Cheque
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Unpaid,  // Nada pago
    Partial, // Pago parcialmente
    Paid,    // Quitado
}

impl PaymentStatus {
    /// Deriva o status a partir dos valores. Regra única para todo o sistema:
    /// Paid se não falta nada, Unpaid se nada foi pago, Partial no meio.
    pub fn derive(total_amount: Decimal, amount_paid: Decimal) -> Self {
        if amount_paid >= total_amount {
            PaymentStatus::Paid
        } else if amount_paid <= Decimal::ZERO {
            PaymentStatus::Unpaid
        } else {
            PaymentStatus::Partial
        }
    }
}

/// Quanto ainda falta pagar. Pagamento a maior não gera saldo negativo:
/// o resto é travado em zero (comportamento herdado do fluxo da recepção).
pub fn remainder_of(total_amount: Decimal, amount_paid: Decimal) -> Decimal {
    let rest = total_amount - amount_paid;
    if rest < Decimal::ZERO { Decimal::ZERO } else { rest }
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub id: Uuid,

    pub client_id: Uuid,

    #[schema(example = "1000.00")]
    pub total_amount: Decimal,

    #[schema(example = "600.00")]
    pub amount_paid: Decimal,

    // Derivado: total_amount - amount_paid, nunca negativo
    #[schema(example = "400.00")]
    pub remainder: Decimal,

    #[schema(value_type = String, format = Date, example = "2026-08-30")]
    pub payment_date: NaiveDate,

    pub method: PaymentMethod,
    pub status: PaymentStatus,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl PaymentRecord {
    /// Registra um pagamento adicional. `amount_paid` só cresce; o resto e o
    /// status são recalculados a partir dos novos valores.
    pub fn apply_payment(&mut self, amount: Decimal) {
        self.amount_paid += amount;
        self.remainder = remainder_of(self.total_amount, self.amount_paid);
        self.status = PaymentStatus::derive(self.total_amount, self.amount_paid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(v: i64) -> Decimal {
        Decimal::from(v)
    }

    fn record(total: i64, paid: i64) -> PaymentRecord {
        PaymentRecord {
            id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            total_amount: dec(total),
            amount_paid: dec(paid),
            remainder: remainder_of(dec(total), dec(paid)),
            payment_date: NaiveDate::from_ymd_opt(2026, 8, 30).unwrap(),
            method: PaymentMethod::Cash,
            status: PaymentStatus::derive(dec(total), dec(paid)),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn derives_partial_status_on_partial_payment() {
        // Compra de 1000 com entrada de 600
        let p = record(1000, 600);
        assert_eq!(p.remainder, dec(400));
        assert_eq!(p.status, PaymentStatus::Partial);
    }

    #[test]
    fn derives_unpaid_and_paid_extremes() {
        assert_eq!(record(1000, 0).status, PaymentStatus::Unpaid);
        assert_eq!(record(1000, 1000).status, PaymentStatus::Paid);
        assert_eq!(record(0, 0).status, PaymentStatus::Paid);
    }

    #[test]
    fn remainder_never_goes_negative() {
        assert_eq!(remainder_of(dec(1000), dec(1100)), Decimal::ZERO);
        assert_eq!(remainder_of(dec(1000), dec(400)), dec(600));
    }

    #[test]
    fn apply_payment_accumulates_and_requites() {
        let mut p = record(1000, 600);
        p.apply_payment(dec(300));
        assert_eq!(p.amount_paid, dec(900));
        assert_eq!(p.remainder, dec(100));
        assert_eq!(p.status, PaymentStatus::Partial);

        p.apply_payment(dec(100));
        assert_eq!(p.remainder, Decimal::ZERO);
        assert_eq!(p.status, PaymentStatus::Paid);
    }

    #[test]
    fn overpayment_clamps_remainder_to_zero() {
        // Pagamento a maior: 600 + 500 sobre um total de 1000
        let mut p = record(1000, 600);
        p.apply_payment(dec(500));
        assert_eq!(p.amount_paid, dec(1100));
        assert_eq!(p.remainder, Decimal::ZERO);
        assert_eq!(p.status, PaymentStatus::Paid);

        // Invariante: remainder == max(0, total - paid)
        assert_eq!(p.remainder, remainder_of(p.total_amount, p.amount_paid));
    }
}
