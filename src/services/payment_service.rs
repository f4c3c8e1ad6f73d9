// src/services/payment_service.rs

use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::PaymentRepository,
    models::payments::{PaymentMethod, PaymentRecord},
};

#[derive(Clone)]
pub struct PaymentService {
    payment_repo: PaymentRepository,
}

impl PaymentService {
    pub fn new(payment_repo: PaymentRepository) -> Self {
        Self { payment_repo }
    }

    /// Acrescenta um pagamento a um registro existente. `amount_paid` só
    /// cresce; resto e status são recalculados e persistidos na mesma
    /// transação que trava a linha.
    ///
    /// Pagamento a maior não é barrado: o resto trava em zero e o status
    /// vira Paid (comportamento herdado da recepção).
    pub async fn add_payment<'e, E>(
        &self,
        executor: E,
        payment_id: Uuid,
        amount: Decimal,
        method: PaymentMethod,
    ) -> Result<PaymentRecord, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let mut payment = self
            .payment_repo
            .get_payment_for_update(&mut *tx, payment_id)
            .await?
            .ok_or(AppError::PaymentNotFound)?;

        payment.apply_payment(amount);

        let updated = self
            .payment_repo
            .update_payment_amounts(
                &mut *tx,
                payment.id,
                payment.amount_paid,
                payment.remainder,
                payment.status,
                method,
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Pagamento {} recebeu +{} (resto: {})",
            updated.id,
            amount,
            updated.remainder
        );

        Ok(updated)
    }

    pub async fn get_payment<'e, E>(
        &self,
        executor: E,
        payment_id: Uuid,
    ) -> Result<PaymentRecord, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.payment_repo
            .get_payment(executor, payment_id)
            .await?
            .ok_or(AppError::PaymentNotFound)
    }
}
