// src/services/pack_service.rs

use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CatalogRepository, ClientRepository, PackRepository, PaymentRepository},
    models::{
        packs::{LedgerStatus, PackLedger, PackLedgerDetail, SessionEntry},
        payments::{remainder_of, PaymentMethod, PaymentStatus},
    },
};

/// O que impede um consumo. A ordem de avaliação importa: saldo de sessões
/// vem antes de qualquer checagem de status ("first failure wins").
#[derive(Debug, PartialEq, Eq)]
enum ConsumeBlock {
    NoSessionsRemaining,
    // InProgress com validade vencida: precisa ser marcado Expired antes de recusar
    JustExpired,
    NotActive,
}

fn check_consume(ledger: &PackLedger, today: NaiveDate) -> Option<ConsumeBlock> {
    if ledger.sessions_remaining <= 0 {
        Some(ConsumeBlock::NoSessionsRemaining)
    } else if ledger.status == LedgerStatus::InProgress && ledger.is_expired_on(today) {
        Some(ConsumeBlock::JustExpired)
    } else if ledger.status != LedgerStatus::InProgress {
        Some(ConsumeBlock::NotActive)
    } else {
        None
    }
}

#[derive(Clone)]
pub struct PackService {
    pack_repo: PackRepository,
    payment_repo: PaymentRepository,
    client_repo: ClientRepository,
    catalog_repo: CatalogRepository,
}

impl PackService {
    pub fn new(
        pack_repo: PackRepository,
        payment_repo: PaymentRepository,
        client_repo: ClientRepository,
        catalog_repo: CatalogRepository,
    ) -> Self {
        Self {
            pack_repo,
            payment_repo,
            client_repo,
            catalog_repo,
        }
    }

    // Helper para erro de validação em campos que o `validator` não alcança
    fn validation_error(field: &str, code: &'static str, message: &str) -> AppError {
        let mut errors = validator::ValidationErrors::new();
        let mut err = validator::ValidationError::new(code);
        err.message = Some(message.to_string().into());

        // Leak seguro para erro estático
        let static_field: &'static str = Box::leak(field.to_string().into_boxed_str());
        errors.add(static_field.into(), err);

        AppError::ValidationError(errors)
    }

    // =========================================================================
    //  COMPRA DE PACOTE
    // =========================================================================

    /// Venda de um pacote: cria o registro de pagamento e o ledger como uma
    /// unidade atômica. Se qualquer passo falhar, nenhum dos dois existe.
    pub async fn purchase_pack<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
        pack_definition_id: Uuid,
        purchase_date: NaiveDate,
        total_amount: Decimal,
        amount_paid: Decimal,
        payment_method: PaymentMethod,
    ) -> Result<PackLedgerDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        // 1. Referências precisam existir e estar vivas
        self.client_repo
            .get_client(&mut *tx, client_id)
            .await?
            .ok_or(AppError::ClientNotFound)?;

        let definition = self
            .catalog_repo
            .get_definition(&mut *tx, pack_definition_id)
            .await?
            .ok_or(AppError::PackDefinitionNotFound)?;

        if !definition.active {
            return Err(Self::validation_error(
                "packDefinitionId",
                "inactive",
                "O pacote não está mais à venda.",
            ));
        }

        // 2. Registro de pagamento com resto e status derivados
        let remainder = remainder_of(total_amount, amount_paid);
        let status = PaymentStatus::derive(total_amount, amount_paid);

        let payment = self
            .payment_repo
            .create_payment(
                &mut *tx,
                client_id,
                total_amount,
                amount_paid,
                remainder,
                purchase_date,
                payment_method,
                status,
            )
            .await?;

        // 3. Ledger com snapshot da definição (edições futuras no catálogo
        //    não mexem em pacotes já vendidos)
        let expiration_date = purchase_date + Duration::days(definition.validity_days as i64);

        let ledger = self
            .pack_repo
            .create_ledger(
                &mut *tx,
                client_id,
                pack_definition_id,
                Some(payment.id),
                purchase_date,
                expiration_date,
                definition.total_sessions,
                total_amount,
                amount_paid,
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Pacote vendido: ledger {} para o cliente {} ({} sessões)",
            ledger.id,
            client_id,
            ledger.total_sessions
        );

        Ok(PackLedgerDetail {
            ledger,
            payment: Some(payment),
            sessions: Vec::new(),
        })
    }

    // =========================================================================
    //  SESSÕES
    // =========================================================================

    /// Consome uma sessão do pacote. Pré-condições na ordem do fluxo da
    /// recepção: primeiro o saldo de sessões, depois o status. Os contadores
    /// são recalculados a partir do COUNT das sessões vivas, dentro da mesma
    /// transação que trava a linha do ledger.
    pub async fn consume_session<'e, E>(
        &self,
        executor: E,
        ledger_id: Uuid,
        session_date: NaiveDate,
        service_id: Option<Uuid>,
        appointment_id: Option<Uuid>,
        notes: Option<&str>,
    ) -> Result<(PackLedgerDetail, SessionEntry), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let mut ledger = self
            .pack_repo
            .get_ledger_for_update(&mut *tx, ledger_id)
            .await?
            .ok_or(AppError::LedgerNotFound)?;

        let today = Utc::now().date_naive();
        match check_consume(&ledger, today) {
            Some(ConsumeBlock::NoSessionsRemaining) => {
                return Err(AppError::NoSessionsRemaining);
            }
            // Vencimento preguiçoso: não há varredura em lote, então um
            // pacote InProgress cuja validade passou é marcado como Expired
            // aqui e o consumo é recusado.
            Some(ConsumeBlock::JustExpired) => {
                self.pack_repo
                    .set_ledger_status(&mut *tx, ledger.id, LedgerStatus::Expired)
                    .await?;
                tx.commit().await?;

                tracing::info!("Pacote {} venceu em {}", ledger.id, ledger.expiration_date);
                return Err(AppError::LedgerNotActive);
            }
            // Completed/Expired/Suspended não consomem
            Some(ConsumeBlock::NotActive) => {
                return Err(AppError::LedgerNotActive);
            }
            None => {}
        }

        let session = self
            .pack_repo
            .create_session(
                &mut *tx,
                ledger.id,
                appointment_id,
                service_id,
                session_date,
                notes,
            )
            .await?;

        // Recontagem a partir da fonte da verdade, nunca incremento cego
        let live = self.pack_repo.count_sessions(&mut *tx, ledger.id).await?;
        ledger.apply_session_count(live);

        let updated = self
            .pack_repo
            .update_ledger_counters(
                &mut *tx,
                ledger.id,
                ledger.sessions_consumed,
                ledger.sessions_remaining,
                ledger.status,
            )
            .await?;

        let detail = self.load_detail(&mut *tx, updated).await?;

        tx.commit().await?;

        Ok((detail, session))
    }

    /// Edita data/serviço/observações de uma sessão. Não altera contadores:
    /// a sessão continua contando como consumida.
    pub async fn edit_session<'e, E>(
        &self,
        executor: E,
        session_id: Uuid,
        session_date: NaiveDate,
        service_id: Option<Uuid>,
        notes: Option<&str>,
    ) -> Result<SessionEntry, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.pack_repo
            .update_session(executor, session_id, session_date, service_id, notes)
            .await?
            .ok_or(AppError::SessionNotFound)
    }

    /// Exclui uma sessão e reconta o ledger na mesma transação. A exclusão é
    /// física; a recontagem usa o COUNT das sessões que sobraram, então rodar
    /// de novo sem outra mutação dá o mesmo resultado. Um pacote Completed
    /// que recupera saldo volta para InProgress; Expired/Suspended ficam
    /// como estão.
    pub async fn delete_session<'e, E>(
        &self,
        executor: E,
        session_id: Uuid,
    ) -> Result<PackLedgerDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let session = self
            .pack_repo
            .get_session(&mut *tx, session_id)
            .await?
            .ok_or(AppError::SessionNotFound)?;

        // Trava o ledger antes de mexer nas sessões dele
        let mut ledger = self
            .pack_repo
            .get_ledger_for_update(&mut *tx, session.pack_ledger_id)
            .await?
            .ok_or(AppError::LedgerNotFound)?;

        self.pack_repo.delete_session(&mut *tx, session_id).await?;

        let live = self.pack_repo.count_sessions(&mut *tx, ledger.id).await?;
        ledger.apply_session_count(live);

        let updated = self
            .pack_repo
            .update_ledger_counters(
                &mut *tx,
                ledger.id,
                ledger.sessions_consumed,
                ledger.sessions_remaining,
                ledger.status,
            )
            .await?;

        let detail = self.load_detail(&mut *tx, updated).await?;

        tx.commit().await?;

        Ok(detail)
    }

    // =========================================================================
    //  LEITURAS
    // =========================================================================

    pub async fn get_ledger_detail<'e, E>(
        &self,
        executor: E,
        ledger_id: Uuid,
    ) -> Result<PackLedgerDetail, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;

        let ledger = self
            .pack_repo
            .get_ledger(&mut *conn, ledger_id)
            .await?
            .ok_or(AppError::LedgerNotFound)?;

        self.load_detail(&mut *conn, ledger).await
    }

    /// Histórico completo do cliente: ledgers vivos com pagamento e sessões
    /// aninhados, do mais recente para o mais antigo.
    pub async fn list_client_packs<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
    ) -> Result<Vec<PackLedgerDetail>, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;

        self.client_repo
            .get_client(&mut *conn, client_id)
            .await?
            .ok_or(AppError::ClientNotFound)?;

        let ledgers = self
            .pack_repo
            .list_ledgers_by_client(&mut *conn, client_id)
            .await?;

        let mut details = Vec::with_capacity(ledgers.len());
        for ledger in ledgers {
            details.push(self.load_detail(&mut *conn, ledger).await?);
        }

        Ok(details)
    }

    async fn load_detail(
        &self,
        conn: &mut sqlx::PgConnection,
        ledger: PackLedger,
    ) -> Result<PackLedgerDetail, AppError> {
        let payment = match ledger.payment_id {
            Some(payment_id) => self.payment_repo.get_payment(&mut *conn, payment_id).await?,
            None => None,
        };
        let sessions = self.pack_repo.list_sessions(&mut *conn, ledger.id).await?;

        Ok(PackLedgerDetail {
            ledger,
            payment,
            sessions,
        })
    }

    // =========================================================================
    //  CICLO DE VIDA DO LEDGER
    // =========================================================================

    /// Tombstone do ledger. As sessões ficam no banco e o registro pode ser
    /// restaurado depois.
    pub async fn delete_ledger<'e, E>(&self, executor: E, ledger_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let deleted = self.pack_repo.soft_delete_ledger(executor, ledger_id).await?;
        if !deleted {
            return Err(AppError::LedgerNotFound);
        }

        tracing::info!("Pacote {} marcado como excluído", ledger_id);
        Ok(())
    }

    pub async fn restore_ledger<'e, E>(
        &self,
        executor: E,
        ledger_id: Uuid,
    ) -> Result<PackLedger, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.pack_repo
            .restore_ledger(executor, ledger_id)
            .await?
            .ok_or(AppError::LedgerNotFound)
    }

    /// Suspensão manual. Só um pacote em andamento pode ser suspenso.
    pub async fn suspend_ledger<'e, E>(
        &self,
        executor: E,
        ledger_id: Uuid,
    ) -> Result<PackLedger, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let ledger = self
            .pack_repo
            .get_ledger_for_update(&mut *tx, ledger_id)
            .await?
            .ok_or(AppError::LedgerNotFound)?;

        if ledger.status != LedgerStatus::InProgress {
            return Err(AppError::LedgerNotActive);
        }

        let updated = self
            .pack_repo
            .set_ledger_status(&mut *tx, ledger.id, LedgerStatus::Suspended)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Reativação explícita: é a única porta de saída de Suspended/Expired.
    /// Nunca acontece automaticamente e exige saldo de sessões.
    pub async fn reactivate_ledger<'e, E>(
        &self,
        executor: E,
        ledger_id: Uuid,
    ) -> Result<PackLedger, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let ledger = self
            .pack_repo
            .get_ledger_for_update(&mut *tx, ledger_id)
            .await?
            .ok_or(AppError::LedgerNotFound)?;

        if ledger.status != LedgerStatus::Suspended && ledger.status != LedgerStatus::Expired {
            return Err(AppError::LedgerNotActive);
        }
        if ledger.sessions_remaining <= 0 {
            return Err(AppError::NoSessionsRemaining);
        }

        let updated = self
            .pack_repo
            .set_ledger_status(&mut *tx, ledger.id, LedgerStatus::InProgress)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ledger(remaining: i32, status: LedgerStatus) -> PackLedger {
        let total = 10;
        PackLedger {
            id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            pack_definition_id: Uuid::new_v4(),
            payment_id: None,
            purchase_date: NaiveDate::from_ymd_opt(2026, 8, 30).unwrap(),
            expiration_date: NaiveDate::from_ymd_opt(2026, 11, 28).unwrap(),
            total_sessions: total,
            sessions_consumed: total - remaining,
            sessions_remaining: remaining,
            amount_total: Decimal::from(1000),
            amount_paid: Decimal::from(600),
            status,
            created_at: None,
            updated_at: None,
            deleted_at: None,
        }
    }

    fn before_expiry() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()
    }

    #[test]
    fn allows_consume_on_active_pack_with_balance() {
        let l = ledger(7, LedgerStatus::InProgress);
        assert_eq!(check_consume(&l, before_expiry()), None);
    }

    #[test]
    fn balance_is_checked_before_status() {
        // Pacote suspenso E zerado: o saldo ganha
        let l = ledger(0, LedgerStatus::Suspended);
        assert_eq!(
            check_consume(&l, before_expiry()),
            Some(ConsumeBlock::NoSessionsRemaining)
        );
    }

    #[test]
    fn completed_pack_has_no_balance_left() {
        let l = ledger(0, LedgerStatus::Completed);
        assert_eq!(
            check_consume(&l, before_expiry()),
            Some(ConsumeBlock::NoSessionsRemaining)
        );
    }

    #[test]
    fn suspended_pack_rejects_consume_regardless_of_balance() {
        let l = ledger(5, LedgerStatus::Suspended);
        assert_eq!(
            check_consume(&l, before_expiry()),
            Some(ConsumeBlock::NotActive)
        );
    }

    #[test]
    fn stale_in_progress_pack_expires_on_consume() {
        let l = ledger(5, LedgerStatus::InProgress);
        let past_expiry = NaiveDate::from_ymd_opt(2026, 12, 1).unwrap();
        assert_eq!(
            check_consume(&l, past_expiry),
            Some(ConsumeBlock::JustExpired)
        );
    }

    #[test]
    fn already_expired_pack_is_just_inactive() {
        // Já marcado Expired: não há transição a persistir, só recusa
        let l = ledger(5, LedgerStatus::Expired);
        assert_eq!(
            check_consume(&l, before_expiry()),
            Some(ConsumeBlock::NotActive)
        );
    }
}
