//! 订单生命周期处理器：履约状态、结算状态、网关回调

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use laundry_cqrs_core::CommandHandler;
use laundry_errors::{AppError, AppResult};
use tracing::{info, warn};

use super::commands::{
    CallbackOutcome, PaymentCallbackCommand, UpdatePaymentStatusCommand,
    UpdateTransactionStatusCommand,
};
use crate::domain::entities::{NewStatusHistory, PaymentSettlement, Transaction};
use crate::domain::enums::{PaymentStatus, TransactionStatus};
use crate::domain::unit_of_work::{UnitOfWork, UnitOfWorkFactory};
use crate::domain::value_objects::TransactionId;
use crate::infrastructure::observability;

pub struct OrderLifecycleHandler {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
}

impl OrderLifecycleHandler {
    pub fn new(uow_factory: Arc<dyn UnitOfWorkFactory>) -> Self {
        Self { uow_factory }
    }

    /// 成功则提交，失败则回滚并返回原始错误
    async fn finish<T>(uow: Box<dyn UnitOfWork>, result: AppResult<T>) -> AppResult<T> {
        match result {
            Ok(value) => {
                uow.commit().await?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = uow.rollback().await {
                    warn!(error = %rollback_err, "Rollback did not complete");
                }
                Err(e)
            }
        }
    }

    async fn load_for_update(uow: &dyn UnitOfWork, id: TransactionId) -> AppResult<Transaction> {
        uow.transactions()
            .find_for_update(id)
            .await?
            .ok_or_else(|| AppError::not_found("transaction not found"))
    }

    async fn change_status(
        uow: &dyn UnitOfWork,
        command: &UpdateTransactionStatusCommand,
        status: TransactionStatus,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        let mut transaction = Self::load_for_update(uow, command.transaction_id).await?;
        let transition = transaction.change_status(status, &command.actor.audit_name(), now);
        uow.transactions().update(&transaction).await?;

        if let Some(transition) = transition {
            uow.status_history()
                .append(&NewStatusHistory::from_transition(transaction.id, transition, now))
                .await
                .map_err(|e| e.context("failed to insert status history"))?;
            info!(
                transaction_id = %transaction.id,
                from = transition.from.as_str(),
                to = transition.to.as_str(),
                actor = %command.actor.username,
                "Transaction status updated"
            );
        }
        Ok(())
    }

    async fn change_payment_status(
        uow: &dyn UnitOfWork,
        command: &UpdatePaymentStatusCommand,
        status: PaymentStatus,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        let mut transaction = Self::load_for_update(uow, command.transaction_id).await?;
        transaction.set_payment_status(status, &command.actor.audit_name(), now);
        uow.transactions().update(&transaction).await?;

        if let Some(mut payment) = uow.payments().find_by_transaction(transaction.id).await? {
            payment.payment_status = status;
            payment.updated_at = now;
            uow.payments().update(&payment).await?;
        }

        info!(
            transaction_id = %transaction.id,
            payment_status = status.as_str(),
            actor = %command.actor.username,
            "Payment status updated"
        );
        Ok(())
    }

    async fn apply_callback(
        uow: &dyn UnitOfWork,
        command: &PaymentCallbackCommand,
        settlement: &PaymentSettlement,
        now: DateTime<Utc>,
    ) -> AppResult<CallbackOutcome> {
        let mut transaction = Self::load_for_update(uow, command.transaction_id).await?;

        if transaction.is_settlement_applied(settlement) {
            info!(
                transaction_id = %transaction.id,
                reference = ?settlement.reference_number,
                "Duplicate payment callback ignored"
            );
            return Ok(CallbackOutcome::Duplicate);
        }

        transaction.apply_settlement(settlement, &command.actor.audit_name(), now);
        uow.transactions().update(&transaction).await?;

        if let Some(mut payment) = uow.payments().find_by_transaction(transaction.id).await? {
            payment.apply_settlement(settlement, now);
            uow.payments()
                .update(&payment)
                .await
                .map_err(|e| e.context("failed to update payment"))?;
        }

        info!(
            transaction_id = %transaction.id,
            payment_status = settlement.payment_status.as_str(),
            reference = ?settlement.reference_number,
            "Payment callback applied"
        );
        Ok(CallbackOutcome::Applied)
    }
}

#[async_trait]
impl CommandHandler<UpdateTransactionStatusCommand> for OrderLifecycleHandler {
    async fn handle(&self, command: UpdateTransactionStatusCommand) -> AppResult<()> {
        let status = command.validated_status()?;

        let uow = self.uow_factory.begin().await?;
        let result = Self::change_status(uow.as_ref(), &command, status, Utc::now()).await;
        Self::finish(uow, result).await?;

        observability::record_status_update("fulfilment");
        Ok(())
    }
}

#[async_trait]
impl CommandHandler<UpdatePaymentStatusCommand> for OrderLifecycleHandler {
    async fn handle(&self, command: UpdatePaymentStatusCommand) -> AppResult<()> {
        let status = command.validated_status()?;

        let uow = self.uow_factory.begin().await?;
        let result = Self::change_payment_status(uow.as_ref(), &command, status, Utc::now()).await;
        Self::finish(uow, result).await?;

        observability::record_status_update("payment");
        Ok(())
    }
}

#[async_trait]
impl CommandHandler<PaymentCallbackCommand> for OrderLifecycleHandler {
    async fn handle(&self, command: PaymentCallbackCommand) -> AppResult<CallbackOutcome> {
        let settlement = match command.settlement() {
            Ok(settlement) => settlement,
            Err(e) => {
                observability::record_payment_callback("rejected");
                return Err(e);
            }
        };

        let uow = self.uow_factory.begin().await?;
        let result = Self::apply_callback(uow.as_ref(), &command, &settlement, Utc::now()).await;

        let outcome = match result {
            Ok(CallbackOutcome::Duplicate) => {
                uow.rollback().await?;
                CallbackOutcome::Duplicate
            }
            other => Self::finish(uow, other).await.inspect_err(|e| {
                if e.is_not_found() {
                    observability::record_payment_callback("rejected");
                }
            })?,
        };

        observability::record_payment_callback(outcome.as_str());
        Ok(outcome)
    }
}
