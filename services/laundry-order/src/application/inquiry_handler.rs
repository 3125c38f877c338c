//! 订单受理处理器

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use laundry_cqrs_core::CommandHandler;
use laundry_errors::{AppError, AppResult};
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{info, warn};

use super::commands::ProcessInquiryCommand;
use super::{MasterData, OutletScopeResolver, ResolvedScope};
use crate::domain::entities::{
    NewPayment, NewStatusHistory, NewTransaction, NewTransactionDetail, PaymentMethod,
    CreatedTransaction, ServicePackage, Transaction, UserAccount,
};
use crate::domain::enums::{PaymentStatus, TransactionStatus};
use crate::domain::unit_of_work::{UnitOfWork, UnitOfWorkFactory};
use crate::domain::value_objects::InvoiceNumber;
use crate::infrastructure::observability;

const CREATED_DESCRIPTION: &str = "new transaction created";

/// 已通过校验、待写入的订单
struct ValidatedInquiry {
    account: UserAccount,
    scope: ResolvedScope,
    package: ServicePackage,
    payment_method: PaymentMethod,
}

pub struct InquiryHandler {
    master: MasterData,
    scope: OutletScopeResolver,
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    invoice_retry_limit: u32,
}

impl InquiryHandler {
    pub fn new(
        master: MasterData,
        uow_factory: Arc<dyn UnitOfWorkFactory>,
        invoice_retry_limit: u32,
    ) -> Self {
        let scope = OutletScopeResolver::new(master.outlets.clone(), master.employees.clone());
        Self {
            master,
            scope,
            uow_factory,
            invoice_retry_limit,
        }
    }

    /// 所有校验在开启事务之前完成
    async fn validate(&self, command: &ProcessInquiryCommand) -> AppResult<ValidatedInquiry> {
        command.validate()?;

        let account = self
            .master
            .user_accounts
            .find_by_id(command.actor.user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("invalid user access"))?;
        if !account.is_active {
            return Err(AppError::unauthorized("user access is inactive"));
        }

        let scope = self.scope.resolve(&account, command.outlet_id).await?;

        let package = self
            .master
            .service_packages
            .find_by_id(command.service_id)
            .await?
            .ok_or_else(|| AppError::not_found("invalid package"))?;

        if !self.master.customers.exists(command.customer_id).await? {
            return Err(AppError::not_found("invalid customer"));
        }

        let payment_method = self
            .master
            .payment_methods
            .find_by_id(command.payment_method_id)
            .await?
            .ok_or_else(|| AppError::not_found("invalid payment method"))?;

        Ok(ValidatedInquiry {
            account,
            scope,
            package,
            payment_method,
        })
    }

    async fn persist(
        &self,
        uow: &dyn UnitOfWork,
        command: &ProcessInquiryCommand,
        inquiry: &ValidatedInquiry,
        now: DateTime<Utc>,
    ) -> AppResult<CreatedTransaction> {
        let operator = command.actor.audit_name();
        let unit_price = inquiry.package.unit_price;
        let subtotal = (unit_price * command.quantity)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

        let header = NewTransaction {
            customer_id: command.customer_id,
            outlet_id: inquiry.scope.outlet_id,
            employee_id: inquiry.scope.employee_id.or(command.employee_id),
            user_id: Some(inquiry.account.id),
            invoice_number: String::new(),
            entry_date: now,
            total_price: subtotal,
            status: TransactionStatus::INITIAL,
            payment_status: PaymentStatus::Unpaid,
            payment_method: Some(inquiry.payment_method.name.clone()),
            note: command.normalized_note(),
            created_by: operator.clone(),
        };
        let transaction = self
            .insert_header(uow, header, now)
            .await
            .map_err(|e| e.context("failed to insert transaction"))?;

        let detail = uow
            .details()
            .insert(&NewTransactionDetail {
                transaction_id: transaction.id,
                service_id: inquiry.package.id,
                quantity: command.quantity,
                unit_price,
                subtotal,
                created_at: now,
                created_by: operator,
            })
            .await
            .map_err(|e| e.context("failed to insert transaction detail"))?;

        let payment = uow
            .payments()
            .insert(&NewPayment {
                transaction_id: transaction.id,
                payment_method_id: inquiry.payment_method.id,
                payment_date: now,
                amount: Decimal::ZERO,
                method: inquiry.payment_method.name.clone(),
            })
            .await
            .map_err(|e| e.context("failed to insert payment"))?;

        let history = uow
            .status_history()
            .append(&NewStatusHistory {
                transaction_id: transaction.id,
                old_status: TransactionStatus::INITIAL,
                new_status: TransactionStatus::INITIAL,
                changed_at: now,
                description: CREATED_DESCRIPTION.to_string(),
            })
            .await
            .map_err(|e| e.context("failed to insert status history"))?;

        Ok(CreatedTransaction {
            transaction,
            transaction_details: vec![detail],
            payment,
            history,
        })
    }

    /// 插入表头；发票号冲突时领取新流水号重试
    async fn insert_header(
        &self,
        uow: &dyn UnitOfWork,
        mut header: NewTransaction,
        now: DateTime<Utc>,
    ) -> AppResult<Transaction> {
        let mut attempt = 0;
        loop {
            let serial = uow.transactions().next_invoice_serial().await?;
            header.invoice_number = InvoiceNumber::generate(now, serial).into_inner();

            match uow.transactions().insert(&header).await {
                Ok(transaction) => return Ok(transaction),
                Err(e) if e.is_conflict() && attempt < self.invoice_retry_limit => {
                    attempt += 1;
                    observability::record_invoice_conflict();
                    warn!(
                        invoice = %header.invoice_number,
                        attempt,
                        "Invoice number collision, retrying"
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn process(&self, command: ProcessInquiryCommand) -> AppResult<CreatedTransaction> {
        let inquiry = self.validate(&command).await?;
        let now = Utc::now();

        let uow = self.uow_factory.begin().await?;
        let written = self.persist(uow.as_ref(), &command, &inquiry, now).await;
        let created = match written {
            Ok(created) => created,
            Err(e) => {
                if let Err(rollback_err) = uow.rollback().await {
                    warn!(error = %rollback_err, "Rollback after failed inquiry did not complete");
                }
                return Err(e);
            }
        };
        uow.commit().await?;

        info!(
            transaction_id = %created.transaction.id,
            invoice = %created.transaction.invoice_number,
            outlet_id = %created.transaction.outlet_id,
            actor = %command.actor.username,
            total = %created.transaction.total_price,
            "Transaction created"
        );
        Ok(created)
    }
}

#[async_trait]
impl CommandHandler<ProcessInquiryCommand> for InquiryHandler {
    async fn handle(&self, command: ProcessInquiryCommand) -> AppResult<CreatedTransaction> {
        let result = self.process(command).await;
        let outcome = match &result {
            Ok(_) => "created",
            Err(e) if e.status_code() < 500 => "rejected",
            Err(_) => "failed",
        };
        observability::record_inquiry(outcome);
        result
    }
}
