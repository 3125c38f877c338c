//! 订单生命周期集成测试：履约状态、结算状态、网关回调

mod support;

use std::sync::Arc;

use laundry_cqrs_core::CommandHandler;
use laundry_errors::AppError;
use laundry_order::application::commands::*;
use laundry_order::application::{InquiryHandler, OrderLifecycleHandler};
use laundry_order::domain::entities::Transaction;
use laundry_order::domain::enums::{PaymentStatus, TransactionStatus};
use laundry_order::domain::value_objects::*;
use rust_decimal::Decimal;
use support::*;

/// 通过受理流程建一笔订单，返回存储与交易 ID
async fn store_with_order() -> (MemoryStore, TransactionId) {
    let store = seeded_store();
    let inquiry = InquiryHandler::new(store.master_data(), Arc::new(store.clone()), 3);
    let aggregate = inquiry
        .handle(ProcessInquiryCommand {
            actor: actor(OUTLET_USER),
            service_id: ServicePackageId(PACKAGE),
            customer_id: CustomerId(CUSTOMER),
            payment_method_id: PaymentMethodId(CASH),
            outlet_id: None,
            employee_id: None,
            quantity: Decimal::from(4),
            note: None,
        })
        .await
        .expect("seed order");
    (store, aggregate.transaction.id)
}

fn lifecycle(store: &MemoryStore) -> OrderLifecycleHandler {
    OrderLifecycleHandler::new(Arc::new(store.clone()))
}

fn stored(store: &MemoryStore, id: TransactionId) -> Transaction {
    store
        .tables()
        .transactions
        .into_iter()
        .find(|t| t.id == id)
        .expect("transaction row")
}

fn status(id: TransactionId, status: &str) -> UpdateTransactionStatusCommand {
    UpdateTransactionStatusCommand {
        actor: actor(EMPLOYEE_USER),
        transaction_id: id,
        status: status.to_string(),
    }
}

fn callback(id: TransactionId) -> PaymentCallbackCommand {
    PaymentCallbackCommand {
        actor: actor(OUTLET_USER),
        transaction_id: id,
        payment_status: "paid".into(),
        payment_method: Some("transfer".into()),
        reference_number: Some("PG-778899".into()),
        paid_amount: Decimal::from(70_000),
        change_amount: Decimal::from(10_000),
        status_code: Some("00".into()),
        status_message: Some("Success".into()),
    }
}

// =============================================================================
// 履约状态
// =============================================================================

#[tokio::test]
async fn test_status_update_appends_history() {
    let (store, id) = store_with_order().await;

    lifecycle(&store).handle(status(id, "processing")).await.unwrap();

    let tx = stored(&store, id);
    assert_eq!(tx.status, TransactionStatus::Processing);
    assert_eq!(tx.updated_by.as_deref(), Some("user2"));

    let history = store.tables().history;
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].old_status, TransactionStatus::Received);
    assert_eq!(history[1].new_status, TransactionStatus::Processing);
    assert_eq!(history[1].description, "status updated from received to processing");
}

#[tokio::test]
async fn test_status_outside_allow_list_is_rejected() {
    let (store, id) = store_with_order().await;
    let begins_before = store.counters().begins;

    for value in [
        "cancelled",
        "",
        "refunded",
        "processing; drop",
        "PROCESSING",
        "  Picked Up ",
        "SELESAI",
        " received",
    ] {
        let err = lifecycle(&store).handle(status(id, value)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "{value:?}: {err}");
    }

    assert_eq!(stored(&store, id).status, TransactionStatus::Received);
    assert_eq!(store.tables().history.len(), 1);
    assert_eq!(store.counters().begins, begins_before);
}

#[tokio::test]
async fn test_every_allowed_status_is_accepted() {
    let (store, id) = store_with_order().await;
    let handler = lifecycle(&store);

    for value in ["received", "processing", "completed", "picked_up"] {
        handler.handle(status(id, value)).await.unwrap();
        assert_eq!(stored(&store, id).status.as_str(), value);
    }
}

#[tokio::test]
async fn test_same_status_writes_no_history() {
    let (store, id) = store_with_order().await;

    lifecycle(&store).handle(status(id, "received")).await.unwrap();

    assert_eq!(store.tables().history.len(), 1);
    assert_eq!(stored(&store, id).updated_by.as_deref(), Some("user2"));
}

#[tokio::test]
async fn test_completion_and_pickup_dates_are_stamped_once() {
    let (store, id) = store_with_order().await;
    let handler = lifecycle(&store);

    handler.handle(status(id, "completed")).await.unwrap();
    let completed_at = stored(&store, id).completion_date.expect("completion date");
    assert!(stored(&store, id).pickup_date.is_none());

    handler.handle(status(id, "processing")).await.unwrap();
    handler.handle(status(id, "completed")).await.unwrap();
    assert_eq!(stored(&store, id).completion_date, Some(completed_at));

    handler.handle(status(id, "diambil")).await.unwrap();
    let tx = stored(&store, id);
    assert_eq!(tx.status, TransactionStatus::PickedUp);
    assert!(tx.pickup_date.is_some());
}

#[tokio::test]
async fn test_status_update_on_missing_transaction() {
    let (store, _) = store_with_order().await;

    let err = lifecycle(&store)
        .handle(status(TransactionId(9_999), "processing"))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(store.counters().rollbacks, 1);
}

#[tokio::test]
async fn test_history_failure_rolls_back_status() {
    let (store, id) = store_with_order().await;
    store.fail_on(WriteStep::History);

    let err = lifecycle(&store).handle(status(id, "processing")).await.unwrap_err();

    assert!(err.message().starts_with("failed to insert status history"));
    assert_eq!(stored(&store, id).status, TransactionStatus::Received);
}

#[tokio::test]
async fn test_history_constraint_violation_is_storage_failure() {
    let (store, id) = store_with_order().await;
    store.violate_constraint_on(WriteStep::History);

    let err = lifecycle(&store).handle(status(id, "processing")).await.unwrap_err();

    assert!(matches!(err, AppError::Database(_)), "{err:?}");
    assert!(err.message().starts_with("failed to insert status history"));
    assert_eq!(stored(&store, id).status, TransactionStatus::Received);
}

// =============================================================================
// 结算状态
// =============================================================================

#[tokio::test]
async fn test_payment_status_updates_transaction_and_payment() {
    let (store, id) = store_with_order().await;

    lifecycle(&store)
        .handle(UpdatePaymentStatusCommand {
            actor: actor(OUTLET_USER),
            transaction_id: id,
            status: "lunas".into(),
        })
        .await
        .unwrap();

    assert_eq!(stored(&store, id).payment_status, PaymentStatus::Paid);
    assert_eq!(store.tables().payments[0].payment_status, PaymentStatus::Paid);
    assert_eq!(store.tables().history.len(), 1);
}

#[tokio::test]
async fn test_payment_status_rejects_failed() {
    let (store, id) = store_with_order().await;

    let err = lifecycle(&store)
        .handle(UpdatePaymentStatusCommand {
            actor: actor(OUTLET_USER),
            transaction_id: id,
            status: "failed".into(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(stored(&store, id).payment_status, PaymentStatus::Unpaid);
}

// =============================================================================
// 网关回调
// =============================================================================

#[tokio::test]
async fn test_callback_applies_settlement() {
    let (store, id) = store_with_order().await;

    let outcome = lifecycle(&store).handle(callback(id)).await.unwrap();
    assert_eq!(outcome, CallbackOutcome::Applied);

    let tx = stored(&store, id);
    assert_eq!(tx.payment_status, PaymentStatus::Paid);
    assert_eq!(tx.payment_method.as_deref(), Some("transfer"));
    assert_eq!(tx.payment_reference.as_deref(), Some("PG-778899"));
    assert_eq!(tx.paid_amount, Decimal::from(70_000));
    assert_eq!(tx.change_amount, Decimal::from(10_000));
    assert_eq!(tx.gateway_status_code.as_deref(), Some("00"));
    assert_eq!(tx.gateway_status_message.as_deref(), Some("Success"));
    assert_eq!(tx.status, TransactionStatus::Received);

    let payment = &store.tables().payments[0];
    assert_eq!(payment.payment_status, PaymentStatus::Paid);
    assert_eq!(payment.amount, Decimal::from(70_000));
    assert_eq!(payment.method, "transfer");
    assert_eq!(payment.reference_number.as_deref(), Some("PG-778899"));
}

#[tokio::test]
async fn test_callback_without_method_keeps_existing() {
    let (store, id) = store_with_order().await;
    let mut command = callback(id);
    command.payment_method = Some("   ".into());

    lifecycle(&store).handle(command).await.unwrap();

    assert_eq!(stored(&store, id).payment_method.as_deref(), Some("Tunai"));
}

#[tokio::test]
async fn test_repeated_callback_is_acknowledged_without_writes() {
    let (store, id) = store_with_order().await;
    let handler = lifecycle(&store);

    handler.handle(callback(id)).await.unwrap();
    let after_first = stored(&store, id);

    let outcome = handler.handle(callback(id)).await.unwrap();

    assert_eq!(outcome, CallbackOutcome::Duplicate);
    assert_eq!(stored(&store, id), after_first);
    assert_eq!(store.counters().rollbacks, 1);
}

#[tokio::test]
async fn test_failed_callback_after_paid_is_applied() {
    let (store, id) = store_with_order().await;
    let handler = lifecycle(&store);
    handler.handle(callback(id)).await.unwrap();

    let mut failed = callback(id);
    failed.payment_status = "gagal".into();
    failed.status_code = Some("05".into());

    assert_eq!(handler.handle(failed).await.unwrap(), CallbackOutcome::Applied);
    assert_eq!(stored(&store, id).payment_status, PaymentStatus::Failed);
    assert_eq!(stored(&store, id).gateway_status_code.as_deref(), Some("05"));
}

#[tokio::test]
async fn test_callback_on_missing_transaction_changes_nothing() {
    let (store, _) = store_with_order().await;
    let before = store.tables();

    let err = lifecycle(&store)
        .handle(callback(TransactionId(9_999)))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    let after = store.tables();
    assert_eq!(after.transactions, before.transactions);
    assert_eq!(after.payments, before.payments);
    assert_eq!(store.counters().commits, 1);
}

#[tokio::test]
async fn test_callback_input_validation() {
    let (store, id) = store_with_order().await;
    let handler = lifecycle(&store);

    let mut bad_status = callback(id);
    bad_status.payment_status = "pending".into();
    let mut bad_channel = callback(id);
    bad_channel.payment_method = Some("crypto".into());
    let mut shouted = callback(id);
    shouted.payment_status = "LUNAS".into();
    let mut padded_channel = callback(id);
    padded_channel.payment_method = Some(" Transfer".into());
    let mut negative = callback(id);
    negative.change_amount = Decimal::from(-1);

    for command in [bad_status, bad_channel, shouted, padded_channel, negative] {
        let err = handler.handle(command).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "{err}");
    }
    assert_eq!(stored(&store, id).payment_status, PaymentStatus::Unpaid);
}
