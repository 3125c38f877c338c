//! HTTP 处理函数

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use laundry_cqrs_core::{dispatch_command, dispatch_query};
use laundry_errors::AppResult;

use super::dto::{
    CallbackResponse, DataTablesParams, InquiryRequest, InquiryResponse, PaymentCallbackRequest,
    StatusRequest,
};
use super::middleware::AuthActor;
use super::response::ApiResponse;
use super::router::AppState;
use crate::application::queries::{
    DataTablesPage, GetTransactionDetailsQuery, GetTransactionQuery, ListTransactionsByOutletQuery,
    ListTransactionsQuery,
};
use crate::domain::entities::{Transaction, TransactionAggregate, TransactionDetail};
use crate::domain::value_objects::{OutletId, TransactionId};

pub async fn process_inquiry(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Json(req): Json<InquiryRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<InquiryResponse>>)> {
    let command = req.into_command(actor)?;
    let aggregate = dispatch_command(state.inquiry.as_ref(), command).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("transaction created", aggregate.into())),
    ))
}

pub async fn list_transactions(
    State(state): State<AppState>,
    Query(params): Query<DataTablesParams>,
) -> AppResult<Json<DataTablesPage<Transaction>>> {
    let page = dispatch_query(state.queries.as_ref(), ListTransactionsQuery::from(params)).await?;
    Ok(Json(page))
}

pub async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<TransactionAggregate>>> {
    let aggregate = dispatch_query(
        state.queries.as_ref(),
        GetTransactionQuery {
            transaction_id: TransactionId(id),
        },
    )
    .await?;

    Ok(Json(ApiResponse::success("transaction found", aggregate)))
}

pub async fn get_transaction_details(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Vec<TransactionDetail>>>> {
    let details = dispatch_query(
        state.queries.as_ref(),
        GetTransactionDetailsQuery {
            transaction_id: TransactionId(id),
        },
    )
    .await?;

    Ok(Json(ApiResponse::success("transaction details found", details)))
}

pub async fn list_outlet_transactions(
    State(state): State<AppState>,
    Path(outlet_id): Path<i64>,
) -> AppResult<Json<ApiResponse<Vec<Transaction>>>> {
    let transactions = dispatch_query(
        state.queries.as_ref(),
        ListTransactionsByOutletQuery {
            outlet_id: OutletId(outlet_id),
        },
    )
    .await?;

    Ok(Json(ApiResponse::success("transactions found", transactions)))
}

pub async fn update_transaction_status(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(id): Path<i64>,
    Json(req): Json<StatusRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    dispatch_command(state.lifecycle.as_ref(), req.into_transaction_status(actor, id)).await?;
    Ok(Json(ApiResponse::ok("transaction status updated")))
}

pub async fn update_payment_status(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(id): Path<i64>,
    Json(req): Json<StatusRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    dispatch_command(state.lifecycle.as_ref(), req.into_payment_status(actor, id)).await?;
    Ok(Json(ApiResponse::ok("payment status updated")))
}

pub async fn payment_callback(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Json(req): Json<PaymentCallbackRequest>,
) -> AppResult<Json<ApiResponse<CallbackResponse>>> {
    let outcome = dispatch_command(state.lifecycle.as_ref(), req.into_command(actor)?).await?;

    Ok(Json(ApiResponse::success(
        "payment callback processed",
        CallbackResponse {
            outcome: outcome.as_str(),
        },
    )))
}
