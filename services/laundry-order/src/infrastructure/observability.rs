//! 业务指标记录

use metrics::counter;

/// 记录订单受理结果（created / rejected / failed）
pub fn record_inquiry(outcome: &'static str) {
    counter!("laundry_inquiries_total", "outcome" => outcome).increment(1);
}

/// 发票号冲突重试
pub fn record_invoice_conflict() {
    counter!("laundry_invoice_conflicts_total").increment(1);
}

/// 记录状态更新（fulfilment / payment）
pub fn record_status_update(kind: &'static str) {
    counter!("laundry_status_updates_total", "kind" => kind).increment(1);
}

/// 记录网关回调结果（applied / duplicate / rejected）
pub fn record_payment_callback(outcome: &'static str) {
    counter!("laundry_payment_callbacks_total", "outcome" => outcome).increment(1);
}
