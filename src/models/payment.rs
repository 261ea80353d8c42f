//! Payment models. Gateway internals stay on the backend; we only relay the
//! hosted payment URL and history entries.

use serde::{Deserialize, Serialize};

/// Supported hosted payment gateways.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentGateway {
    Bkash,
    Aamarpay,
}

/// Data returned by the payment-initiation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiatePaymentData {
    #[serde(default)]
    pub result: bool,
    pub payment_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Completed,
    Pending,
    Failed,
}

/// One row of a student's payment history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentHistoryEntry {
    #[serde(rename = "_id")]
    pub id: String,
    pub order_id: String,
    pub tran_id: String,
    pub amount: f64,
    pub status: PaymentStatus,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub course_name: String,
    #[serde(default)]
    pub invoice_url: Option<String>,
    pub created_at: String,
}
