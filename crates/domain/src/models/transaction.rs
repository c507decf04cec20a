use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

use crate::Record;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TransactionStatus {
    #[default]
    Pending,
    PartPayment,
    Paid,
    Cancelled,
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Transfer,
    Pos,
}

/// One product line on a transaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionItem {
    pub product: String, // product _id
    pub name: String,
    pub quantity: i64,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Transaction {
    #[serde(rename = "_id")]
    pub id: String,
    pub reference: String,
    pub customer: Option<String>, // customer _id, walk-in sales have none
    pub customer_name: String,
    pub items: Vec<TransactionItem>,
    pub total_amount: f64,
    pub amount_paid: f64,
    pub status: TransactionStatus,
    pub payment_method: PaymentMethod,
    pub created_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// Amount still owed on this transaction.
    pub fn outstanding(&self) -> f64 {
        (self.total_amount - self.amount_paid).max(0.0)
    }
}

impl Record for Transaction {
    const RESOURCE: &'static str = "/transactions";

    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> String {
        if self.reference.is_empty() {
            self.id.clone()
        } else {
            self.reference.clone()
        }
    }
}
