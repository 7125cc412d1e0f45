// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which ledger a record lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Purchase,
    Sale,
}

impl RecordKind {
    pub fn table(&self) -> &'static str {
        match self {
            RecordKind::Purchase => "purchases",
            RecordKind::Sale => "sales",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKind::Purchase => write!(f, "purchase"),
            RecordKind::Sale => write!(f, "sale"),
        }
    }
}

impl std::str::FromStr for RecordKind {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "purchase" | "purchases" | "buy" => Ok(RecordKind::Purchase),
            "sale" | "sales" | "sell" => Ok(RecordKind::Sale),
            other => Err(anyhow::anyhow!(
                "Invalid record kind '{}', expected purchase|sale",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pending,
    Partial,
    Completed,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "Pending"),
            PaymentStatus::Partial => write!(f, "Partial"),
            PaymentStatus::Completed => write!(f, "Completed"),
        }
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(PaymentStatus::Pending),
            "partial" => Ok(PaymentStatus::Partial),
            "completed" => Ok(PaymentStatus::Completed),
            other => Err(anyhow::anyhow!(
                "Invalid payment status '{}', expected pending|partial|completed",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "INR")]
    Inr,
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Currency::Usd => write!(f, "USD"),
            Currency::Inr => write!(f, "INR"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "INR" => Ok(Currency::Inr),
            other => Err(anyhow::anyhow!(
                "Invalid currency '{}', expected USD|INR",
                other
            )),
        }
    }
}

/// One recorded partial payment. Immutable once appended; the history is only
/// ever appended to or cleared wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentEvent {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub currency: Currency,
    /// Always the record's anchor rate, never the market rate at payment time.
    pub exchange_rate: Decimal,
    #[serde(default)]
    pub reference: String,
}

/// One purchase or sale row. Totals and the anchor exchange rate are fixed at
/// creation; payment fields are mutated only through the ledger engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRecord {
    pub date: Option<NaiveDate>,
    pub party: Option<String>,
    pub description: Option<String>,
    pub stone_id: Option<String>,
    pub kapan_no: Option<String>,
    pub carat: Option<Decimal>,
    pub quantity: Option<i64>,
    pub price_per_carat_usd: Option<Decimal>,
    pub price_per_carat_inr: Option<Decimal>,
    pub total_amount_usd: Option<Decimal>,
    pub total_amount_inr: Option<Decimal>,
    pub exchange_rate: Option<Decimal>,
    pub payment_status: PaymentStatus,
    pub payment_done_date: Option<NaiveDate>,
    pub payment_reference: Option<String>,
    pub payment_due_date: Option<NaiveDate>,
    pub payment_notes: Option<String>,
    pub partial_payments: Vec<PaymentEvent>,
}

impl TransactionRecord {
    pub fn new() -> Self {
        TransactionRecord {
            date: None,
            party: None,
            description: None,
            stone_id: None,
            kapan_no: None,
            carat: None,
            quantity: None,
            price_per_carat_usd: None,
            price_per_carat_inr: None,
            total_amount_usd: None,
            total_amount_inr: None,
            exchange_rate: None,
            payment_status: PaymentStatus::Pending,
            payment_done_date: None,
            payment_reference: None,
            payment_due_date: None,
            payment_notes: None,
            partial_payments: Vec::new(),
        }
    }
}

impl Default for TransactionRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// Received/remaining amounts projected from a record's payment history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Balances {
    pub received_usd: Decimal,
    pub received_inr: Decimal,
    pub remaining_usd: Decimal,
    pub remaining_inr: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct InventoryItem {
    pub item_id: String,
    pub description: Option<String>,
    pub shape: Option<String>,
    pub carat: Option<Decimal>,
    pub status: String,
    pub location: Option<String>,
    pub notes: Option<String>,
}
