use super::to_major_units;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

// https://getmondo.co.uk/docs/#transactions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: String,
    /// Signed amount in minor units, negative for debits
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub category: Option<String>,
    /// Settlement timestamp. The API sends an empty string while pending.
    #[serde(default)]
    pub settled: Option<String>,
    #[serde(default)]
    pub account_balance: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub merchant: Option<MerchantRef>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    /// Fields not modelled above, kept as sent.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Transaction {
    pub fn amount_major(&self) -> Decimal {
        to_major_units(self.amount)
    }

    pub fn is_settled(&self) -> bool {
        self.settled.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// A merchant is sent as a bare id unless `expand[]=merchant` was requested.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MerchantRef {
    Id(String),
    Expanded(Merchant),
}

impl MerchantRef {
    pub fn id(&self) -> &str {
        match self {
            MerchantRef::Id(id) => id,
            MerchantRef::Expanded(merchant) => &merchant.id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Merchant {
    pub id: String,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub emoji: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub address: Option<Value>,
}
