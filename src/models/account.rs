use super::to_major_units;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// https://getmondo.co.uk/docs/#list-accounts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

// https://getmondo.co.uk/docs/#read-balance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Balance {
    /// Available balance in minor units
    pub balance: i64,
    pub currency: String,
    /// Amount spent since midnight, in minor units (negative for outgoings)
    #[serde(default)]
    pub spend_today: i64,
}

impl Balance {
    pub fn balance_major(&self) -> Decimal {
        to_major_units(self.balance)
    }

    pub fn spend_today_major(&self) -> Decimal {
        to_major_units(self.spend_today)
    }
}

/// Response of `/ping/whoami`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Identity {
    pub authenticated: bool,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub user_id: String,
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use serde_json::{Value, json};

    pub(crate) fn mock_account_json(id: &str) -> Value {
        json!({
            "id": id,
            "description": format!("Account {id}"),
            "created": "2015-11-13T12:17:42Z",
        })
    }
}
