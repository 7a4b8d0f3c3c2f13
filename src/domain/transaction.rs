use super::account::Amount;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// A requested transfer of `amount` from one account to another.
///
/// Transactions are immutable once built; workers receive owned clones.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Transaction {
    #[serde(rename = "from")]
    pub from_id: String,
    #[serde(rename = "to")]
    pub to_id: String,
    #[serde(deserialize_with = "exact_amount")]
    pub amount: Amount,
}

/// Parses the amount from its text form so no digits pass through `f64`.
fn exact_amount<'de, D>(deserializer: D) -> Result<Amount, D::Error>
where
    D: Deserializer<'de>,
{
    let value = rust_decimal::serde::str::deserialize(deserializer)?;
    Amount::new(value).map_err(de::Error::custom)
}

impl Transaction {
    pub fn new(from_id: impl Into<String>, to_id: impl Into<String>, amount: Amount) -> Self {
        Self {
            from_id: from_id.into(),
            to_id: to_id.into(),
            amount,
        }
    }
}
