use crate::error::{PaymentError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{AddAssign, SubAssign};
use tokio::sync::Mutex;

/// A monetary balance held by an account.
///
/// Thin wrapper around `rust_decimal::Decimal` so balances and transfer amounts
/// cannot be mixed up by accident.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balance(pub Decimal);

/// A strictly positive amount moved by a transaction.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(PaymentError::ValidationError(format!(
                "Amount must be positive, got {value}"
            )))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = PaymentError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl From<Amount> for Balance {
    fn from(amount: Amount) -> Self {
        Self(amount.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Balance {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl AddAssign for Balance {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Balance {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

/// Point-in-time view of an account, used for reporting.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct AccountSnapshot {
    pub id: String,
    pub name: String,
    pub balance: Balance,
}

/// A named balance holder.
///
/// The balance lives behind a per-account guard: every read and write goes
/// through it, and `deposit`/`withdraw` are the only mutation paths. Accounts
/// are shared between workers as `Arc<Account>`.
#[derive(Debug)]
pub struct Account {
    id: String,
    name: String,
    balance: Mutex<Balance>,
}

impl Account {
    pub fn new(id: impl Into<String>, name: impl Into<String>, balance: Balance) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            balance: Mutex::new(balance),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current balance, read under the guard.
    pub async fn balance(&self) -> Balance {
        *self.balance.lock().await
    }

    pub async fn snapshot(&self) -> AccountSnapshot {
        AccountSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            balance: self.balance().await,
        }
    }

    /// Credits `amount`. Cannot fail.
    pub async fn deposit(&self, amount: Amount) {
        let mut balance = self.balance.lock().await;
        *balance += amount.into();
    }

    /// Debits `amount` if the balance covers it.
    ///
    /// The comparison and the subtraction happen under a single guard
    /// acquisition, so two racing withdrawals can never both pass the check
    /// against the same balance. An exact-balance withdrawal succeeds and
    /// leaves zero.
    pub async fn withdraw(&self, amount: Amount) -> Result<()> {
        let mut balance = self.balance.lock().await;
        let requested = Balance::from(amount);
        if *balance < requested {
            return Err(PaymentError::InsufficientFunds {
                account: self.id.clone(),
                requested: requested.0,
                available: balance.0,
            });
        }
        *balance -= requested;
        Ok(())
    }
}
