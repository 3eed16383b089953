//! Transaction records owned by the service.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of movement recorded against a user/fund pair.
///
/// Only the exact wire names are recognized. Anything else, including other
/// spellings of a known name, is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionKind {
    Deposit,
    Cancellation,
    /// Written by the service when a subscription opens a fund.
    Opening,
    Other(String),
}

impl TransactionKind {
    /// Wire name sent as `operacion` / read from `tipo_transaccion`.
    pub fn as_str(&self) -> &str {
        match self {
            TransactionKind::Deposit => "deposito",
            TransactionKind::Cancellation => "cancelacion",
            TransactionKind::Opening => "APERTURA",
            TransactionKind::Other(s) => s,
        }
    }

    /// Human label for tables and modal titles.
    pub fn label(&self) -> &str {
        match self {
            TransactionKind::Deposit => "Deposit",
            TransactionKind::Cancellation => "Withdrawal",
            TransactionKind::Opening => "Opening",
            TransactionKind::Other(s) => s,
        }
    }

    /// Kinds a user can submit from the dashboard.
    pub fn is_user_operation(&self) -> bool {
        matches!(self, TransactionKind::Deposit | TransactionKind::Cancellation)
    }
}

impl From<&str> for TransactionKind {
    fn from(s: &str) -> Self {
        match s {
            "deposito" => TransactionKind::Deposit,
            "cancelacion" => TransactionKind::Cancellation,
            "APERTURA" => TransactionKind::Opening,
            _ => TransactionKind::Other(s.to_string()),
        }
    }
}

impl From<String> for TransactionKind {
    fn from(s: String) -> Self {
        TransactionKind::from(s.as_str())
    }
}

impl From<TransactionKind> for String {
    fn from(kind: TransactionKind) -> Self {
        match kind {
            TransactionKind::Other(s) => s,
            k => k.as_str().to_string(),
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A deposit, cancellation or opening recorded by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Server-assigned, opaque.
    pub id: String,
    /// Fund name this movement applies to.
    pub fondo: String,
    #[serde(rename = "tipo_transaccion")]
    pub kind: TransactionKind,
    #[serde(with = "rust_decimal::serde::float")]
    pub monto: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl Transaction {
    pub fn new(
        id: impl Into<String>,
        fondo: impl Into<String>,
        kind: TransactionKind,
        monto: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            fondo: fondo.into(),
            kind,
            monto,
            user: None,
        }
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }
}
