//! Request bodies sent to the fund service.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::fund::Fund;
use crate::transaction::TransactionKind;

/// The `fondo` object nested inside a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundRef {
    pub nombre: String,
    pub categoria: String,
}

impl From<&Fund> for FundRef {
    fn from(fund: &Fund) -> Self {
        Self {
            nombre: fund.nombre.clone(),
            categoria: fund.categoria.clone(),
        }
    }
}

/// `POST /subscribe`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRequest {
    pub cedula: String,
    pub correo: String,
    pub telefono: String,
    /// Opening balance; a JSON number on the wire.
    #[serde(with = "rust_decimal::serde::float")]
    pub saldo: Decimal,
    pub fondo: FundRef,
}

/// `POST /transactions`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub cedula: String,
    pub fondo: String,
    pub operacion: TransactionKind,
    #[serde(with = "rust_decimal::serde::float")]
    pub monto: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transaction_request_wire_shape() {
        let req = TransactionRequest {
            cedula: "123".into(),
            fondo: "A".into(),
            operacion: TransactionKind::Cancellation,
            monto: Decimal::new(255, 1),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({"cedula": "123", "fondo": "A", "operacion": "cancelacion", "monto": 25.5})
        );
    }
}
