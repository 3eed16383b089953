//! Input collected by the subscribe and transaction forms.
//!
//! Validation runs before any request is issued; a `FormError` blocks the
//! submission and the form stays open.

use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

use crate::fund::Fund;
use crate::requests::{FundRef, SubscriptionRequest, TransactionRequest};
use crate::transaction::TransactionKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("{0} is not a valid e-mail address")]
    InvalidEmail(String),

    #[error("{field} must be a number (got {value:?})")]
    InvalidNumber { field: &'static str, value: String },

    #[error("{0} cannot be negative")]
    Negative(&'static str),

    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),

    #[error("{0} is not an operation a user can submit")]
    UnsupportedOperation(String),
}

/// Raw text of the subscribe form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscribeForm {
    pub cedula: String,
    pub correo: String,
    pub telefono: String,
    pub saldo: String,
}

impl SubscribeForm {
    /// Validate and normalize into the request body for `fund`.
    pub fn validate(&self, fund: &Fund) -> Result<SubscriptionRequest, FormError> {
        let cedula = required("cedula", &self.cedula)?;
        let correo = required("correo", &self.correo)?;
        if !looks_like_email(&correo) {
            return Err(FormError::InvalidEmail(correo));
        }
        let telefono = required("telefono", &self.telefono)?;
        let saldo = parse_amount("saldo", &self.saldo)?;
        if saldo < Decimal::ZERO {
            return Err(FormError::Negative("saldo"));
        }

        Ok(SubscriptionRequest {
            cedula,
            correo,
            telefono,
            saldo,
            fondo: FundRef::from(fund),
        })
    }
}

/// Raw text of the deposit/withdraw form. The user id, fund and kind come
/// from the context the form was opened in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionForm {
    pub monto: String,
}

impl TransactionForm {
    pub fn validate(
        &self,
        cedula: &str,
        fondo: &str,
        kind: TransactionKind,
    ) -> Result<TransactionRequest, FormError> {
        let cedula = required("cedula", cedula)?;
        let fondo = required("fondo", fondo)?;
        if !kind.is_user_operation() {
            return Err(FormError::UnsupportedOperation(kind.to_string()));
        }
        let monto = parse_amount("monto", &self.monto)?;
        if monto <= Decimal::ZERO {
            return Err(FormError::NotPositive("monto"));
        }

        Ok(TransactionRequest {
            cedula,
            fondo,
            operacion: kind,
            monto,
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FormError::Required(field));
    }
    Ok(trimmed.to_string())
}

/// Parse a decimal amount the way a numeric input accepts it.
pub fn parse_amount(field: &'static str, raw: &str) -> Result<Decimal, FormError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(FormError::Required(field));
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .map_err(|_| FormError::InvalidNumber {
            field,
            value: s.to_string(),
        })
}

fn looks_like_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    match s.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fund() -> Fund {
        Fund::new("X", "Y", Decimal::from(50))
    }

    fn form() -> SubscribeForm {
        SubscribeForm {
            cedula: "123".into(),
            correo: "a@b.com".into(),
            telefono: "555".into(),
            saldo: "100".into(),
        }
    }

    #[test]
    fn test_subscribe_payload_normalized() {
        let req = form().validate(&fund()).unwrap();
        assert_eq!(req.saldo, Decimal::from(100));
        assert_eq!(req.fondo.nombre, "X");
        assert_eq!(req.fondo.categoria, "Y");

        let json = serde_json::to_value(&req).unwrap();
        assert!(json["saldo"].is_number(), "saldo must be numeric: {json}");
        assert_eq!(json["saldo"].as_f64(), Some(100.0));
        assert_eq!(json["fondo"], serde_json::json!({"nombre": "X", "categoria": "Y"}));
    }

    #[test]
    fn test_subscribe_trims_fields() {
        let mut f = form();
        f.cedula = "  123 ".into();
        assert_eq!(f.validate(&fund()).unwrap().cedula, "123");
    }

    #[test]
    fn test_subscribe_missing_fields() {
        let mut f = form();
        f.telefono = "   ".into();
        assert_eq!(f.validate(&fund()), Err(FormError::Required("telefono")));

        let mut f = form();
        f.saldo.clear();
        assert_eq!(f.validate(&fund()), Err(FormError::Required("saldo")));
    }

    #[test]
    fn test_subscribe_rejects_bad_email() {
        let mut f = form();
        f.correo = "not-an-email".into();
        assert!(matches!(f.validate(&fund()), Err(FormError::InvalidEmail(_))));
    }

    #[test]
    fn test_subscribe_rejects_non_numeric_saldo() {
        let mut f = form();
        f.saldo = "cien".into();
        assert_eq!(
            f.validate(&fund()),
            Err(FormError::InvalidNumber {
                field: "saldo",
                value: "cien".into()
            })
        );
    }

    #[test]
    fn test_subscribe_rejects_negative_saldo() {
        let mut f = form();
        f.saldo = "-5".into();
        assert_eq!(f.validate(&fund()), Err(FormError::Negative("saldo")));
    }

    #[test]
    fn test_transaction_form() {
        let form = TransactionForm { monto: "25.50".into() };
        let req = form.validate("123", "A", TransactionKind::Deposit).unwrap();
        assert_eq!(req.monto, Decimal::new(2550, 2));
        assert_eq!(req.operacion, TransactionKind::Deposit);
    }

    #[test]
    fn test_transaction_form_rejects_zero() {
        let form = TransactionForm { monto: "0".into() };
        assert_eq!(
            form.validate("123", "A", TransactionKind::Cancellation),
            Err(FormError::NotPositive("monto"))
        );
    }

    #[test]
    fn test_transaction_form_rejects_opening() {
        let form = TransactionForm { monto: "10".into() };
        assert!(matches!(
            form.validate("123", "A", TransactionKind::Opening),
            Err(FormError::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn test_scientific_amounts_parse() {
        assert_eq!(parse_amount("monto", "1e3").unwrap(), Decimal::from(1000));
    }
}
