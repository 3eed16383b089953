//! Response bodies as the service actually sends them.
//!
//! The fund listing returns raw DynamoDB scan items, so a field may be a
//! plain JSON value or an attribute wrapper like `{"S": "FPV"}` /
//! `{"N": "75000"}`. Everything is normalized here, at the boundary, and a
//! missing or malformed field is a `DecodeError` rather than an empty value.

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;

use fondos_core::{Fund, Transaction, TransactionKind};

use crate::error::DecodeError;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireValue {
    Text(String),
    Number(serde_json::Number),
    Attr(AttrValue),
}

#[derive(Debug, Deserialize)]
struct AttrValue {
    #[serde(rename = "S")]
    s: Option<String>,
    #[serde(rename = "N")]
    n: Option<String>,
}

impl WireValue {
    fn text(self, field: &'static str) -> Result<String, DecodeError> {
        match self {
            WireValue::Text(s) | WireValue::Attr(AttrValue { s: Some(s), .. }) => Ok(s),
            WireValue::Number(n) => Ok(n.to_string()),
            WireValue::Attr(AttrValue { n: Some(n), .. }) => Ok(n),
            WireValue::Attr(_) => Err(DecodeError::Field {
                field,
                reason: "attribute has no S or N value".to_string(),
            }),
        }
    }

    fn decimal(self, field: &'static str) -> Result<Decimal, DecodeError> {
        let raw = match self {
            WireValue::Number(n) => n.to_string(),
            other => other.text(field)?,
        };
        let raw = raw.trim();
        Decimal::from_str(raw)
            .or_else(|_| Decimal::from_scientific(raw))
            .map_err(|_| DecodeError::Field {
                field,
                reason: format!("not a number: {raw:?}"),
            })
    }
}

#[derive(Debug, Deserialize)]
struct RawFund {
    nombre: Option<WireValue>,
    categoria: Option<WireValue>,
    monto_minimo: Option<WireValue>,
}

#[derive(Debug, Deserialize)]
struct RawTransaction {
    id: Option<WireValue>,
    user: Option<WireValue>,
    fondo: Option<WireValue>,
    tipo_transaccion: Option<WireValue>,
    monto: Option<WireValue>,
}

fn present(value: Option<WireValue>, field: &'static str) -> Result<WireValue, DecodeError> {
    value.ok_or_else(|| DecodeError::Field {
        field,
        reason: "missing".to_string(),
    })
}

impl TryFrom<RawFund> for Fund {
    type Error = DecodeError;

    fn try_from(raw: RawFund) -> Result<Self, Self::Error> {
        Ok(Fund {
            nombre: present(raw.nombre, "nombre")?.text("nombre")?,
            categoria: present(raw.categoria, "categoria")?.text("categoria")?,
            monto_minimo: present(raw.monto_minimo, "monto_minimo")?.decimal("monto_minimo")?,
        })
    }
}

impl TryFrom<RawTransaction> for Transaction {
    type Error = DecodeError;

    fn try_from(raw: RawTransaction) -> Result<Self, Self::Error> {
        let user = match raw.user {
            Some(v) => Some(v.text("user")?),
            None => None,
        };
        let kind = present(raw.tipo_transaccion, "tipo_transaccion")?.text("tipo_transaccion")?;
        Ok(Transaction {
            id: present(raw.id, "id")?.text("id")?,
            fondo: present(raw.fondo, "fondo")?.text("fondo")?,
            kind: TransactionKind::from(kind),
            monto: present(raw.monto, "monto")?.decimal("monto")?,
            user,
        })
    }
}

pub fn decode_funds(body: &str) -> Result<Vec<Fund>, DecodeError> {
    let raw: Vec<RawFund> = serde_json::from_str(body)?;
    raw.into_iter().map(Fund::try_from).collect()
}

pub fn decode_transactions(body: &str) -> Result<Vec<Transaction>, DecodeError> {
    let raw: Vec<RawTransaction> = serde_json::from_str(body)?;
    raw.into_iter().map(Transaction::try_from).collect()
}

/// Body of a successful subscribe / create-transaction call.
///
/// The service does not promise a shape here; the subscribe endpoint may
/// even answer with an empty body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Confirmation {
    pub message: Option<String>,
    pub raw: Value,
}

pub fn decode_confirmation(body: &str) -> Result<Confirmation, DecodeError> {
    if body.trim().is_empty() {
        return Ok(Confirmation::default());
    }
    let raw: Value = serde_json::from_str(body)?;
    let message = raw
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string);
    Ok(Confirmation { message, raw })
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<Value>,
    message: Option<Value>,
}

/// User-facing message for a non-2xx response.
///
/// Prefers `error`, then `message`, then a generic line with the status code.
pub fn error_message(status: u16, body: &str) -> String {
    let from_body = serde_json::from_str::<ErrorBody>(body).ok().and_then(|b| {
        [b.error, b.message]
            .into_iter()
            .flatten()
            .find_map(|v| match v {
                Value::String(s) if !s.trim().is_empty() => Some(s),
                _ => None,
            })
    });
    from_body.unwrap_or_else(|| format!("request failed with status {status}"))
}
