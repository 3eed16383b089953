//! Fund catalog entries as listed by the service.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An investment fund users can subscribe to.
///
/// Funds are identified by `nombre` within one catalog snapshot. The client
/// never edits them; a refetch replaces the whole list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fund {
    pub nombre: String,
    pub categoria: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub monto_minimo: Decimal,
}

impl Fund {
    pub fn new(nombre: impl Into<String>, categoria: impl Into<String>, monto_minimo: Decimal) -> Self {
        Self {
            nombre: nombre.into(),
            categoria: categoria.into(),
            monto_minimo,
        }
    }

    /// Returns true if `amount` covers the fund's minimum opening amount.
    pub fn accepts_opening(&self, amount: Decimal) -> bool {
        amount >= self.monto_minimo
    }
}

/// Look up a fund by name in a catalog snapshot.
pub fn find_fund<'a>(catalog: &'a [Fund], nombre: &str) -> Option<&'a Fund> {
    catalog.iter().find(|f| f.nombre == nombre)
}
