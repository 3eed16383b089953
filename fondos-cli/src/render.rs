//! Plain-text renderers for the one-shot commands.

use fondos_core::{BalanceSummary, Fund, Transaction};
use rust_decimal::Decimal;

/// `$1234.50`, `-$40.00`
pub fn money(amount: Decimal) -> String {
    if amount < Decimal::ZERO {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${:.2}", amount)
    }
}

fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let mut out = String::new();
    out.push_str(&line(&header_cells));
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    out.push('\n');
    for row in rows {
        out.push_str(&line(row));
        out.push('\n');
    }
    out
}

pub fn funds_table(funds: &[Fund]) -> String {
    if funds.is_empty() {
        return "No funds available.\n".to_string();
    }
    let rows: Vec<Vec<String>> = funds
        .iter()
        .map(|f| vec![f.nombre.clone(), f.categoria.clone(), money(f.monto_minimo)])
        .collect();
    table(&["NAME", "CATEGORY", "MINIMUM"], &rows)
}

pub fn balance_summary(summary: &BalanceSummary) -> String {
    if summary.is_empty() {
        return "No investments yet.\n".to_string();
    }
    let mut rows: Vec<Vec<String>> = summary
        .iter()
        .map(|(fund, net)| vec![fund.to_string(), money(net)])
        .collect();
    rows.push(vec!["TOTAL".to_string(), money(summary.total())]);
    table(&["FUND", "BALANCE"], &rows)
}

pub fn transactions_table(transactions: &[Transaction]) -> String {
    if transactions.is_empty() {
        return "No transactions.\n".to_string();
    }
    let rows: Vec<Vec<String>> = transactions
        .iter()
        .map(|t| {
            vec![
                t.id.clone(),
                t.fondo.clone(),
                t.kind.label().to_string(),
                money(t.monto),
            ]
        })
        .collect();
    table(&["ID", "FUND", "TYPE", "AMOUNT"], &rows)
}
