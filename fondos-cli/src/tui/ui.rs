use fondos_core::Modal;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
};

use super::app::Ui;
use crate::render::money;

pub fn draw(f: &mut Frame, ui: &Ui) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(f, ui, chunks[0]);
    draw_status(f, ui, chunks[1]);
    if ui.state.is_catalog_visible() {
        draw_catalog(f, ui, chunks[2]);
    } else if ui.state.is_dashboard_visible() {
        draw_dashboard(f, ui, chunks[2]);
    }
    draw_footer(f, ui, chunks[3]);

    if ui.state.modal().is_open() {
        draw_modal(f, ui);
    }
}

fn draw_header(f: &mut Frame, ui: &Ui, area: Rect) {
    let who = match ui.state.session() {
        Some(user) => format!("user {user}"),
        None => "not subscribed".to_string(),
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "Fondos",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(who, Style::default().fg(Color::Cyan)),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn draw_status(f: &mut Frame, ui: &Ui, area: Rect) {
    let status = ui.state.status();
    let mut spans = Vec::new();
    if status.loading {
        spans.push(Span::styled("Loading... ", Style::default().fg(Color::Gray)));
    }
    if let Some(err) = &status.error {
        spans.push(Span::styled(err.clone(), Style::default().fg(Color::Red)));
    } else if let Some(ok) = &status.success {
        spans.push(Span::styled(ok.clone(), Style::default().fg(Color::Green)));
    }
    if let Some(at) = ui.last_sync {
        spans.push(Span::styled(
            format!("  (synced {})", at.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_catalog(f: &mut Frame, ui: &Ui, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("funds");
    if ui.state.funds().is_empty() {
        let msg = if ui.state.status().loading {
            "Loading funds..."
        } else {
            "No funds available."
        };
        f.render_widget(Paragraph::new(msg).block(block), area);
        return;
    }

    let rows = ui.state.funds().iter().map(|fund| {
        Row::new(vec![
            Cell::from(fund.nombre.clone()),
            Cell::from(fund.categoria.clone()),
            Cell::from(money(fund.monto_minimo)),
        ])
    });
    let table = Table::new(
        rows,
        [
            Constraint::Percentage(50),
            Constraint::Percentage(20),
            Constraint::Percentage(30),
        ],
    )
    .header(
        Row::new(vec!["Name", "Category", "Minimum"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(block)
    .row_highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
    .highlight_symbol("> ");

    let mut state = TableState::default().with_selected(Some(ui.catalog_cursor));
    f.render_stateful_widget(table, area, &mut state);
}

fn draw_dashboard(f: &mut Frame, ui: &Ui, area: Rect) {
    let balances = ui.state.balances();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(rows_height(balances.len().max(1), 4)),
            Constraint::Min(3),
        ])
        .split(area);

    let summary_block = Block::default()
        .borders(Borders::ALL)
        .title("investment summary");
    if balances.is_empty() {
        f.render_widget(
            Paragraph::new("No investments yet.").block(summary_block),
            chunks[0],
        );
    } else {
        let rows = balances
            .iter()
            .map(|(fund, net)| Row::new(vec![Cell::from(fund.to_string()), Cell::from(money(net))]));
        let table = Table::new(rows, [Constraint::Percentage(60), Constraint::Percentage(40)])
            .header(
                Row::new(vec!["Fund", "Balance"])
                    .style(Style::default().add_modifier(Modifier::BOLD)),
            )
            .footer(Row::new(vec![
                Cell::from("Total"),
                Cell::from(money(balances.total())),
            ]))
            .block(summary_block)
            .row_highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
            .highlight_symbol("> ");
        let mut state = TableState::default().with_selected(Some(ui.fund_cursor));
        f.render_stateful_widget(table, chunks[0], &mut state);
    }

    let history_block = Block::default()
        .borders(Borders::ALL)
        .title("transaction history");
    let transactions = ui.state.transactions();
    if transactions.is_empty() {
        f.render_widget(
            Paragraph::new("No transactions.").block(history_block),
            chunks[1],
        );
        return;
    }
    let rows = transactions.iter().map(|t| {
        Row::new(vec![
            Cell::from(t.id.clone()),
            Cell::from(t.fondo.clone()),
            Cell::from(t.kind.label().to_string()),
            Cell::from(money(t.monto)),
        ])
    });
    let table = Table::new(
        rows,
        [
            Constraint::Percentage(25),
            Constraint::Percentage(35),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
        ],
    )
    .header(
        Row::new(vec!["Id", "Fund", "Type", "Amount"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(history_block);
    f.render_widget(table, chunks[1]);
}

fn draw_footer(f: &mut Frame, ui: &Ui, area: Rect) {
    let hints = if ui.state.modal().is_open() {
        "Enter=submit  Tab=next field  Esc=cancel"
    } else if ui.state.is_dashboard_visible() {
        "j/k=select fund  d=deposit  w=withdraw  o=logout  r=refresh  q=quit"
    } else {
        "j/k=select  Enter/s=subscribe  r=refresh  q=quit"
    };
    f.render_widget(
        Paragraph::new(Span::styled(hints, Style::default().fg(Color::Gray))),
        area,
    );
}

fn draw_modal(f: &mut Frame, ui: &Ui) {
    let title = match ui.state.modal() {
        Modal::Subscribe(fund) => format!(
            "subscribe to {} (minimum {})",
            fund.nombre,
            money(fund.monto_minimo)
        ),
        Modal::Transaction { fund, kind } => format!("{} - {}", kind.label(), fund),
        Modal::None => return,
    };

    let mut lines: Vec<Line> = Vec::new();
    if let Some(form) = &ui.form {
        for (i, field) in form.fields.iter().enumerate() {
            let focused = i == form.focus;
            let style = if field.readonly {
                Style::default().fg(Color::DarkGray)
            } else if focused {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            let cursor = if focused { "_" } else { "" };
            lines.push(Line::from(vec![
                Span::styled(format!("{:<16}", field.label), style),
                Span::raw(format!("{}{}", field.value, cursor)),
            ]));
        }
    }
    lines.push(Line::raw(""));
    let status = ui.state.status();
    if ui.state.is_submitting() {
        lines.push(Line::styled("Submitting...", Style::default().fg(Color::Gray)));
    } else if let Some(err) = &status.error {
        lines.push(Line::styled(err.clone(), Style::default().fg(Color::Red)));
    }

    let area = centered(f.area(), 60, rows_height(lines.len(), 2));
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(Text::from(lines))
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: false }),
        area,
    );
}

/// `rows` plus `chrome` lines, saturating at the largest terminal height.
fn rows_height(rows: usize, chrome: u16) -> u16 {
    u16::try_from(rows).unwrap_or(u16::MAX).saturating_add(chrome)
}

fn centered(area: Rect, percent_x: u16, height: u16) -> Rect {
    let width = (u32::from(area.width) * u32::from(percent_x.min(100)) / 100) as u16;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
