// ============================================================================
// Tableaux paginés : classements et portfolio
// ============================================================================
// Les deux vues lisent un PagedTable : la page courante déjà triée, la
// colonne de tri (flèche dans l'en-tête) et la ligne sélectionnée.
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::format::{fixed2, signed2, truncate};
use crate::listing::{PagedTable, SortStatus, Sortable};
use crate::models::{HoldingColumn, StockColumn};
use crate::theme::Palette;
use crate::ui::dashboard::themed_block;

/// En-tête avec la flèche de tri sur la colonne active
fn header_row<'a, C: Copy + PartialEq>(
    columns: &[C],
    label: impl Fn(&C) -> &'static str,
    sort: SortStatus<C>,
    palette: &Palette,
) -> Row<'a> {
    let cells: Vec<Cell> = columns
        .iter()
        .map(|column| {
            let text = if *column == sort.column {
                format!("{} {}", label(column), sort.direction.arrow())
            } else {
                label(column).to_string()
            };
            Cell::from(text)
        })
        .collect();

    Row::new(cells).style(Style::default().fg(palette.accent).add_modifier(Modifier::BOLD))
}

/// Titre du bloc : nom + page courante
fn table_title<T: Sortable>(name: &str, table: &PagedTable<T>) -> String {
    format!(
        " {} - page {}/{} ({} lignes) ",
        name,
        table.page(),
        table.total_pages(),
        table.total_records()
    )
}

/// Message centré quand la liste n'est pas (encore) disponible
fn render_placeholder(frame: &mut Frame, title: String, message: &str, palette: &Palette, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), Style::default().fg(palette.dimmed))),
    ];
    let paragraph = Paragraph::new(text)
        .block(themed_block(title, palette))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn selected_style(style: Style, selected: bool) -> Style {
    if selected {
        style.add_modifier(Modifier::BOLD).add_modifier(Modifier::REVERSED)
    } else {
        style
    }
}

// ============================================================================
// Classements
// ============================================================================

pub fn render_rankings(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let table = &app.rankings;
    let title = table_title(app.rankings_kind.title(), table);

    if !table.is_cached() {
        let message = if app.is_loading { "Chargement..." } else { "Aucune donnée" };
        render_placeholder(frame, title, message, palette, area);
        return;
    }

    let rows: Vec<Row> = table
        .visible()
        .into_iter()
        .enumerate()
        .map(|(index, stock)| {
            let trend = Style::default().fg(palette.trend(stock.day_percent));
            let cells = vec![
                Cell::from(stock.rank.to_string()),
                Cell::from(stock.ticker.clone()),
                Cell::from(fixed2(stock.price)),
                Cell::from(format!("{}%", signed2(stock.day_percent))).style(trend),
                Cell::from(truncate(&stock.name, 30)),
                Cell::from(stock.sector.clone().unwrap_or_default()),
            ];
            Row::new(cells).style(selected_style(
                Style::default().fg(palette.text),
                index == table.selected_index(),
            ))
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Length(10),
        Constraint::Length(12),
        Constraint::Length(20),
        Constraint::Min(20),
        Constraint::Length(22),
    ];

    let widget = Table::new(rows, widths)
        .header(header_row(&StockColumn::ALL, StockColumn::label, table.sort_status(), palette))
        .block(themed_block(title, palette));

    frame.render_widget(widget, area);
}

// ============================================================================
// Portfolio
// ============================================================================

pub fn render_portfolio(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let table = &app.portfolio;
    let title = table_title("💼 Portfolio", table);

    if !table.is_cached() {
        let message = if app.is_loading { "Chargement..." } else { "Aucune donnée" };
        render_placeholder(frame, title, message, palette, area);
        return;
    }
    if table.total_records() == 0 {
        render_placeholder(frame, title, "Vous ne possédez aucune action", palette, area);
        return;
    }

    let rows: Vec<Row> = table
        .visible()
        .into_iter()
        .enumerate()
        .map(|(index, holding)| {
            let today = Style::default().fg(palette.trend(Some(holding.today_return.amount)));
            let total = Style::default().fg(palette.trend(Some(holding.total_return.amount)));
            let cells = vec![
                Cell::from(holding.ticker.clone()),
                Cell::from(holding.qty.to_string()),
                Cell::from(fixed2(Some(holding.total_value))),
                Cell::from(format!(
                    "{} ({}%)",
                    signed2(Some(holding.today_return.amount)),
                    signed2(Some(holding.today_return.percent))
                ))
                .style(today),
                Cell::from(format!(
                    "{} ({}%)",
                    signed2(Some(holding.total_return.amount)),
                    signed2(Some(holding.total_return.percent))
                ))
                .style(total),
                Cell::from(fixed2(Some(holding.price))),
            ];
            Row::new(cells).style(selected_style(
                Style::default().fg(palette.text),
                index == table.selected_index(),
            ))
        })
        .collect();

    let widths = [
        Constraint::Length(10),
        Constraint::Length(9),
        Constraint::Length(14),
        Constraint::Length(20),
        Constraint::Length(20),
        Constraint::Min(12),
    ];

    let widget = Table::new(rows, widths)
        .header(header_row(&HoldingColumn::ALL, HoldingColumn::label, table.sort_status(), palette))
        .block(themed_block(title, palette));

    frame.render_widget(widget, area);
}
