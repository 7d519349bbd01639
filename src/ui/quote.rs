// ============================================================================
// Fiche détaillée d'une action
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::{App, LoadState};
use crate::format::{currency_symbol, fixed2, group_thousands, plain, signed2};
use crate::models::QuoteDetails;
use crate::theme::Palette;
use crate::ui::dashboard::themed_block;

pub fn render_quote(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let ticker = app.quote_ticker.as_deref().unwrap_or("");

    let message = match &app.quote {
        LoadState::Loaded(quote) => {
            render_details(frame, quote, palette, area);
            return;
        }
        LoadState::Idle => "Aucune action sélectionnée".to_string(),
        LoadState::Loading => format!("Chargement de {}...", ticker),
        LoadState::NotFound(ticker) => format!("Action introuvable : {}", ticker),
        LoadState::Failed(error) => error.clone(),
    };

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(palette.dimmed))),
    ];
    let paragraph = Paragraph::new(text)
        .block(themed_block(format!(" {} ", ticker), palette))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn render_details(frame: &mut Frame, quote: &QuoteDetails, palette: &Palette, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    let cur = currency_symbol(quote.currency.as_deref());
    let trend = Style::default().fg(palette.trend(quote.day_change()));

    // Prix et variation du jour
    let summary = vec![
        Line::from(vec![
            Span::styled(
                format!("{}{}", cur, fixed2(quote.current_price)),
                Style::default().fg(palette.text).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(
                    "   {} ({}%)",
                    signed2(quote.day_change()),
                    signed2(quote.day_percent())
                ),
                trend,
            ),
        ]),
        Line::from(Span::styled(
            quote.long_name.clone().unwrap_or_default(),
            Style::default().fg(palette.dimmed),
        )),
    ];
    let paragraph = Paragraph::new(summary).block(themed_block(format!(" {} ", quote.title()), palette));
    frame.render_widget(paragraph, chunks[0]);

    // Tableau des indicateurs
    let range = |low: Option<f64>, high: Option<f64>| format!("{} - {}", fixed2(low), fixed2(high));
    let order = |price: Option<f64>, size: Option<f64>| format!("{} × {}", fixed2(price), plain(size));

    let fields = [
        ("Clôture précédente", fixed2(quote.previous_close)),
        ("Ouverture", fixed2(quote.open)),
        ("Achat (bid)", order(quote.bid, quote.bid_size)),
        ("Vente (ask)", order(quote.ask, quote.ask_size)),
        ("Fourchette du jour", range(quote.day_low, quote.day_high)),
        ("Fourchette 52 semaines", range(quote.fifty_two_week_low, quote.fifty_two_week_high)),
        ("Volume", group_thousands(quote.volume)),
        ("Volume moyen", group_thousands(quote.average_volume)),
        ("Capitalisation", group_thousands(quote.market_cap)),
        ("Objectif de cours moyen", fixed2(quote.target_mean_price)),
    ];

    let rows: Vec<Row> = fields
        .into_iter()
        .map(|(label, value)| {
            Row::new(vec![
                Cell::from(label).style(Style::default().fg(palette.dimmed)),
                Cell::from(value).style(Style::default().fg(palette.text)),
            ])
        })
        .collect();

    let widths = [Constraint::Length(26), Constraint::Min(10)];
    let table = Table::new(rows, widths).block(themed_block(" Indicateurs ", palette));
    frame.render_widget(table, chunks[1]);
}
