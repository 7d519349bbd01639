// ============================================================================
// Dashboard - Rendu de l'interface principale
// ============================================================================
// Route vers l'écran actif et dessine le cadre commun :
// header (titre + utilisateur), contenu, footer (raccourcis ou saisie),
// notifications par-dessus le contenu.
//
// CONCEPTS RATATUI :
// 1. Frame : surface de dessin
// 2. Layout : découpage de l'espace en zones
// 3. Clear : efface une zone avant d'y dessiner un "popup"
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Level, Prompt, Screen};
use crate::format::{currency_symbol, fixed2};
use crate::theme::Palette;
use crate::ui::{forms, quote, tables};

/// Largeur des notifications
const NOTIFICATION_WIDTH: u16 = 48;

/// Dessine l'interface complète
///
/// CONCEPT RUST : Routing avec match sur enum
/// - Le compilateur garantit l'exhaustivité (tous les écrans gérés)
pub fn render(frame: &mut Frame, app: &App) {
    let palette = app.scheme.palette();
    let chunks = create_layout(frame.size(), app.prompt.is_some());

    render_header(frame, app, &palette, chunks[0]);

    match app.screen {
        Screen::Home => render_home(frame, app, &palette, chunks[1]),
        Screen::Quote => quote::render_quote(frame, app, &palette, chunks[1]),
        Screen::Rankings => tables::render_rankings(frame, app, &palette, chunks[1]),
        Screen::Portfolio => tables::render_portfolio(frame, app, &palette, chunks[1]),
        Screen::Account => forms::render_account(frame, app, &palette, chunks[1]),
        Screen::Login => forms::render_login(frame, app, &palette, chunks[1]),
        Screen::Register => forms::render_register(frame, app, &palette, chunks[1]),
    }

    match &app.prompt {
        Some(prompt) => render_input_footer(frame, app, prompt, &palette, chunks[2]),
        None => render_footer(frame, app, &palette, chunks[2]),
    }

    render_notifications(frame, app, &palette, chunks[1]);
}

/// Crée le layout principal (header, content, footer)
fn create_layout(area: Rect, with_prompt: bool) -> Vec<Rect> {
    let footer = if with_prompt { 4 } else { 3 };
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),      // Header
            Constraint::Min(0),         // Content : tout le reste
            Constraint::Length(footer), // Footer
        ])
        .split(area)
        .to_vec()
}

/// Bloc standard avec bordure aux couleurs du thème
pub(crate) fn themed_block<'a>(title: impl Into<Line<'a>>, palette: &Palette) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border))
        .title(title)
}

/// Raccourci clavier : "[x]" en gras + libellé
pub(crate) fn shortcut<'a>(key: &'a str, label: &'a str, palette: &Palette) -> Vec<Span<'a>> {
    vec![
        Span::styled(
            format!("[{}]", key),
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {}  ", label), Style::default().fg(palette.text)),
    ]
}

// ============================================================================
// Header
// ============================================================================

fn render_header(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let block = themed_block(" LazyStocks ", palette).title_alignment(Alignment::Center);

    let user = match &app.user {
        Some(user) => Span::styled(
            format!("👤 {}", user.display_label()),
            Style::default().fg(palette.positive).add_modifier(Modifier::BOLD),
        ),
        None => Span::styled("Non connecté", Style::default().fg(palette.dimmed)),
    };

    let mut spans = vec![user];
    if app.is_loading {
        let message = app.loading_message.as_deref().unwrap_or("Chargement...");
        spans.push(Span::styled(
            format!("   ⏳ {}", message),
            Style::default().fg(palette.accent),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .block(block)
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Accueil : historique récent
// ============================================================================

fn render_home(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let block = themed_block(" 🕘 Consultées récemment ", palette);

    if app.history.is_empty() {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Aucune action consultée",
                Style::default().fg(palette.dimmed),
            )),
            Line::from(Span::styled(
                "Appuyez sur / pour rechercher un ticker",
                Style::default().fg(palette.dimmed),
            )),
        ];
        let paragraph = Paragraph::new(text).block(block).alignment(Alignment::Center);
        frame.render_widget(paragraph, chunks[0]);
    } else {
        let items: Vec<ListItem> = app
            .history
            .newest_first()
            .into_iter()
            .enumerate()
            .map(|(index, stock)| {
                let line = format!(" {:<8} {}", stock.ticker, stock.name);
                let style = Style::default().fg(palette.text);
                if index == app.history_index {
                    ListItem::new(line).style(style.add_modifier(Modifier::BOLD).add_modifier(Modifier::REVERSED))
                } else {
                    ListItem::new(line).style(style)
                }
            })
            .collect();

        frame.render_widget(List::new(items).block(block), chunks[0]);
    }

    let menu = [
        ("/", "Rechercher un ticker"),
        ("1", "Top 10"),
        ("2", "Tendances"),
        ("3", "Les plus suivies"),
        ("p", "Portfolio"),
        ("a", "Compte"),
        ("c", "Thème clair / sombre"),
        ("x", "Effacer l'historique"),
    ];
    let lines: Vec<Line> = menu
        .iter()
        .map(|(key, label)| Line::from(shortcut(key, label, palette)))
        .collect();

    let paragraph = Paragraph::new(lines).block(themed_block(" Menu ", palette));
    frame.render_widget(paragraph, chunks[1]);
}

// ============================================================================
// Footer : raccourcis de l'écran actif
// ============================================================================

fn render_footer(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let block = themed_block("", palette);

    let line = if app.is_awaiting_quit_confirmation() {
        Line::from(vec![
            Span::styled(
                "⚠  Appuyez sur ",
                Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "[q]",
                Style::default()
                    .fg(palette.negative)
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(
                " à nouveau pour quitter, ou n'importe quelle autre touche pour annuler ⚠",
                Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
            ),
        ])
    } else {
        let keys: &[(&str, &str)] = match app.screen {
            Screen::Home => &[
                ("q", "Quitter"),
                ("↑↓", "Naviguer"),
                ("Enter", "Ouvrir"),
                ("/", "Rechercher"),
                ("Esc", "Effacer les notifications"),
            ],
            Screen::Quote if app.is_logged_in() => &[("Esc", "Retour"), ("b", "Acheter"), ("/", "Rechercher")],
            Screen::Quote => &[("Esc", "Retour"), ("l", "Connexion"), ("/", "Rechercher")],
            Screen::Rankings => &[
                ("Esc", "Retour"),
                ("↑↓", "Naviguer"),
                ("←→", "Page"),
                ("s", "Trier"),
                ("d", "Sens"),
                ("Enter", "Ouvrir"),
            ],
            Screen::Portfolio => &[
                ("Esc", "Retour"),
                ("←→", "Page"),
                ("s", "Trier"),
                ("d", "Sens"),
                ("b", "Acheter"),
                ("v", "Vendre"),
            ],
            Screen::Account if app.is_logged_in() => &[("Esc", "Retour"), ("o", "Déconnexion")],
            Screen::Account => &[("Esc", "Retour"), ("l", "Connexion"), ("n", "Inscription")],
            Screen::Login | Screen::Register => &[
                ("Esc", "Annuler"),
                ("Tab", "Champ suivant"),
                ("Enter", "Valider"),
                ("F2", "Connexion / Inscription"),
            ],
        };
        Line::from(
            keys.iter()
                .flat_map(|(key, label)| shortcut(key, label, palette))
                .collect::<Vec<_>>(),
        )
    };

    let paragraph = Paragraph::new(vec![line]).block(block).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Input Mode : recherche ou quantité
// ============================================================================

/// Dessine la ligne de saisie
///
/// CONCEPT : Modal input (Vim-like)
/// - Recherche : aperçu du résultat sur la seconde ligne
/// - Quantité : prix unitaire et maximum sur la seconde ligne
fn render_input_footer(frame: &mut Frame, app: &App, prompt: &Prompt, palette: &Palette, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.positive));

    let label = match prompt {
        Prompt::Search => "Rechercher : ".to_string(),
        Prompt::Quantity(ticket) => format!("{} {} - quantité : ", ticket.side.label(), ticket.ticker),
    };

    let input_line = Line::from(vec![
        Span::styled(label, Style::default().fg(palette.border).add_modifier(Modifier::BOLD)),
        Span::styled(&app.input_buffer, Style::default().fg(palette.text)),
        Span::styled("█", Style::default().fg(palette.text).add_modifier(Modifier::SLOW_BLINK)),
    ]);

    let detail_line = match prompt {
        Prompt::Search => match &app.search.preview {
            Some(result) if result.matches(&app.input_buffer) => {
                let trend = if result.is_trend_down() {
                    Span::styled("▼ ", Style::default().fg(palette.negative))
                } else {
                    Span::styled("▲ ", Style::default().fg(palette.positive))
                };
                Line::from(vec![
                    trend,
                    Span::styled(
                        result.ticker.clone(),
                        Style::default().fg(palette.text).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(format!("  {}", result.name), Style::default().fg(palette.dimmed)),
                ])
            }
            _ => Line::from(Span::styled(
                "[Enter] Ouvrir la fiche  [Esc] Annuler",
                Style::default().fg(palette.dimmed),
            )),
        },
        Prompt::Quantity(ticket) => {
            let mut text = format!(
                "Prix actuel : {}{}",
                currency_symbol(ticket.currency.as_deref()),
                fixed2(ticket.price)
            );
            if let Some(max) = ticket.max {
                text.push_str(&format!("   (max {})", max));
            }
            text.push_str("   [Enter] Valider  [Esc] Annuler");
            Line::from(Span::styled(text, Style::default().fg(palette.dimmed)))
        }
    };

    let paragraph = Paragraph::new(vec![input_line, detail_line])
        .block(block)
        .alignment(Alignment::Left);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Notifications (coin inférieur droit du contenu)
// ============================================================================

fn render_notifications(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let mut bottom = area.y + area.height;

    for notification in app.notifications.items().iter().rev() {
        let height = 4;
        if bottom < area.y + height || area.width < NOTIFICATION_WIDTH {
            break;
        }
        bottom -= height;

        let rect = Rect {
            x: area.x + area.width - NOTIFICATION_WIDTH,
            y: bottom,
            width: NOTIFICATION_WIDTH,
            height,
        };

        let color = match notification.level {
            Level::Pending => palette.accent,
            Level::Info => palette.border,
            Level::Success => palette.positive,
            Level::Error => palette.negative,
        };
        let icon = match notification.level {
            Level::Pending => "⏳",
            Level::Info => "ℹ",
            Level::Success => "✓",
            Level::Error => "✗",
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(Span::styled(
                format!(" {} {} ", icon, notification.title),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ));
        let paragraph = Paragraph::new(notification.message.as_str())
            .style(Style::default().fg(palette.text))
            .wrap(Wrap { trim: true })
            .block(block);

        frame.render_widget(Clear, rect);
        frame.render_widget(paragraph, rect);
    }
}
