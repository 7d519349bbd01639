// ============================================================================
// Formulaires (connexion, inscription) et page compte
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, LoginField, RegisterField};
use crate::theme::Palette;
use crate::ui::dashboard::{shortcut, themed_block};

/// Zone centrée de `width` × `height` dans `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Une ligne "Libellé : valeur" ; le champ actif est surligné
fn field_line<'a>(label: &'a str, value: &str, secret: bool, focused: bool, palette: &Palette) -> Line<'a> {
    let shown = if secret {
        "•".repeat(value.chars().count())
    } else {
        value.to_string()
    };
    let cursor = if focused { "█" } else { "" };

    let label_style = if focused {
        Style::default().fg(palette.accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(palette.dimmed)
    };

    Line::from(vec![
        Span::styled(format!("{:<16}", label), label_style),
        Span::styled(format!("{}{}", shown, cursor), Style::default().fg(palette.text)),
    ])
}

fn error_line<'a>(error: Option<&str>, palette: &Palette) -> Line<'a> {
    match error {
        Some(error) => Line::from(Span::styled(
            format!("✗ {}", error),
            Style::default().fg(palette.negative).add_modifier(Modifier::BOLD),
        )),
        None => Line::from(""),
    }
}

pub fn render_login(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let form = &app.login_form;
    let rect = centered(area, 60, 9);

    let lines = vec![
        Line::from(""),
        field_line("E-mail", &form.email, false, form.focus == LoginField::Email, palette),
        field_line("Mot de passe", &form.password, true, form.focus == LoginField::Password, palette),
        Line::from(""),
        error_line(form.error.as_deref(), palette),
        Line::from(Span::styled(
            "Pas encore de compte ? [F2] Inscription",
            Style::default().fg(palette.dimmed),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .block(themed_block(" 🔑 Connexion ", palette))
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, rect);
    frame.render_widget(paragraph, rect);
}

pub fn render_register(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let form = &app.register_form;
    let rect = centered(area, 64, 13);

    let mut lines = vec![Line::from("")];
    for field in RegisterField::ALL {
        let focused = form.focus == field;
        let line = match form.value(field) {
            Some(value) => field_line(field.label(), value, field.is_secret(), focused, palette),
            None => {
                let checkbox = if form.accept_terms { "[x]" } else { "[ ]" };
                let style = if focused {
                    Style::default().fg(palette.accent).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(palette.text)
                };
                Line::from(Span::styled(format!("{} {}", checkbox, field.label()), style))
            }
        };
        lines.push(line);
    }
    lines.push(Line::from(""));
    lines.push(error_line(form.error.as_deref(), palette));
    lines.push(Line::from(Span::styled(
        "Déjà inscrit ? [F2] Connexion   [Espace] cocher / décocher",
        Style::default().fg(palette.dimmed),
    )));

    let paragraph = Paragraph::new(lines)
        .block(themed_block(" 📝 Inscription ", palette))
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, rect);
    frame.render_widget(paragraph, rect);
}

pub fn render_account(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(0)])
        .split(area);

    let lines = match &app.user {
        Some(user) => vec![
            Line::from(Span::styled(
                user.display_label().to_string(),
                Style::default().fg(palette.text).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(user.email.clone(), Style::default().fg(palette.dimmed))),
            Line::from(""),
            Line::from(shortcut("o", "Se déconnecter", palette)),
        ],
        None => vec![
            Line::from(Span::styled("Vous n'êtes pas connecté", Style::default().fg(palette.dimmed))),
            Line::from(""),
            Line::from(shortcut("l", "Connexion", palette)),
            Line::from(shortcut("n", "Inscription", palette)),
        ],
    };

    let paragraph = Paragraph::new(lines)
        .block(themed_block(" 👤 Compte ", palette))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, chunks[0]);

    let theme = Paragraph::new(Line::from(vec![
        Span::styled(
            format!("Thème : {}   ", app.scheme.as_str()),
            Style::default().fg(palette.text),
        ),
        Span::styled("[c] changer", Style::default().fg(palette.accent)),
    ]))
    .block(themed_block(" Préférences ", palette))
    .alignment(Alignment::Center);
    frame.render_widget(theme, chunks[1]);
}
