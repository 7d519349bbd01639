// ============================================================================
// Gestion des événements
// ============================================================================
// Gère les événements clavier et les ticks de l'application
//
// CONCEPTS RUST :
// 1. Enums avec variants : représenter différents types d'événements
// 2. Pattern matching sur KeyCode et KeyModifiers
// 3. Error handling avec Result
// ============================================================================

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Événements de l'application
#[derive(Debug, Clone)]
pub enum Event {
    /// Touche pressée
    Key(KeyEvent),

    /// Tick régulier (notifications, recherche différée)
    Tick,
}

/// Gestionnaire d'événements
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new() -> Self {
        Self {
            tick_rate: Duration::from_millis(100),
        }
    }

    /// Lit le prochain événement (bloquant avec timeout)
    ///
    /// CONCEPT : Non-blocking I/O avec timeout
    /// - poll(timeout) attend au plus tick_rate
    /// - Si pas d'événement, retourne Ok(Event::Tick)
    pub fn next(&self) -> Result<Event> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                // Sur certains OS, on reçoit Press ET Release
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Ok(Event::Key(key)),
                _ => Ok(Event::Tick),
            }
        } else {
            Ok(Event::Tick)
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Helpers : Convertir KeyEvent en action
// ============================================================================

fn key_code(event: &Event) -> Option<KeyCode> {
    match event {
        Event::Key(key) => Some(key.code),
        Event::Tick => None,
    }
}

/// Vérifie si l'événement est la touche 'q' (quitter)
pub fn is_quit_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char('q') | KeyCode::Char('Q')))
}

/// Ctrl+C : sortie immédiate, quel que soit le mode
pub fn is_interrupt_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
    } else {
        false
    }
}

pub fn is_escape_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Esc))
}

pub fn is_enter_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Enter))
}

pub fn is_backspace_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Backspace))
}

/// Flèche vers le haut ou 'k' (vim)
pub fn is_up_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K')))
}

/// Flèche vers le bas ou 'j' (vim)
pub fn is_down_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J')))
}

/// Page précédente
pub fn is_previous_page_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Left | KeyCode::PageUp | KeyCode::Char('h')))
}

/// Page suivante
pub fn is_next_page_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Right | KeyCode::PageDown))
}

/// Champ suivant d'un formulaire
pub fn is_next_field_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Tab | KeyCode::Down))
}

/// Champ précédent d'un formulaire
pub fn is_previous_field_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::BackTab | KeyCode::Up))
}

/// F2 : bascule connexion / inscription
pub fn is_switch_form_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::F(2)))
}

/// Vérifie si l'événement est exactement le caractère `c`
pub fn is_char_event(event: &Event, c: char) -> bool {
    key_code(event) == Some(KeyCode::Char(c))
}

/// Extrait le caractère d'un événement clavier si c'est un caractère
pub fn get_char_from_event(event: &Event) -> Option<char> {
    match key_code(event) {
        Some(KeyCode::Char(c)) => Some(c),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
