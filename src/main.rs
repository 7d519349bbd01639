// ============================================================================
// LazyStocks - Client terminal de l'API de trading
// ============================================================================
// Sans argument : interface TUI (recherche, fiches, classements, portfolio,
// ordres d'achat / vente, compte).
// Avec une sous-commande : un seul appel, résultat sur stdout.
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : boucle qui gère événements et rendering
// 3. Async dans sync : worker thread avec son propre runtime tokio
// 4. Restauration du terminal même en cas d'erreur
// ============================================================================

mod cli;

use std::io;
use std::path::Path;
use std::sync::{mpsc, Arc, Mutex, MutexGuard};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info, warn};

use lazystocks::api::{ApiClient, TradeSide};
use lazystocks::app::{App, Screen};
use lazystocks::config::Config;
use lazystocks::models::ListKind;
use lazystocks::storage::LocalStore;
use lazystocks::ui::{events::EventHandler, render};
use lazystocks::worker::{spawn_worker, AppCommand, AppResult};

use cli::{Cli, Command};

// ============================================================================
// Initialisation du logging
// ============================================================================
// CONCEPT : Logging dans une app TUI
// - Les println! ne fonctionnent pas une fois le TUI lancé
// - On log vers un fichier à la place, avec rotation quotidienne
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// Les logs sont écrits dans :
/// - Linux/WSL : ~/.local/share/lazystocks/logs/lazystocks.log
/// - macOS : ~/Library/Application Support/lazystocks/logs/lazystocks.log
/// - LAZYSTOCKS_DATA_DIR/logs si la variable est définie
///
/// # Utilisation
/// ```bash
/// tail -f ~/.local/share/lazystocks/logs/lazystocks.log
/// RUST_LOG=lazystocks=trace cargo run
/// ```
fn init_logging(log_dir: &Path) -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    std::fs::create_dir_all(log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "lazystocks.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false) // Pas de codes couleur dans le fichier
                .with_target(true)
                .with_thread_ids(true) // UI et worker écrivent dans le même fichier
                .with_line_number(true),
        )
        .with(
            // Par défaut : debug pour lazystocks, info pour les dépendances
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lazystocks=debug,info".into()),
        )
        .try_init()
        .context("Échec de l'initialisation du subscriber")?;

    info!(log_dir = %log_dir.display(), "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(url) = &cli.api_url {
        config = config.with_api_url(url);
    }

    // Si init échoue, on affiche l'erreur et on continue quand même
    init_logging(&config.log_dir()).unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {}", e);
        eprintln!("   Continuing without logging...");
    });

    info!(api_url = %config.api_url, "LazyStocks starting up");

    let store = Arc::new(LocalStore::open(config.state_file())?);
    let client = ApiClient::new(config.api_url.clone(), store.clone())?;

    match cli.command.unwrap_or(Command::Tui) {
        Command::Tui => run_tui(store, client, &config),
        command => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(cli::run(command, &client, &config))
        }
    }
}

/// Lance l'interface interactive
fn run_tui(store: Arc<LocalStore>, client: ApiClient, config: &Config) -> Result<()> {
    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    // CONCEPT RUST : Arc<Mutex<>> pour partage entre threads
    // - L'UI et le worker accèdent tous les deux à App
    let app = Arc::new(Mutex::new(App::new(store, config)));

    let (command_tx, command_rx) = mpsc::channel::<AppCommand>();
    let (result_tx, result_rx) = mpsc::channel::<AppResult>();

    info!("Spawning background worker thread");
    spawn_worker(command_rx, result_tx, app.clone(), client.clone());

    // Session sauvegardée : on recharge le profil
    if client.has_session() {
        send(&command_tx, Some(AppCommand::LoadProfile));
    }

    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, app, &events, command_tx, result_rx);

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

// ============================================================================
// Event Loop Principal
// ============================================================================
// À chaque itération :
//   0. Résultats du worker
//   1. Render
//   2. Input
//   3. Update (notifications expirées, recherche différée)
// ============================================================================

/// Verrouille l'état partagé
///
/// Un verrou empoisonné veut dire que le worker a paniqué en le tenant :
/// on arrête la boucle avec une erreur plutôt que de paniquer à notre tour.
fn lock(app: &Mutex<App>) -> Result<MutexGuard<'_, App>> {
    app.lock().map_err(|_| anyhow!("état de l'application verrouillé par un thread en panique"))
}

/// Envoie une commande au worker ; retourne false si le channel est fermé
fn send(command_tx: &mpsc::Sender<AppCommand>, command: Option<AppCommand>) -> bool {
    let Some(command) = command else {
        return true;
    };
    let name = command.name();
    if command_tx.send(command).is_err() {
        warn!(command = name, "Worker channel closed, command dropped");
        return false;
    }
    true
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: Arc<Mutex<App>>,
    events: &EventHandler,
    command_tx: mpsc::Sender<AppCommand>,
    result_rx: mpsc::Receiver<AppResult>,
) -> Result<()> {
    loop {
        if !lock(&app)?.is_running() {
            break;
        }

        // ========================================
        // 0. RÉSULTATS : try_recv ne bloque pas
        // ========================================
        loop {
            match result_rx.try_recv() {
                Ok(result) => {
                    let follow_up = lock(&app)?.apply(result);
                    send(&command_tx, follow_up);
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    error!("Worker thread disconnected!");
                    break;
                }
            }
        }

        // ========================================
        // 1. RENDER
        // ========================================
        {
            let app_lock = lock(&app)?;
            terminal.draw(|frame| render(frame, &app_lock))?;
        }

        // ========================================
        // 2. INPUT
        // ========================================
        if let Ok(event) = events.next() {
            // Le verrou est relâché avant l'envoi : le worker le prend dans start_loading
            let mut app_lock = lock(&app)?;
            let command = handle_event(&mut app_lock, event);
            drop(app_lock);
            send(&command_tx, command);
        }

        // ========================================
        // 3. UPDATE
        // ========================================
        let command = lock(&app)?.tick();
        send(&command_tx, command);
    }

    Ok(())
}

// ============================================================================
// Gestion des événements
// ============================================================================
// Ordre de priorité :
// 1. Ctrl+C
// 2. Saisie modale (recherche, quantité)
// 3. Formulaires (toutes les lettres vont dans les champs)
// 4. Raccourcis globaux puis raccourcis de l'écran courant
// ============================================================================

/// Traite un événement et retourne la commande à envoyer au worker
fn handle_event(app: &mut App, event: lazystocks::ui::events::Event) -> Option<AppCommand> {
    use lazystocks::ui::events::{is_interrupt_event, Event};

    if let Event::Tick = event {
        return None;
    }

    if is_interrupt_event(&event) {
        info!("User interrupted");
        app.quit();
        return None;
    }

    if app.prompt.is_some() {
        return handle_prompt_event(app, &event);
    }

    if app.is_in_form() {
        return handle_form_event(app, &event);
    }

    handle_screen_event(app, &event)
}

fn handle_prompt_event(app: &mut App, event: &lazystocks::ui::events::Event) -> Option<AppCommand> {
    use lazystocks::ui::events::{get_char_from_event, is_backspace_event, is_enter_event, is_escape_event};

    if is_escape_event(event) {
        debug!("User cancelled input");
        app.cancel_prompt();
    } else if is_enter_event(event) {
        return app.submit_prompt();
    } else if is_backspace_event(event) {
        app.backspace();
    } else if let Some(c) = get_char_from_event(event) {
        app.append_char(c);
    }
    None
}

fn handle_form_event(app: &mut App, event: &lazystocks::ui::events::Event) -> Option<AppCommand> {
    use lazystocks::ui::events::{
        get_char_from_event, is_backspace_event, is_enter_event, is_escape_event, is_next_field_event,
        is_previous_field_event, is_switch_form_event,
    };

    if is_escape_event(event) {
        app.back();
    } else if is_enter_event(event) {
        return app.submit_form();
    } else if is_backspace_event(event) {
        app.form_backspace();
    } else if is_switch_form_event(event) {
        app.switch_form();
    } else if is_next_field_event(event) {
        app.form_next_field();
    } else if is_previous_field_event(event) {
        app.form_previous_field();
    } else if let Some(c) = get_char_from_event(event) {
        app.form_input_char(c);
    }
    None
}

fn handle_screen_event(app: &mut App, event: &lazystocks::ui::events::Event) -> Option<AppCommand> {
    use lazystocks::ui::events::{
        is_char_event, is_down_event, is_enter_event, is_escape_event, is_next_page_event,
        is_previous_page_event, is_quit_event, is_up_event,
    };

    // CONCEPT : Two-step confirmation pour éviter les quits accidentels
    if is_quit_event(event) {
        if app.is_awaiting_quit_confirmation() {
            info!("User confirmed quit");
            app.quit();
        } else {
            info!("User requested quit (awaiting confirmation)");
            app.request_quit();
        }
        return None;
    }

    // Toute autre touche annule la confirmation
    app.cancel_quit();

    if is_escape_event(event) {
        app.back();
        return None;
    }
    if is_char_event(event, '/') {
        app.start_search();
        return None;
    }
    if is_char_event(event, '1') {
        return Some(app.open_rankings(ListKind::Top));
    }
    if is_char_event(event, '2') {
        return Some(app.open_rankings(ListKind::Trending));
    }
    if is_char_event(event, '3') {
        return Some(app.open_rankings(ListKind::MostWatched));
    }
    if is_char_event(event, 'p') {
        return app.open_portfolio();
    }
    if is_char_event(event, 'a') {
        app.open_account();
        return None;
    }
    if is_char_event(event, 'c') {
        app.toggle_theme();
        return None;
    }
    if is_up_event(event) {
        app.select_up();
        return None;
    }
    if is_down_event(event) {
        app.select_down();
        return None;
    }
    if is_enter_event(event) {
        return app.open_selected();
    }

    match app.screen {
        Screen::Home if is_char_event(event, 'x') => app.clear_history(),

        Screen::Quote if is_char_event(event, 'b') => app.start_trade(TradeSide::Buy),
        Screen::Quote if is_char_event(event, 'l') && !app.is_logged_in() => app.open_login(),

        Screen::Rankings | Screen::Portfolio if is_next_page_event(event) => app.next_page(),
        Screen::Rankings | Screen::Portfolio if is_previous_page_event(event) => app.previous_page(),
        Screen::Rankings | Screen::Portfolio if is_char_event(event, 's') => app.cycle_sort_column(),
        Screen::Rankings | Screen::Portfolio if is_char_event(event, 'd') => app.flip_sort_direction(),

        Screen::Portfolio if is_char_event(event, 'b') => app.start_trade(TradeSide::Buy),
        Screen::Portfolio if is_char_event(event, 'v') => app.start_trade(TradeSide::Sell),

        Screen::Account if is_char_event(event, 'l') => app.open_login(),
        Screen::Account if is_char_event(event, 'n') => app.open_register(),
        Screen::Account if is_char_event(event, 'o') => return app.logout(),

        _ => {}
    }
    None
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================
// - Raw mode : on reçoit tous les caractères directement
// - Alternate screen : écran secondaire (ne pollue pas l'historique)
// IMPORTANT : Toujours restaurer le terminal avant de quitter !
// ============================================================================

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

/// Restaure le terminal à son état normal
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use lazystocks::ui::events::Event;

    fn app() -> App {
        App::new(Arc::new(LocalStore::in_memory()), &Config::from_lookup(|_| None).unwrap())
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::empty()))
    }

    #[test]
    fn test_send_to_closed_worker_is_not_fatal() {
        let (command_tx, command_rx) = mpsc::channel::<AppCommand>();
        assert!(send(&command_tx, Some(AppCommand::LoadProfile)));
        assert_eq!(command_rx.recv().unwrap(), AppCommand::LoadProfile);

        drop(command_rx);
        assert!(!send(&command_tx, Some(AppCommand::LoadProfile)));
        assert!(send(&command_tx, None));
    }

    #[test]
    fn test_quit_needs_two_presses() {
        let mut app = app();
        handle_event(&mut app, key(KeyCode::Char('q')));
        assert!(app.is_running());
        handle_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.is_running());
    }

    #[test]
    fn test_other_key_cancels_quit() {
        let mut app = app();
        handle_event(&mut app, key(KeyCode::Char('q')));
        handle_event(&mut app, key(KeyCode::Char('a')));
        assert!(!app.is_awaiting_quit_confirmation());
        assert_eq!(app.screen, Screen::Account);
    }

    #[test]
    fn test_rankings_shortcut_loads_list() {
        let mut app = app();
        let command = handle_event(&mut app, key(KeyCode::Char('2')));
        assert!(matches!(
            command,
            Some(AppCommand::LoadList {
                kind: ListKind::Trending,
                ..
            })
        ));
        assert_eq!(app.screen, Screen::Rankings);
    }

    #[test]
    fn test_search_prompt_captures_letters() {
        let mut app = app();
        handle_event(&mut app, key(KeyCode::Char('/')));
        for c in "qa".chars() {
            handle_event(&mut app, key(KeyCode::Char(c)));
        }
        // 'q' et 'a' vont dans la saisie, pas dans les raccourcis
        assert!(app.is_running());
        assert_eq!(app.input_buffer, "qa");

        let command = handle_event(&mut app, key(KeyCode::Enter));
        assert_eq!(command, Some(AppCommand::LoadQuote { ticker: "QA".to_string() }));
    }

    #[test]
    fn test_form_captures_letters() {
        let mut app = app();
        app.open_login();
        handle_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.is_awaiting_quit_confirmation());
        assert_eq!(app.login_form.email, "q");

        handle_event(&mut app, key(KeyCode::Esc));
        assert_eq!(app.screen, Screen::Home);
    }
}
