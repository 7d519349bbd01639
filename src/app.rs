// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état global de l'application TUI
//
// CONCEPTS RUST :
// 1. State Management : centraliser l'état dans une seule structure
// 2. Les méthodes qui déclenchent un appel réseau retournent
//    Option<AppCommand> : l'event loop l'envoie au worker
// 3. apply(AppResult) : seul point d'entrée des réponses du worker
//
// PATTERN : "Application State"
// - Tous les composants de l'UI lisent depuis App
// - Toutes les modifications passent par les méthodes de App
// ============================================================================

mod forms;
mod notifications;

use std::sync::Arc;

use chrono::{DateTime, Duration, Local};
use tracing::{debug, info, warn};

pub use forms::{LoginField, LoginForm, RegisterField, RegisterForm};
pub use notifications::{Level, Notification, Notifications};

use crate::api::{validate_qty, TradeSide};
use crate::config::{Config, SEARCH_DEBOUNCE};
use crate::error::{Action, ApiError};
use crate::format::currency_symbol;
use crate::history::RecentHistory;
use crate::listing::PagedTable;
use crate::models::{
    Holding, HoldingColumn, ListKind, QuoteDetails, SearchResult, Stock, StockColumn, StockRef, User,
};
use crate::storage::LocalStore;
use crate::theme::ColorScheme;
use crate::worker::{AppCommand, AppResult};

/// Clé de la notification d'ordre (mise à jour en place)
const TRADE_NOTIFICATION: &str = "trade";

// ============================================================================
// Enum : Screen
// ============================================================================

/// Écrans de l'application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Accueil : historique récent et raccourcis
    Home,

    /// Fiche détaillée d'une action
    Quote,

    /// Classement (top, tendances, plus suivies)
    Rankings,

    Portfolio,

    /// Profil et déconnexion
    Account,

    Login,

    Register,
}

/// Ordre en cours de saisie
#[derive(Debug, Clone, PartialEq)]
pub struct TradeTicket {
    pub side: TradeSide,
    pub ticker: String,
    pub currency: Option<String>,
    pub price: Option<f64>,
    /// Quantité maximale (vente d'une position)
    pub max: Option<u32>,
}

/// Saisie modale en bas de l'écran
///
/// CONCEPT : Modal input (Vim-like)
/// - Capture les touches pour construire un buffer
/// - Enter valide, ESC annule
#[derive(Debug, Clone, PartialEq)]
pub enum Prompt {
    /// Recherche d'un ticker, avec aperçu
    Search,

    /// Quantité d'un ordre
    Quantity(TradeTicket),
}

/// État d'un chargement
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Idle,
    Loading,
    Loaded(T),
    /// Ticker inconnu
    NotFound(String),
    Failed(String),
}

/// Recherche rapide avec délai anti-rebond
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    /// Instant de la dernière frappe non encore envoyée
    pub pending_since: Option<DateTime<Local>>,
    /// Dernière requête envoyée au worker
    pub last_sent: String,
    pub preview: Option<SearchResult>,
}

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Two-step quit pour éviter les sorties accidentelles
    pub confirm_quit: bool,

    pub is_loading: bool,
    pub loading_message: Option<String>,

    pub screen: Screen,

    /// Écran à retrouver après un formulaire
    pub return_screen: Screen,

    pub prompt: Option<Prompt>,
    pub input_buffer: String,
    pub search: SearchState,

    /// Utilisateur connecté
    pub user: Option<User>,

    pub scheme: ColorScheme,

    pub history: RecentHistory,
    pub history_index: usize,

    pub quote_ticker: Option<String>,
    pub quote: LoadState<QuoteDetails>,

    pub rankings_kind: ListKind,
    pub rankings: PagedTable<Stock>,
    pub portfolio: PagedTable<Holding>,

    pub login_form: LoginForm,
    pub register_form: RegisterForm,

    pub notifications: Notifications,

    store: Arc<LocalStore>,
}

impl App {
    /// Crée l'état initial à partir de l'état local sauvegardé
    pub fn new(store: Arc<LocalStore>, config: &Config) -> Self {
        let history = RecentHistory::from_entries(store.history(), config.history_size);
        let scheme = ColorScheme::from_saved(store.theme().as_deref());

        Self {
            running: true,
            confirm_quit: false,
            is_loading: false,
            loading_message: None,
            screen: Screen::Home,
            return_screen: Screen::Home,
            prompt: None,
            input_buffer: String::new(),
            search: SearchState::default(),
            user: None,
            scheme,
            history,
            history_index: 0,
            quote_ticker: None,
            quote: LoadState::Idle,
            rankings_kind: ListKind::Top,
            rankings: PagedTable::new(StockColumn::Rank, config.page_size),
            portfolio: PagedTable::new(HoldingColumn::Ticker, config.page_size),
            login_form: LoginForm::default(),
            register_form: RegisterForm::default(),
            notifications: Notifications::new(),
            store,
        }
    }

    // ========================================================================
    // Cycle de vie
    // ========================================================================

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    pub fn start_loading(&mut self, message: Option<String>) {
        self.is_loading = true;
        self.loading_message = message;
    }

    pub fn stop_loading(&mut self) {
        self.is_loading = false;
        self.loading_message = None;
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    /// Tick : appelé à chaque itération de la boucle
    pub fn tick(&mut self) -> Option<AppCommand> {
        self.tick_at(Local::now())
    }

    /// Ferme les notifications expirées et envoie la recherche en attente
    ///
    /// CONCEPT : Debounce
    /// - chaque frappe repousse l'envoi
    /// - la requête part SEARCH_DEBOUNCE après la dernière frappe
    /// - une requête identique à la précédente n'est pas renvoyée
    pub fn tick_at(&mut self, now: DateTime<Local>) -> Option<AppCommand> {
        self.notifications.prune(now);

        if self.prompt != Some(Prompt::Search) {
            return None;
        }
        let since = self.search.pending_since?;
        let debounce = Duration::milliseconds(SEARCH_DEBOUNCE.as_millis() as i64);
        if now - since < debounce {
            return None;
        }

        self.search.pending_since = None;
        let query = self.input_buffer.trim().to_string();
        if query == self.search.last_sent {
            return None;
        }
        self.search.last_sent = query.clone();

        if query.is_empty() {
            self.search.preview = None;
            return None;
        }
        debug!(%query, "Debounced search");
        Some(AppCommand::Search { query })
    }

    // ========================================================================
    // Navigation entre écrans
    // ========================================================================

    pub fn go_home(&mut self) {
        self.screen = Screen::Home;
    }

    /// ESC : formulaire -> écran précédent, accueil -> efface les
    /// notifications, sinon retour à l'accueil
    pub fn back(&mut self) {
        match self.screen {
            Screen::Login | Screen::Register => self.screen = self.return_screen,
            Screen::Home => self.notifications.dismiss_all(),
            _ => self.go_home(),
        }
    }

    /// Ouvre la fiche d'une action
    pub fn open_quote(&mut self, ticker: &str) -> Option<AppCommand> {
        let ticker = ticker.trim().to_uppercase();
        if ticker.is_empty() {
            return None;
        }

        info!(%ticker, "Opening quote");
        self.screen = Screen::Quote;
        self.quote_ticker = Some(ticker.clone());
        self.quote = LoadState::Loading;
        Some(AppCommand::LoadQuote { ticker })
    }

    /// Ouvre un classement ; la liste est toujours rechargée
    pub fn open_rankings(&mut self, kind: ListKind) -> AppCommand {
        info!(?kind, "Opening rankings");
        self.screen = Screen::Rankings;
        self.rankings_kind = kind;
        self.rankings.clear();
        AppCommand::LoadList {
            kind,
            count: kind.default_count(),
        }
    }

    /// Ouvre le portfolio (connexion requise)
    pub fn open_portfolio(&mut self) -> Option<AppCommand> {
        if !self.is_logged_in() {
            self.notify(Level::Info, "Portfolio", "Connectez-vous pour voir votre portfolio.");
            self.open_login();
            return None;
        }

        self.screen = Screen::Portfolio;
        self.portfolio.clear();
        Some(AppCommand::LoadPortfolio)
    }

    pub fn open_account(&mut self) {
        self.screen = Screen::Account;
    }

    fn remember_return_screen(&mut self) {
        if !matches!(self.screen, Screen::Login | Screen::Register) {
            self.return_screen = self.screen;
        }
    }

    pub fn open_login(&mut self) {
        self.remember_return_screen();
        self.login_form = LoginForm::default();
        self.screen = Screen::Login;
    }

    pub fn open_register(&mut self) {
        self.remember_return_screen();
        self.register_form = RegisterForm::default();
        self.screen = Screen::Register;
    }

    /// Déconnexion (si connecté)
    pub fn logout(&mut self) -> Option<AppCommand> {
        self.is_logged_in().then_some(AppCommand::Logout)
    }

    // ========================================================================
    // Thème et historique
    // ========================================================================

    /// Bascule clair / sombre et sauvegarde la préférence
    pub fn toggle_theme(&mut self) {
        self.scheme = self.scheme.toggle();
        if let Err(e) = self.store.set_theme(self.scheme.as_str()) {
            warn!(error = ?e, "Failed to save theme");
        }
    }

    /// Ajoute une action à l'historique et le sauvegarde
    pub fn record_history(&mut self, stock: StockRef) {
        self.history.push(stock);
        self.history_index = 0;
        if let Err(e) = self.store.set_history(self.history.entries()) {
            warn!(error = ?e, "Failed to save history");
        }
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        self.history_index = 0;
        if let Err(e) = self.store.clear_history() {
            warn!(error = ?e, "Failed to clear history");
        }
    }

    /// Entrée sélectionnée (affichage du plus récent au plus ancien)
    pub fn selected_history(&self) -> Option<&StockRef> {
        self.history.newest_first().get(self.history_index).copied()
    }

    // ========================================================================
    // Navigation dans les listes (dépend de l'écran)
    // ========================================================================

    pub fn select_up(&mut self) {
        match self.screen {
            Screen::Home => self.history_index = self.history_index.saturating_sub(1),
            Screen::Rankings => self.rankings.select_up(),
            Screen::Portfolio => self.portfolio.select_up(),
            _ => {}
        }
    }

    pub fn select_down(&mut self) {
        match self.screen {
            Screen::Home => {
                let max_index = self.history.len().saturating_sub(1);
                self.history_index = (self.history_index + 1).min(max_index);
            }
            Screen::Rankings => self.rankings.select_down(),
            Screen::Portfolio => self.portfolio.select_down(),
            _ => {}
        }
    }

    pub fn next_page(&mut self) {
        match self.screen {
            Screen::Rankings => self.rankings.next_page(),
            Screen::Portfolio => self.portfolio.next_page(),
            _ => {}
        }
    }

    pub fn previous_page(&mut self) {
        match self.screen {
            Screen::Rankings => self.rankings.previous_page(),
            Screen::Portfolio => self.portfolio.previous_page(),
            _ => {}
        }
    }

    /// Tri croissant sur la colonne suivante
    pub fn cycle_sort_column(&mut self) {
        match self.screen {
            Screen::Rankings => {
                let next = self.rankings.sort_status().column.next();
                self.rankings.toggle_sort(next);
            }
            Screen::Portfolio => {
                let next = self.portfolio.sort_status().column.next();
                self.portfolio.toggle_sort(next);
            }
            _ => {}
        }
    }

    /// Inverse le sens du tri courant
    pub fn flip_sort_direction(&mut self) {
        match self.screen {
            Screen::Rankings => {
                let column = self.rankings.sort_status().column;
                self.rankings.toggle_sort(column);
            }
            Screen::Portfolio => {
                let column = self.portfolio.sort_status().column;
                self.portfolio.toggle_sort(column);
            }
            _ => {}
        }
    }

    /// Enter sur une liste : ouvre la fiche de la ligne sélectionnée
    pub fn open_selected(&mut self) -> Option<AppCommand> {
        let ticker = match self.screen {
            Screen::Home => self.selected_history().map(|s| s.ticker.clone()),
            Screen::Rankings => self.rankings.selected().map(|s| s.ticker.clone()),
            Screen::Portfolio => self.portfolio.selected().map(|h| h.ticker.clone()),
            _ => None,
        }?;
        self.open_quote(&ticker)
    }

    // ========================================================================
    // Saisie modale : recherche et quantité
    // ========================================================================

    pub fn start_search(&mut self) {
        self.prompt = Some(Prompt::Search);
        self.input_buffer.clear();
        self.search = SearchState::default();
    }

    /// Ouvre la saisie de quantité
    /// - Achat : depuis une fiche chargée ou une ligne du portfolio
    /// - Vente : depuis une ligne du portfolio, bornée à la quantité détenue
    pub fn start_trade(&mut self, side: TradeSide) {
        if !self.is_logged_in() {
            self.notify(Level::Info, side.label(), "Connectez-vous pour passer un ordre.");
            return;
        }

        let ticket = match (self.screen, side) {
            (Screen::Quote, TradeSide::Buy) => match &self.quote {
                LoadState::Loaded(quote) => Some(TradeTicket {
                    side,
                    ticker: quote.symbol.clone(),
                    currency: quote.currency.clone(),
                    price: quote.current_price,
                    max: None,
                }),
                _ => None,
            },
            (Screen::Portfolio, _) => self.portfolio.selected().map(|holding| TradeTicket {
                side,
                ticker: holding.ticker.clone(),
                currency: None,
                price: Some(holding.price),
                max: (side == TradeSide::Sell).then_some(holding.qty),
            }),
            _ => None,
        };

        if let Some(ticket) = ticket {
            self.prompt = Some(Prompt::Quantity(ticket));
            self.input_buffer = "1".to_string();
        }
    }

    pub fn cancel_prompt(&mut self) {
        self.prompt = None;
        self.input_buffer.clear();
        self.search = SearchState::default();
    }

    /// Ajoute un caractère au buffer (chiffres seulement pour une quantité)
    pub fn append_char(&mut self, c: char) {
        match self.prompt {
            Some(Prompt::Search) => {
                self.input_buffer.push(c);
                self.search.pending_since = Some(Local::now());
            }
            Some(Prompt::Quantity(_)) if c.is_ascii_digit() => self.input_buffer.push(c),
            _ => {}
        }
    }

    pub fn backspace(&mut self) {
        if self.input_buffer.pop().is_some() && self.prompt == Some(Prompt::Search) {
            self.search.pending_since = Some(Local::now());
        }
    }

    /// Enter : ouvre la fiche recherchée ou envoie l'ordre
    pub fn submit_prompt(&mut self) -> Option<AppCommand> {
        let prompt = self.prompt.take()?;
        let value = std::mem::take(&mut self.input_buffer);
        self.search = SearchState::default();

        match prompt {
            Prompt::Search => self.open_quote(&value),
            Prompt::Quantity(ticket) => {
                let Ok(qty) = value.trim().parse::<u32>() else {
                    self.notify(Level::Error, ticket.side.action().error_title(), "Quantité invalide.");
                    return None;
                };
                if let Err(e) = validate_qty(qty, ticket.max) {
                    self.notify(Level::Error, ticket.side.action().error_title(), e.user_message());
                    return None;
                }

                self.notifications.show(
                    Some(TRADE_NOTIFICATION),
                    Level::Pending,
                    format!("{} de {} × {}", ticket.side.label(), ticket.ticker, qty),
                    "Ordre en cours d'exécution...",
                    Local::now(),
                );
                Some(AppCommand::Trade {
                    side: ticket.side,
                    ticker: ticket.ticker,
                    qty,
                    max: ticket.max,
                })
            }
        }
    }

    // ========================================================================
    // Formulaires
    // ========================================================================

    pub fn form_input_char(&mut self, c: char) {
        match self.screen {
            Screen::Login => self.login_form.input_char(c),
            Screen::Register => self.register_form.input_char(c),
            _ => {}
        }
    }

    pub fn form_backspace(&mut self) {
        match self.screen {
            Screen::Login => self.login_form.backspace(),
            Screen::Register => self.register_form.backspace(),
            _ => {}
        }
    }

    pub fn form_next_field(&mut self) {
        match self.screen {
            Screen::Login => self.login_form.next_field(),
            Screen::Register => self.register_form.next_field(),
            _ => {}
        }
    }

    pub fn form_previous_field(&mut self) {
        match self.screen {
            Screen::Login => self.login_form.previous_field(),
            Screen::Register => self.register_form.previous_field(),
            _ => {}
        }
    }

    pub fn submit_form(&mut self) -> Option<AppCommand> {
        match self.screen {
            Screen::Login => self.login_form.validate(),
            Screen::Register => self.register_form.validate(),
            _ => None,
        }
    }

    /// Bascule entre connexion et inscription
    pub fn switch_form(&mut self) {
        match self.screen {
            Screen::Login => self.open_register(),
            Screen::Register => self.open_login(),
            _ => {}
        }
    }

    pub fn is_in_form(&self) -> bool {
        matches!(self.screen, Screen::Login | Screen::Register)
    }

    // ========================================================================
    // Notifications
    // ========================================================================

    pub fn notify(&mut self, level: Level, title: impl Into<String>, message: impl Into<String>) {
        self.notifications.show(None, level, title, message, Local::now());
    }

    // ========================================================================
    // Résultats du worker
    // ========================================================================

    /// Applique une réponse du worker
    ///
    /// Retourne une commande de suivi si nécessaire (ex: recharger le
    /// portfolio après un ordre).
    pub fn apply(&mut self, result: AppResult) -> Option<AppCommand> {
        match result {
            AppResult::ProfileLoaded(user) => {
                if let Some(user) = &user {
                    info!(local_id = %user.local_id, "Profile loaded");
                }
                self.user = user;
            }

            AppResult::SearchDone { query, result } => {
                if query == self.search.last_sent && self.prompt == Some(Prompt::Search) {
                    self.search.preview = result;
                }
            }

            AppResult::QuoteLoaded { ticker, quote } => {
                if self.quote_ticker.as_deref() != Some(ticker.as_str()) {
                    debug!(%ticker, "Ignoring stale quote");
                    return None;
                }
                self.quote = match quote {
                    Some(quote) => {
                        self.record_history(StockRef {
                            ticker: quote.symbol.clone(),
                            name: quote.display_name().to_string(),
                        });
                        LoadState::Loaded(quote)
                    }
                    None => LoadState::NotFound(ticker),
                };
            }

            AppResult::ListLoaded { kind, stocks } => {
                if kind == self.rankings_kind {
                    self.rankings.fill(stocks);
                }
            }

            AppResult::PortfolioLoaded(holdings) => self.portfolio.fill(holdings),

            AppResult::LoggedIn(user) => {
                self.notify(
                    Level::Success,
                    "Connexion réussie",
                    format!("Bienvenue, {}", user.display_label()),
                );
                self.user = Some(user);
                self.login_form = LoginForm::default();
                self.screen = self.return_screen;
            }

            AppResult::Registered => {
                let email = self.register_form.email.trim().to_string();
                self.notify(
                    Level::Info,
                    "Vérifiez votre adresse e-mail",
                    format!("Un lien de confirmation a été envoyé à {}.", email),
                );
                self.open_login();
                self.login_form.email = email;
                self.login_form.focus = LoginField::Password;
            }

            AppResult::LoggedOut => {
                self.user = None;
                self.portfolio.clear();
                if self.screen == Screen::Portfolio {
                    self.screen = Screen::Home;
                }
                self.notify(Level::Info, "Déconnexion", "À bientôt !");
            }

            AppResult::TradeDone {
                side,
                ticker,
                qty,
                receipt,
            } => {
                let currency = match &self.quote {
                    LoadState::Loaded(quote) if quote.symbol == ticker => quote.currency.clone(),
                    _ => None,
                };
                let verb = match side {
                    TradeSide::Buy => "acheté",
                    TradeSide::Sell => "vendu",
                };
                self.notifications.show(
                    Some(TRADE_NOTIFICATION),
                    Level::Success,
                    format!("{} réussi : {} × {}", side.label(), ticker, qty),
                    format!(
                        "{} {} à {}{}",
                        ticker,
                        verb,
                        currency_symbol(currency.as_deref()),
                        receipt.price
                    ),
                    Local::now(),
                );

                if self.screen == Screen::Portfolio {
                    self.portfolio.clear();
                    return Some(AppCommand::LoadPortfolio);
                }
            }

            AppResult::Failed { action, error } => self.apply_failure(action, error),
        }
        None
    }

    fn apply_failure(&mut self, action: Action, error: ApiError) {
        if matches!(error, ApiError::NotLoggedIn | ApiError::SessionExpired) {
            self.user = None;
        }
        let message = error.user_message();

        match action {
            Action::Login => self.login_form.error = Some(message),
            Action::Register => self.register_form.error = Some(message),
            Action::Buy | Action::Sell => self.notifications.show(
                Some(TRADE_NOTIFICATION),
                Level::Error,
                action.error_title(),
                message,
                Local::now(),
            ),
            Action::Load => {
                if self.screen == Screen::Quote && self.quote == LoadState::Loading {
                    self.quote = LoadState::Failed(message.clone());
                }
                self.notify(Level::Error, action.error_title(), message);
            }
        }
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TradeReceipt;
    use crate::error::ApiCode;
    use crate::models::Return;

    fn test_config() -> Config {
        Config::from_lookup(|_| None).unwrap()
    }

    fn test_app() -> App {
        App::new(Arc::new(LocalStore::in_memory()), &test_config())
    }

    fn logged_in_app() -> App {
        let mut app = test_app();
        app.user = Some(User {
            local_id: "u1".to_string(),
            email: "jane@example.com".to_string(),
            display_name: "Jane Doe".to_string(),
        });
        app
    }

    fn quote(symbol: &str) -> QuoteDetails {
        serde_json::from_value(serde_json::json!({
            "symbol": symbol,
            "shortName": format!("{} Inc.", symbol),
            "currency": "USD",
            "currentPrice": 100.0,
            "open": 99.0,
        }))
        .unwrap()
    }

    fn holding(ticker: &str, qty: u32) -> Holding {
        Holding {
            ticker: ticker.to_string(),
            price: 10.0,
            qty,
            total_value: 10.0 * qty as f64,
            today_return: Return::default(),
            total_return: Return::default(),
        }
    }

    #[test]
    fn test_app_creation() {
        let app = test_app();
        assert!(app.is_running());
        assert_eq!(app.screen, Screen::Home);
        assert_eq!(app.scheme, ColorScheme::Dark);
        assert!(app.history.is_empty());
    }

    #[test]
    fn test_two_step_quit() {
        let mut app = test_app();
        app.request_quit();
        assert!(app.is_awaiting_quit_confirmation());
        app.cancel_quit();
        assert!(!app.is_awaiting_quit_confirmation());
        app.quit();
        assert!(!app.is_running());
    }

    #[test]
    fn test_search_is_debounced() {
        let mut app = test_app();
        app.start_search();
        for c in "aapl".chars() {
            app.append_char(c);
        }
        let typed_at = app.search.pending_since.unwrap();

        assert!(app.tick_at(typed_at + Duration::milliseconds(100)).is_none());
        assert_eq!(
            app.tick_at(typed_at + Duration::milliseconds(400)),
            Some(AppCommand::Search {
                query: "aapl".to_string()
            })
        );
        // Rien de nouveau : pas de second envoi
        assert!(app.tick_at(typed_at + Duration::milliseconds(900)).is_none());
    }

    #[test]
    fn test_search_preview_ignores_stale_answers() {
        let mut app = test_app();
        app.start_search();
        app.append_char('A');
        let typed_at = app.search.pending_since.unwrap();
        app.tick_at(typed_at + Duration::milliseconds(500));

        let result = SearchResult {
            ticker: "AAPL".to_string(),
            name: "Apple".to_string(),
            trend: None,
            sector: None,
            summary: None,
        };
        app.apply(AppResult::SearchDone {
            query: "old".to_string(),
            result: Some(result.clone()),
        });
        assert!(app.search.preview.is_none());

        app.apply(AppResult::SearchDone {
            query: "A".to_string(),
            result: Some(result),
        });
        assert_eq!(app.search.preview.as_ref().map(|r| r.ticker.as_str()), Some("AAPL"));
    }

    #[test]
    fn test_submit_search_opens_quote() {
        let mut app = test_app();
        app.start_search();
        for c in " msft".chars() {
            app.append_char(c);
        }
        assert_eq!(
            app.submit_prompt(),
            Some(AppCommand::LoadQuote {
                ticker: "MSFT".to_string()
            })
        );
        assert_eq!(app.screen, Screen::Quote);
        assert!(app.prompt.is_none());
        assert_eq!(app.quote, LoadState::Loading);
    }

    #[test]
    fn test_loaded_quote_is_recorded_in_history() {
        let store = Arc::new(LocalStore::in_memory());
        let mut app = App::new(store.clone(), &test_config());
        app.open_quote("aapl");
        app.apply(AppResult::QuoteLoaded {
            ticker: "AAPL".to_string(),
            quote: Some(quote("AAPL")),
        });

        assert!(matches!(app.quote, LoadState::Loaded(_)));
        assert_eq!(app.selected_history().map(|s| s.ticker.as_str()), Some("AAPL"));
        assert_eq!(store.history().len(), 1);
    }

    #[test]
    fn test_unknown_quote() {
        let mut app = test_app();
        app.open_quote("ZZZZ");
        app.apply(AppResult::QuoteLoaded {
            ticker: "ZZZZ".to_string(),
            quote: None,
        });
        assert_eq!(app.quote, LoadState::NotFound("ZZZZ".to_string()));
        assert!(app.history.is_empty());
    }

    #[test]
    fn test_opening_rankings_invalidates_cache() {
        let mut app = test_app();
        app.open_rankings(ListKind::Top);
        app.apply(AppResult::ListLoaded {
            kind: ListKind::Top,
            stocks: Vec::new(),
        });
        assert!(app.rankings.is_cached());

        let command = app.open_rankings(ListKind::Trending);
        assert_eq!(command, AppCommand::LoadList { kind: ListKind::Trending, count: 20 });
        assert!(!app.rankings.is_cached());

        // Réponse d'un autre classement : ignorée
        app.apply(AppResult::ListLoaded {
            kind: ListKind::Top,
            stocks: Vec::new(),
        });
        assert!(!app.rankings.is_cached());
    }

    #[test]
    fn test_portfolio_requires_login() {
        let mut app = test_app();
        assert!(app.open_portfolio().is_none());
        assert_eq!(app.screen, Screen::Login);

        let mut app = logged_in_app();
        assert_eq!(app.open_portfolio(), Some(AppCommand::LoadPortfolio));
        assert_eq!(app.screen, Screen::Portfolio);
    }

    #[test]
    fn test_sell_is_bounded_by_held_quantity() {
        let mut app = logged_in_app();
        app.open_portfolio();
        app.apply(AppResult::PortfolioLoaded(vec![holding("AAPL", 3)]));

        app.start_trade(TradeSide::Sell);
        match &app.prompt {
            Some(Prompt::Quantity(ticket)) => assert_eq!(ticket.max, Some(3)),
            other => panic!("unexpected prompt: {:?}", other),
        }

        app.input_buffer = "4".to_string();
        assert!(app.submit_prompt().is_none());
        assert_eq!(app.notifications.latest().map(|n| n.level), Some(Level::Error));

        app.start_trade(TradeSide::Sell);
        app.backspace();
        app.append_char('x');
        app.append_char('2');
        assert_eq!(
            app.submit_prompt(),
            Some(AppCommand::Trade {
                side: TradeSide::Sell,
                ticker: "AAPL".to_string(),
                qty: 2,
                max: Some(3),
            })
        );
        assert_eq!(app.notifications.latest().map(|n| n.level), Some(Level::Pending));
    }

    #[test]
    fn test_unparsable_quantity_is_reported() {
        let mut app = logged_in_app();
        app.open_portfolio();
        app.apply(AppResult::PortfolioLoaded(vec![holding("AAPL", 3)]));

        app.start_trade(TradeSide::Sell);
        app.backspace();
        for c in "99999999999".chars() {
            app.append_char(c);
        }
        assert!(app.submit_prompt().is_none());
        let latest = app.notifications.latest().unwrap();
        assert_eq!(latest.level, Level::Error);
        assert_eq!(latest.message, "Quantité invalide.");

        app.start_trade(TradeSide::Sell);
        app.backspace();
        assert!(app.submit_prompt().is_none());
        assert_eq!(app.notifications.latest().map(|n| n.message.as_str()), Some("Quantité invalide."));
    }

    #[test]
    fn test_escape_goes_home_then_clears_notifications() {
        let mut app = test_app();
        app.open_quote("AAPL");
        assert_eq!(app.screen, Screen::Quote);
        app.start_trade(TradeSide::Buy);
        assert!(!app.notifications.is_empty());

        app.back();
        assert_eq!(app.screen, Screen::Home);
        assert!(!app.notifications.is_empty());

        app.back();
        assert_eq!(app.screen, Screen::Home);
        assert!(app.notifications.is_empty());
    }

    #[test]
    fn test_buy_needs_login() {
        let mut app = test_app();
        app.open_quote("AAPL");
        app.apply(AppResult::QuoteLoaded {
            ticker: "AAPL".to_string(),
            quote: Some(quote("AAPL")),
        });
        app.start_trade(TradeSide::Buy);
        assert!(app.prompt.is_none());
    }

    #[test]
    fn test_trade_notification_updated_in_place() {
        let mut app = logged_in_app();
        app.open_portfolio();
        app.apply(AppResult::PortfolioLoaded(vec![holding("AAPL", 3)]));
        app.start_trade(TradeSide::Buy);
        app.submit_prompt();

        let follow_up = app.apply(AppResult::TradeDone {
            side: TradeSide::Buy,
            ticker: "AAPL".to_string(),
            qty: 1,
            receipt: TradeReceipt { price: 12.5 },
        });

        assert_eq!(follow_up, Some(AppCommand::LoadPortfolio));
        assert_eq!(app.notifications.items().len(), 1);
        let notification = &app.notifications.items()[0];
        assert_eq!(notification.level, Level::Success);
        assert_eq!(notification.message, "AAPL acheté à ??? 12.5");
    }

    #[test]
    fn test_trade_failure_shows_error() {
        let mut app = logged_in_app();
        app.apply(AppResult::Failed {
            action: Action::Buy,
            error: ApiError::Code(ApiCode::QtyNotValid),
        });
        let notification = app.notifications.latest().unwrap();
        assert_eq!(notification.title, "Échec de l'achat");
        assert_eq!(notification.message, "Quantité invalide.");
    }

    #[test]
    fn test_session_expired_logs_user_out() {
        let mut app = logged_in_app();
        app.apply(AppResult::Failed {
            action: Action::Load,
            error: ApiError::SessionExpired,
        });
        assert!(!app.is_logged_in());
    }

    #[test]
    fn test_login_flow_returns_to_previous_screen() {
        let mut app = test_app();
        app.open_rankings(ListKind::Top);
        app.open_login();
        assert_eq!(app.screen, Screen::Login);

        app.apply(AppResult::Failed {
            action: Action::Login,
            error: ApiError::Code(ApiCode::InvalidPassword),
        });
        assert_eq!(app.login_form.error.as_deref(), Some("Mot de passe incorrect."));

        app.apply(AppResult::LoggedIn(User {
            local_id: "u1".to_string(),
            email: "jane@example.com".to_string(),
            display_name: String::new(),
        }));
        assert!(app.is_logged_in());
        assert_eq!(app.screen, Screen::Rankings);
        assert_eq!(app.notifications.latest().map(|n| n.message.as_str()), Some("Bienvenue, Nouvel utilisateur"));
    }

    #[test]
    fn test_registration_asks_for_email_verification() {
        let mut app = test_app();
        app.open_register();
        app.register_form.email = "jane@example.com".to_string();
        app.apply(AppResult::Registered);

        assert_eq!(app.screen, Screen::Login);
        assert_eq!(app.login_form.email, "jane@example.com");
        assert_eq!(
            app.notifications.latest().map(|n| n.title.as_str()),
            Some("Vérifiez votre adresse e-mail")
        );
    }

    #[test]
    fn test_theme_toggle_is_saved() {
        let store = Arc::new(LocalStore::in_memory());
        let mut app = App::new(store.clone(), &test_config());
        app.toggle_theme();
        assert_eq!(app.scheme, ColorScheme::Light);
        assert_eq!(store.theme().as_deref(), Some("light"));
    }

    #[test]
    fn test_history_navigation() {
        let mut app = test_app();
        for ticker in ["AAPL", "MSFT", "TSLA"] {
            app.record_history(StockRef {
                ticker: ticker.to_string(),
                name: ticker.to_string(),
            });
        }
        assert_eq!(app.selected_history().map(|s| s.ticker.as_str()), Some("TSLA"));
        app.select_down();
        app.select_down();
        app.select_down();
        assert_eq!(app.selected_history().map(|s| s.ticker.as_str()), Some("AAPL"));
        assert_eq!(
            app.open_selected(),
            Some(AppCommand::LoadQuote {
                ticker: "AAPL".to_string()
            })
        );
    }
}
