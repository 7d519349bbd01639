// ============================================================================
// Background Worker Thread
// ============================================================================
// L'event loop envoie des AppCommand, le worker exécute les appels réseau
// dans son propre runtime tokio et renvoie des AppResult.
//
// CONCEPTS RUST :
// 1. Command pattern avec channels (std::sync::mpsc)
// 2. Thread OS + runtime tokio dédié : l'UI ne bloque jamais
// 3. execute() est async et pur : testable sans thread ni channel
// ============================================================================

use std::sync::{mpsc, Arc, Mutex};

use tracing::{error, info, warn};

use crate::api::{ApiClient, TradeReceipt, TradeSide};
use crate::app::App;
use crate::error::{Action, ApiError};
use crate::models::{Holding, ListKind, QuoteDetails, SearchResult, Stock, User};

/// Commandes envoyées au worker thread
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Profil de l'utilisateur connecté (au démarrage)
    LoadProfile,

    /// Recherche rapide (aperçu pendant la saisie)
    Search { query: String },

    /// Fiche détaillée d'une action
    LoadQuote { ticker: String },

    /// Classement complet (mis en cache côté App)
    LoadList { kind: ListKind, count: u32 },

    /// Positions de l'utilisateur
    LoadPortfolio,

    Login { email: String, password: String },

    Register {
        email: String,
        password: String,
        display_name: String,
    },

    Logout,

    /// Ordre d'achat ou de vente
    Trade {
        side: TradeSide,
        ticker: String,
        qty: u32,
        max: Option<u32>,
    },
}

impl AppCommand {
    /// Message affiché pendant le chargement
    pub fn loading_message(&self) -> Option<String> {
        match self {
            AppCommand::LoadProfile => Some("Chargement du profil...".to_string()),
            AppCommand::Search { .. } => None,
            AppCommand::LoadQuote { ticker } => Some(format!("Chargement de {}...", ticker)),
            AppCommand::LoadList { kind, .. } => Some(format!("Chargement : {}...", kind.title())),
            AppCommand::LoadPortfolio => Some("Chargement du portfolio...".to_string()),
            AppCommand::Login { .. } => Some("Connexion...".to_string()),
            AppCommand::Register { .. } => Some("Inscription...".to_string()),
            AppCommand::Logout => None,
            AppCommand::Trade { side, ticker, qty, .. } => {
                Some(format!("{} de {} × {}...", side.label(), ticker, qty))
            }
        }
    }

    /// Nom pour les logs (sans les identifiants de connexion)
    pub fn name(&self) -> &'static str {
        match self {
            AppCommand::LoadProfile => "load_profile",
            AppCommand::Search { .. } => "search",
            AppCommand::LoadQuote { .. } => "load_quote",
            AppCommand::LoadList { .. } => "load_list",
            AppCommand::LoadPortfolio => "load_portfolio",
            AppCommand::Login { .. } => "login",
            AppCommand::Register { .. } => "register",
            AppCommand::Logout => "logout",
            AppCommand::Trade { .. } => "trade",
        }
    }

    /// Action associée, pour le titre des notifications d'erreur
    fn action(&self) -> Action {
        match self {
            AppCommand::Login { .. } => Action::Login,
            AppCommand::Register { .. } => Action::Register,
            AppCommand::Trade { side, .. } => side.action(),
            _ => Action::Load,
        }
    }
}

/// Résultats renvoyés par le worker thread
#[derive(Debug)]
pub enum AppResult {
    /// None : personne n'est connecté (ou session expirée)
    ProfileLoaded(Option<User>),

    SearchDone {
        query: String,
        result: Option<SearchResult>,
    },

    /// quote == None : ticker inconnu
    QuoteLoaded {
        ticker: String,
        quote: Option<QuoteDetails>,
    },

    ListLoaded {
        kind: ListKind,
        stocks: Vec<Stock>,
    },

    PortfolioLoaded(Vec<Holding>),

    LoggedIn(User),

    Registered,

    LoggedOut,

    TradeDone {
        side: TradeSide,
        ticker: String,
        qty: u32,
        receipt: TradeReceipt,
    },

    /// Échec d'une commande
    Failed {
        action: Action,
        error: ApiError,
    },
}

/// Exécute une commande et construit le résultat
///
/// CONCEPT : Cœur async du worker
/// - Toutes les erreurs deviennent AppResult::Failed
/// - Le thread ne fait que transporter les messages
pub async fn execute(client: &ApiClient, command: &AppCommand) -> AppResult {
    let outcome = match command {
        AppCommand::LoadProfile => client.fetch_info().await.map(AppResult::ProfileLoaded),

        AppCommand::Search { query } => client.search(query).await.map(|result| AppResult::SearchDone {
            query: query.clone(),
            result,
        }),

        AppCommand::LoadQuote { ticker } => client.quote(ticker).await.map(|quote| AppResult::QuoteLoaded {
            ticker: ticker.clone(),
            quote,
        }),

        AppCommand::LoadList { kind, count } => client
            .list(*kind, *count)
            .await
            .map(|stocks| AppResult::ListLoaded { kind: *kind, stocks }),

        AppCommand::LoadPortfolio => client.portfolio(1).await.map(AppResult::PortfolioLoaded),

        AppCommand::Login { email, password } => client.login(email, password).await.map(AppResult::LoggedIn),

        AppCommand::Register {
            email,
            password,
            display_name,
        } => client
            .register(email, password, display_name)
            .await
            .map(|_| AppResult::Registered),

        AppCommand::Logout => client.logout().map(|_| AppResult::LoggedOut),

        AppCommand::Trade { side, ticker, qty, max } => client
            .trade(*side, ticker, *qty, *max)
            .await
            .map(|receipt| AppResult::TradeDone {
                side: *side,
                ticker: ticker.clone(),
                qty: *qty,
                receipt,
            }),
    };

    outcome.unwrap_or_else(|error| {
        warn!(command = command.name(), error = %error, "Command failed");
        AppResult::Failed {
            action: command.action(),
            error,
        }
    })
}

/// Lance le worker thread
///
/// # Arguments
/// * `command_rx` - Receiver pour recevoir les commandes
/// * `result_tx` - Sender pour envoyer les résultats
/// * `app` - état partagé (indicateur de chargement)
/// * `client` - client de l'API
pub fn spawn_worker(
    command_rx: mpsc::Receiver<AppCommand>,
    result_tx: mpsc::Sender<AppResult>,
    app: Arc<Mutex<App>>,
    client: ApiClient,
) {
    std::thread::spawn(move || {
        // CONCEPT : Runtime per-thread
        let runtime = match tokio::runtime::Runtime::new() {
            Ok(runtime) => runtime,
            Err(e) => {
                error!(error = ?e, "Failed to create tokio runtime, worker not started");
                return;
            }
        };

        while let Ok(command) = command_rx.recv() {
            info!(command = command.name(), "Worker received command");

            let loading = command.loading_message();
            if loading.is_some() {
                if let Ok(mut app_lock) = app.lock() {
                    app_lock.start_loading(loading);
                }
            }

            // block_on bloque le worker, pas l'UI
            let result = runtime.block_on(execute(&client, &command));

            if let Ok(mut app_lock) = app.lock() {
                app_lock.stop_loading();
            }

            if result_tx.send(result).is_err() {
                break;
            }
        }

        info!("Worker thread exiting (channel closed)");
    });
}
