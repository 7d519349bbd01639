// ============================================================================
// Ligne de commande
// ============================================================================
// Sans sous-commande (ou avec "tui"), l'interface TUI est lancée.
// Les autres sous-commandes font un seul appel et affichent le résultat
// sur stdout, ce qui permet de les utiliser dans des scripts.
//
// CONCEPT : clap derive
// - #[derive(Parser)] : structure principale
// - #[derive(Subcommand)] : une variante par sous-commande
// - #[derive(ValueEnum)] : valeurs autorisées d'une option
// ============================================================================

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;

use lazystocks::api::{ApiClient, TradeSide};
use lazystocks::config::Config;
use lazystocks::error::ApiError;
use lazystocks::format::{currency_symbol, fixed2, group_thousands, signed2, truncate};
use lazystocks::history::RecentHistory;
use lazystocks::listing::{PagedTable, SortDirection, SortStatus};
use lazystocks::models::{Holding, HoldingColumn, ListKind, Stock, StockColumn, StockRef};
use lazystocks::theme::ColorScheme;

/// Client terminal de l'API de trading
#[derive(Debug, Parser)]
#[command(name = "lazystocks", version, about, long_about = None)]
pub struct Cli {
    /// URL de l'API (remplace LAZYSTOCKS_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interface interactive (par défaut)
    Tui,

    /// Fiche détaillée d'une action
    Quote { ticker: String },

    /// Recherche rapide d'un ticker
    Search { query: String },

    /// Top 10 des actions
    Top(ListArgs),

    /// Actions en tendance
    Trending(ListArgs),

    /// Actions les plus suivies
    MostWatched(ListArgs),

    /// Positions de l'utilisateur connecté
    Portfolio(PortfolioArgs),

    /// Connexion
    Login {
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Création d'un compte
    Register {
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
    },

    /// Déconnexion (efface les jetons locaux)
    Logout,

    /// Profil de l'utilisateur connecté
    Whoami,

    /// Achat d'actions
    Buy { ticker: String, qty: u32 },

    /// Vente d'actions (au plus la quantité détenue)
    Sell { ticker: String, qty: u32 },

    /// Historique des actions consultées
    History {
        #[arg(long)]
        clear: bool,
    },

    /// Thème de l'interface
    Theme {
        #[arg(value_enum)]
        mode: Option<ThemeMode>,
    },
}

/// Options communes des tableaux
#[derive(Debug, Args)]
pub struct PageArgs {
    /// Page à afficher (à partir de 1)
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Tri décroissant
    #[arg(long)]
    pub desc: bool,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Nombre d'actions demandées au serveur
    #[arg(long)]
    pub count: Option<u32>,

    #[arg(long, value_enum, default_value_t = StockSort::Rank)]
    pub sort: StockSort,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Debug, Args)]
pub struct PortfolioArgs {
    #[arg(long, value_enum, default_value_t = HoldingSort::Ticker)]
    pub sort: HoldingSort,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StockSort {
    Rank,
    Ticker,
    Price,
    Change,
    Name,
    Sector,
}

impl From<StockSort> for StockColumn {
    fn from(sort: StockSort) -> Self {
        match sort {
            StockSort::Rank => StockColumn::Rank,
            StockSort::Ticker => StockColumn::Ticker,
            StockSort::Price => StockColumn::Price,
            StockSort::Change => StockColumn::DayPercent,
            StockSort::Name => StockColumn::Name,
            StockSort::Sector => StockColumn::Sector,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HoldingSort {
    Ticker,
    Qty,
    Value,
    Today,
    Return,
    Price,
}

impl From<HoldingSort> for HoldingColumn {
    fn from(sort: HoldingSort) -> Self {
        match sort {
            HoldingSort::Ticker => HoldingColumn::Ticker,
            HoldingSort::Qty => HoldingColumn::Qty,
            HoldingSort::Value => HoldingColumn::TotalValue,
            HoldingSort::Today => HoldingColumn::TodayReturn,
            HoldingSort::Return => HoldingColumn::TotalReturn,
            HoldingSort::Price => HoldingColumn::Price,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeMode {
    Dark,
    Light,
    Toggle,
}

impl Command {
    /// Nom de la sous-commande (les mots de passe ne sont jamais loggés)
    pub fn name(&self) -> &'static str {
        match self {
            Command::Tui => "tui",
            Command::Quote { .. } => "quote",
            Command::Search { .. } => "search",
            Command::Top(_) => "top",
            Command::Trending(_) => "trending",
            Command::MostWatched(_) => "most-watched",
            Command::Portfolio(_) => "portfolio",
            Command::Login { .. } => "login",
            Command::Register { .. } => "register",
            Command::Logout => "logout",
            Command::Whoami => "whoami",
            Command::Buy { .. } => "buy",
            Command::Sell { .. } => "sell",
            Command::History { .. } => "history",
            Command::Theme { .. } => "theme",
        }
    }
}

fn direction(desc: bool) -> SortDirection {
    if desc {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    }
}

/// Convertit une erreur de l'API en erreur affichable
fn user_error(error: ApiError) -> anyhow::Error {
    let message = error.user_message();
    anyhow::Error::new(error).context(message)
}

/// Exécute une sous-commande non interactive
pub async fn run(command: Command, client: &ApiClient, config: &Config) -> Result<()> {
    info!(command = command.name(), api_url = client.base_url(), "Running one-shot command");

    match command {
        Command::Tui => bail!("la TUI ne se lance pas en mode non interactif"),

        Command::Quote { ticker } => {
            let Some(quote) = client.quote(&ticker).await.map_err(user_error)? else {
                bail!("Action introuvable : {}", ticker.to_uppercase());
            };

            let mut history = RecentHistory::from_entries(client.store().history(), config.history_size);
            history.push(StockRef {
                ticker: quote.symbol.clone(),
                name: quote.display_name().to_string(),
            });
            client.store().set_history(history.entries())?;

            let cur = currency_symbol(quote.currency.as_deref());
            println!("{}", quote.title());
            println!(
                "{}{}   {} ({}%)",
                cur,
                fixed2(quote.current_price),
                signed2(quote.day_change()),
                signed2(quote.day_percent())
            );
            println!();
            println!("{:<26}{}", "Clôture précédente", fixed2(quote.previous_close));
            println!("{:<26}{}", "Ouverture", fixed2(quote.open));
            println!("{:<26}{} - {}", "Fourchette du jour", fixed2(quote.day_low), fixed2(quote.day_high));
            println!(
                "{:<26}{} - {}",
                "Fourchette 52 semaines",
                fixed2(quote.fifty_two_week_low),
                fixed2(quote.fifty_two_week_high)
            );
            println!("{:<26}{}", "Volume", group_thousands(quote.volume));
            println!("{:<26}{}", "Capitalisation", group_thousands(quote.market_cap));
        }

        Command::Search { query } => match client.search(&query).await.map_err(user_error)? {
            Some(result) => {
                let arrow = if result.is_trend_down() { "▼" } else { "▲" };
                println!("{} {:<8} {}", arrow, result.ticker, result.name);
            }
            None => println!("Aucun résultat pour \"{}\"", query.trim()),
        },

        Command::Top(args) => print_list(client, ListKind::Top, args, config).await?,
        Command::Trending(args) => print_list(client, ListKind::Trending, args, config).await?,
        Command::MostWatched(args) => print_list(client, ListKind::MostWatched, args, config).await?,

        Command::Portfolio(args) => {
            let holdings = client.portfolio(args.page.page).await.map_err(user_error)?;
            print_portfolio(holdings, &args, config);
        }

        Command::Login { email, password } => {
            let user = client.login(&email, &password).await.map_err(user_error)?;
            println!("Connecté : {} <{}>", user.display_label(), user.email);
        }

        Command::Register {
            email,
            password,
            first_name,
            last_name,
        } => {
            let display_name = format!("{} {}", first_name.trim(), last_name.trim());
            client
                .register(&email, &password, &display_name)
                .await
                .map_err(user_error)?;
            println!("Compte créé. Vérifiez votre adresse e-mail ({}) avant de vous connecter.", email);
        }

        Command::Logout => {
            client.logout().map_err(user_error)?;
            println!("Déconnecté.");
        }

        Command::Whoami => match client.fetch_info().await.map_err(user_error)? {
            Some(user) => println!("{} <{}>", user.display_label(), user.email),
            None => println!("Non connecté."),
        },

        Command::Buy { ticker, qty } => {
            let ticker = ticker.trim().to_uppercase();
            let receipt = client
                .trade(TradeSide::Buy, &ticker, qty, None)
                .await
                .map_err(user_error)?;
            println!("Achat réussi : {} × {} à {}", ticker, qty, receipt.price);
        }

        Command::Sell { ticker, qty } => {
            let ticker = ticker.trim().to_uppercase();
            let holdings = client.portfolio(1).await.map_err(user_error)?;
            let held = holdings
                .iter()
                .find(|h| h.ticker == ticker)
                .map(|h| h.qty)
                .with_context(|| format!("Vous ne possédez pas d'action {}", ticker))?;

            let receipt = client
                .trade(TradeSide::Sell, &ticker, qty, Some(held))
                .await
                .map_err(user_error)?;
            println!("Vente réussie : {} × {} à {}", ticker, qty, receipt.price);
        }

        Command::History { clear } => {
            if clear {
                client.store().clear_history()?;
                println!("Historique effacé.");
            } else {
                let history = RecentHistory::from_entries(client.store().history(), config.history_size);
                if history.is_empty() {
                    println!("Aucune action consultée.");
                }
                for stock in history.newest_first() {
                    println!("{:<8} {}", stock.ticker, stock.name);
                }
            }
        }

        Command::Theme { mode } => {
            let current = ColorScheme::from_saved(client.store().theme().as_deref());
            let scheme = match mode {
                None => current,
                Some(ThemeMode::Dark) => ColorScheme::Dark,
                Some(ThemeMode::Light) => ColorScheme::Light,
                Some(ThemeMode::Toggle) => current.toggle(),
            };
            if mode.is_some() {
                client.store().set_theme(scheme.as_str())?;
            }
            println!("Thème : {}", scheme.as_str());
        }
    }

    Ok(())
}

async fn print_list(client: &ApiClient, kind: ListKind, args: ListArgs, config: &Config) -> Result<()> {
    let count = args.count.unwrap_or_else(|| kind.default_count());
    let mut table: PagedTable<Stock> = PagedTable::new(StockColumn::Rank, config.page_size);
    table
        .cache_mut()
        .get_or_fetch(|| client.list(kind, count))
        .await
        .map_err(user_error)?;
    table.set_sort(SortStatus {
        column: args.sort.into(),
        direction: direction(args.page.desc),
    });
    table.set_page(args.page.page);

    println!("{} - page {}/{}", kind.title(), table.page(), table.total_pages());
    println!(
        "{:>4}  {:<8} {:>10} {:>10}  {:<30} {}",
        "#", "Symbole", "Valeur", "Var. %", "Nom", "Secteur"
    );
    for stock in table.visible() {
        println!(
            "{:>4}  {:<8} {:>10} {:>10}  {:<30} {}",
            stock.rank,
            stock.ticker,
            fixed2(stock.price),
            format!("{}%", signed2(stock.day_percent)),
            truncate(&stock.name, 30),
            stock.sector.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

fn print_portfolio(holdings: Vec<Holding>, args: &PortfolioArgs, config: &Config) {
    if holdings.is_empty() {
        println!("Vous ne possédez aucune action.");
        return;
    }

    let mut table: PagedTable<Holding> = PagedTable::new(HoldingColumn::Ticker, config.page_size);
    table.fill(holdings);
    table.set_sort(SortStatus {
        column: args.sort.into(),
        direction: direction(args.page.desc),
    });
    table.set_page(args.page.page);

    println!("Portfolio - page {}/{}", table.page(), table.total_pages());
    println!(
        "{:<8} {:>8} {:>14} {:>12} {:>12} {:>12}",
        "Symbole", "Actions", "Valeur", "Gain jour", "Gain total", "Prix/action"
    );
    for holding in table.visible() {
        println!(
            "{:<8} {:>8} {:>14} {:>12} {:>12} {:>12}",
            holding.ticker,
            holding.qty,
            fixed2(Some(holding.total_value)),
            signed2(Some(holding.today_return.amount)),
            signed2(Some(holding.total_return.amount)),
            fixed2(Some(holding.price))
        );
    }
}
