// ============================================================================
// Tests d'intégration du client : faux serveur axum en mémoire
// ============================================================================

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use lazystocks::api::{ApiClient, TradeSide};
use lazystocks::error::{ApiCode, ApiError};
use lazystocks::models::{ListKind, TokenPair};
use lazystocks::storage::LocalStore;

/// Lance le routeur sur un port libre et retourne son URL
async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn logged_in_store(access: &str, refresh: &str) -> Arc<LocalStore> {
    let store = Arc::new(LocalStore::in_memory());
    store
        .set_tokens(&TokenPair {
            access_token: access.to_string(),
            refresh_token: refresh.to_string(),
        })
        .unwrap();
    store
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn error_body(code: &str) -> Json<Value> {
    Json(json!({ "message": code }))
}

#[tokio::test]
async fn login_stores_both_tokens() {
    let router = Router::new().route(
        "/api/auth/login",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body["email"], "ada@example.com");
            Json(json!({
                "message": "",
                "data": {
                    "localId": "u1",
                    "email": "ada@example.com",
                    "displayName": "Ada Lovelace",
                    "accessToken": "a1",
                    "refreshToken": "r1"
                }
            }))
        }),
    );
    let store = Arc::new(LocalStore::in_memory());
    let client = ApiClient::new(serve(router).await, store.clone()).unwrap();

    let user = client.login("ada@example.com", "secret").await.unwrap();

    assert_eq!(user.display_name, "Ada Lovelace");
    assert_eq!(store.access_token().as_deref(), Some("a1"));
    assert_eq!(store.refresh_token().as_deref(), Some("r1"));
    assert!(client.has_session());
}

#[tokio::test]
async fn login_error_code_is_read_from_a_failed_status() {
    let router = Router::new().route(
        "/api/auth/login",
        post(|| async { (StatusCode::UNAUTHORIZED, error_body("INVALID_PASSWORD")) }),
    );
    let store = Arc::new(LocalStore::in_memory());
    let client = ApiClient::new(serve(router).await, store.clone()).unwrap();

    let error = client.login("ada@example.com", "wrong").await.unwrap_err();

    assert_eq!(error.code(), Some(ApiCode::InvalidPassword));
    assert!(store.access_token().is_none());
}

#[tokio::test]
async fn register_sends_display_name() {
    let router = Router::new().route(
        "/api/auth/register",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(
                body,
                json!({
                    "email": "ada@example.com",
                    "password": "secret",
                    "displayName": "Ada Lovelace"
                })
            );
            Json(json!({ "message": "" }))
        }),
    );
    let store = Arc::new(LocalStore::in_memory());
    let client = ApiClient::new(serve(router).await, store.clone()).unwrap();

    client.register("ada@example.com", "secret", "Ada Lovelace").await.unwrap();

    // L'inscription n'ouvre pas de session : l'e-mail doit d'abord être vérifié
    assert!(store.access_token().is_none());
}

#[tokio::test]
async fn register_reports_existing_email() {
    let router = Router::new().route(
        "/api/auth/register",
        post(|| async { (StatusCode::BAD_REQUEST, error_body("EMAIL_EXISTS")) }),
    );
    let client = ApiClient::new(serve(router).await, Arc::new(LocalStore::in_memory())).unwrap();

    let error = client.register("ada@example.com", "secret", "Ada").await.unwrap_err();

    assert_eq!(error.code(), Some(ApiCode::EmailExists));
    assert_eq!(error.user_message(), "Cette adresse e-mail est déjà utilisée.");
}

#[tokio::test]
async fn invalid_email_is_rejected_before_any_call() {
    let client = ApiClient::new("http://127.0.0.1:9", Arc::new(LocalStore::in_memory())).unwrap();
    let error = client.login("not-an-email", "secret").await.unwrap_err();
    assert!(matches!(error, ApiError::InvalidInput(_)));
}

#[tokio::test]
async fn expired_token_is_refreshed_and_request_retried_once() {
    let info_calls = Arc::new(AtomicUsize::new(0));
    let calls = info_calls.clone();

    let router = Router::new()
        .route(
            "/api/auth/info",
            get(move |headers: HeaderMap| {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    if bearer(&headers).as_deref() == Some("fresh") {
                        Json(json!({
                            "message": "",
                            "data": { "localId": "u1", "email": "ada@example.com", "displayName": "" }
                        }))
                    } else {
                        error_body("INVALID_ID_TOKEN")
                    }
                }
            }),
        )
        .route(
            "/api/auth/refresh",
            post(|Json(body): Json<Value>| async move {
                if body["refreshToken"] == "r-old" {
                    Json(json!({
                        "message": "",
                        "data": { "accessToken": "fresh", "refreshToken": "r-new" }
                    }))
                } else {
                    error_body("INVALID_REFRESH_TOKEN")
                }
            }),
        );

    let store = logged_in_store("stale", "r-old");
    let client = ApiClient::new(serve(router).await, store.clone()).unwrap();

    let user = client.fetch_info().await.unwrap().expect("user after refresh");

    assert_eq!(user.display_label(), "Nouvel utilisateur");
    assert_eq!(info_calls.load(Ordering::SeqCst), 2);
    assert_eq!(store.access_token().as_deref(), Some("fresh"));
    assert_eq!(store.refresh_token().as_deref(), Some("r-new"));
}

#[tokio::test]
async fn failed_refresh_clears_session() {
    let buy_calls = Arc::new(AtomicUsize::new(0));
    let calls = buy_calls.clone();

    let router = Router::new()
        .route("/api/auth/info", get(|| async { error_body("INVALID_ID_TOKEN") }))
        .route(
            "/api/buy",
            post(move || {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    error_body("INVALID_ID_TOKEN")
                }
            }),
        )
        .route("/api/auth/refresh", post(|| async { error_body("INVALID_REFRESH_TOKEN") }));
    let url = serve(router).await;

    // Profil : la session expirée se traduit par "personne n'est connecté"
    let store = logged_in_store("stale", "revoked");
    let client = ApiClient::new(url.clone(), store.clone()).unwrap();
    assert_eq!(client.fetch_info().await.unwrap(), None);
    assert!(store.access_token().is_none());
    assert!(store.refresh_token().is_none());

    // Ordre : l'erreur est remontée, sans second essai
    let store = logged_in_store("stale", "revoked");
    let client = ApiClient::new(url, store.clone()).unwrap();
    let error = client.trade(TradeSide::Buy, "AAPL", 1, None).await.unwrap_err();
    assert!(matches!(error, ApiError::SessionExpired));
    assert_eq!(buy_calls.load(Ordering::SeqCst), 1);
    assert!(!client.has_session());
}

#[tokio::test]
async fn trade_sends_ticker_and_quantity() {
    let router = Router::new()
        .route(
            "/api/buy",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(bearer(&headers).as_deref(), Some("a1"));
                assert_eq!(body, json!({ "ticker": "AAPL", "qty": 2 }));
                Json(json!({ "message": "", "data": { "price": 187.5 } }))
            }),
        )
        .route("/api/sell", post(|| async { error_body("QTY_NOT_VALID") }));
    let client = ApiClient::new(serve(router).await, logged_in_store("a1", "r1")).unwrap();

    let receipt = client.trade(TradeSide::Buy, "AAPL", 2, None).await.unwrap();
    assert_eq!(receipt.price, 187.5);

    let error = client.trade(TradeSide::Sell, "AAPL", 1, Some(5)).await.unwrap_err();
    assert_eq!(error.code(), Some(ApiCode::QtyNotValid));
}

#[tokio::test]
async fn quantity_is_validated_locally() {
    let client = ApiClient::new("http://127.0.0.1:9", logged_in_store("a1", "r1")).unwrap();

    let error = client.trade(TradeSide::Buy, "AAPL", 0, None).await.unwrap_err();
    assert!(matches!(error, ApiError::InvalidInput(_)));

    let error = client.trade(TradeSide::Sell, "AAPL", 6, Some(5)).await.unwrap_err();
    assert!(matches!(error, ApiError::InvalidInput(_)));
}

#[tokio::test]
async fn lists_are_ranked_in_server_order() {
    let router = Router::new().route(
        "/api/most-watched",
        get(|Query(params): Query<HashMap<String, String>>| async move {
            assert_eq!(params.get("count").map(String::as_str), Some("3"));
            Json(json!({
                "message": "",
                "data": [
                    { "ticker": "TSLA", "name": "Tesla", "price": 250.0, "dayPercent": -1.2 },
                    { "ticker": "AAPL", "name": "Apple", "price": 187.5, "dayPercent": 0.4 },
                    { "ticker": "NVDA", "name": "NVIDIA" }
                ]
            }))
        }),
    );
    let client = ApiClient::new(serve(router).await, Arc::new(LocalStore::in_memory())).unwrap();

    let stocks = client.list(ListKind::MostWatched, 3).await.unwrap();

    let ranked: Vec<(u32, &str)> = stocks.iter().map(|s| (s.rank, s.ticker.as_str())).collect();
    assert_eq!(ranked, vec![(1, "TSLA"), (2, "AAPL"), (3, "NVDA")]);
    assert!(!stocks[0].is_positive());
}

#[tokio::test]
async fn unknown_ticker_is_not_an_error() {
    let router = Router::new().route("/api/query", get(|| async { error_body("STOCK_NOT_FOUND") }));
    let client = ApiClient::new(serve(router).await, Arc::new(LocalStore::in_memory())).unwrap();

    assert_eq!(client.search("ZZZZ").await.unwrap(), None);
    assert_eq!(client.quote("ZZZZ").await.unwrap(), None);
}

#[tokio::test]
async fn search_uses_sector_when_name_repeats_ticker() {
    let router = Router::new().route(
        "/api/query",
        get(|Query(params): Query<HashMap<String, String>>| async move {
            assert_eq!(params.get("ticker").map(String::as_str), Some("SPY"));
            assert!(!params.contains_key("details"));
            Json(json!({
                "message": "",
                "data": { "ticker": "SPY", "name": "SPY", "sector": "ETF", "trend": "down" }
            }))
        }),
    );
    let client = ApiClient::new(serve(router).await, Arc::new(LocalStore::in_memory())).unwrap();

    let result = client.search(" SPY ").await.unwrap().expect("search result");
    assert_eq!(result.name, "ETF");
    assert!(result.is_trend_down());
}

#[tokio::test]
async fn portfolio_accepts_keyed_and_list_payloads() {
    let keyed = Router::new().route(
        "/api/portfolio",
        get(|| async {
            Json(json!({
                "message": "",
                "data": {
                    "p1": { "ticker": "AAPL", "price": 100.0, "qty": 1 },
                    "p2": { "ticker": "AAPL", "price": 200.0, "qty": 3 },
                    "p3": { "ticker": "MSFT", "price": 300.0, "qty": 2 }
                }
            }))
        }),
    );
    let client = ApiClient::new(serve(keyed).await, logged_in_store("a1", "r1")).unwrap();

    let holdings = client.portfolio(1).await.unwrap();
    assert_eq!(holdings.len(), 2);
    assert_eq!(holdings[0].ticker, "AAPL");
    assert_eq!(holdings[0].qty, 4);
    assert_eq!(holdings[0].price, 150.0);
    assert_eq!(holdings[0].total_value, 600.0);

    let list = Router::new().route(
        "/api/portfolio",
        get(|| async {
            Json(json!({
                "message": "",
                "data": [{ "ticker": "MSFT", "price": 300.0, "qty": 2 }]
            }))
        }),
    );
    let client = ApiClient::new(serve(list).await, logged_in_store("a1", "r1")).unwrap();

    let holdings = client.portfolio(1).await.unwrap();
    assert_eq!(holdings.len(), 1);
    assert_eq!(holdings[0].total_value, 600.0);

    let empty = Router::new().route("/api/portfolio", get(|| async { Json(json!({ "message": "" })) }));
    let client = ApiClient::new(serve(empty).await, logged_in_store("a1", "r1")).unwrap();
    assert!(client.portfolio(1).await.unwrap().is_empty());
}
