use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

use hashvault_core::{
    brokerage::{
        BrokerAccountSummary, BrokerPosition, BrokerageError, BrokerageProviderTrait,
        PortfolioHistory,
    },
    ledger::{InMemoryLedger, LedgerError, LedgerOp},
    Result,
};
use hashvault_server::{api::app_router, assemble_state, config::Config, Collaborators};
use hashvault_storage_sqlite::{account_index::AccountIndexRepository, db};

const USER: &str = "0.0.100";
const LOG: &str = "0.0.200";
const AAPL_TOKEN: &str = "0.0.6509511";

// ============================================================================
// Fake brokerage
// ============================================================================

struct FakeBrokerage {
    positions: Vec<BrokerPosition>,
    history_requests: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl BrokerageProviderTrait for FakeBrokerage {
    async fn get_positions(&self) -> Result<Vec<BrokerPosition>> {
        Ok(self.positions.clone())
    }

    async fn get_position(&self, symbol: &str) -> Result<BrokerPosition> {
        self.positions
            .iter()
            .find(|p| p.symbol == symbol)
            .cloned()
            .ok_or_else(|| BrokerageError::NotFound(symbol.to_string()).into())
    }

    async fn get_account(&self) -> Result<BrokerAccountSummary> {
        Ok(BrokerAccountSummary {
            account_number: "PA123".to_string(),
            portfolio_value: dec!(102345.67),
            cash: dec!(5000),
            currency: "USD".to_string(),
        })
    }

    async fn get_portfolio_history(
        &self,
        period: &str,
        timeframe: &str,
    ) -> Result<PortfolioHistory> {
        self.history_requests
            .lock()
            .unwrap()
            .push((period.to_string(), timeframe.to_string()));
        Ok(PortfolioHistory {
            timestamp: vec![1700000000],
            equity: vec![dec!(100000)],
            profit_loss: vec![Decimal::ZERO],
            profit_loss_pct: vec![Decimal::ZERO],
            base_value: dec!(100000),
            timeframe: timeframe.to_string(),
        })
    }
}

fn position(symbol: &str, qty: Decimal) -> BrokerPosition {
    BrokerPosition {
        symbol: symbol.to_string(),
        qty,
        qty_available: qty,
        current_price: dec!(190.12),
        change_today: dec!(0.012),
        unrealized_pl: dec!(30.1),
        market_value: qty * dec!(190.12),
    }
}

// ============================================================================
// Harness
// ============================================================================

struct TestApp {
    router: Router,
    ledger: Arc<InMemoryLedger>,
    brokerage: Arc<FakeBrokerage>,
    _dir: TempDir,
}

async fn test_app(positions: Vec<BrokerPosition>) -> TestApp {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("index.db").to_string_lossy().to_string();

    let config = Config::from_lookup(|key| {
        let value = match key {
            "HV_LEDGER_MODE" => Some("memory"),
            "HV_OPERATOR_ACCOUNT_ID" => Some("0.0.1"),
            "HV_BROKERAGE_KEY_ID" => Some("key"),
            "HV_BROKERAGE_SECRET" => Some("secret"),
            "HV_ELIGIBLE_ASSETS" => Some("AAPL=0.0.6509511:2"),
            "HV_DEFAULT_LOGO_URL" => Some("https://logos.test/default.png"),
            _ => None,
        };
        value.map(str::to_string)
    })
    .unwrap();

    let db_path = db::init(&db_path).unwrap();
    let pool = db::create_pool(&db_path).unwrap();
    db::run_migrations(&pool).unwrap();
    let writer = db::spawn_writer(pool.clone());
    let index = Arc::new(AccountIndexRepository::new(pool, writer));

    let ledger = Arc::new(InMemoryLedger::new("0.0.1"));
    let brokerage = Arc::new(FakeBrokerage {
        positions,
        history_requests: Mutex::new(Vec::new()),
    });

    let state = assemble_state(
        config.tokenization.clone(),
        Collaborators {
            index,
            ledger_log: ledger.clone(),
            token_ledger: ledger.clone(),
            brokerage: brokerage.clone(),
        },
    );

    TestApp {
        router: app_router(state, &config),
        ledger,
        brokerage,
        _dir: dir,
    }
}

impl TestApp {
    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = self
            .router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn register(&self) {
        let uri = format!("/api/v1/auth/register/{USER}/{LOG}");
        let (status, _) = self
            .send(Method::POST, &uri, Some(json!({"displayName": "alice"})))
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }
}

// ============================================================================
// Health and registration
// ============================================================================

#[tokio::test]
async fn healthz_is_ok() {
    let app = test_app(vec![]).await;
    let (status, body) = app.send(Method::GET, "/api/v1/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn register_then_check_registration() {
    let app = test_app(vec![]).await;

    let (status, body) = app
        .send(Method::GET, &format!("/api/v1/auth/registered/{USER}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["registered"], false);

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/api/v1/auth/register/{USER}/{LOG}"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["sequenceNumber"], 1);
    assert_eq!(app.ledger.memos(LOG), vec!["account registered"]);

    let (_, body) = app
        .send(Method::GET, &format!("/api/v1/auth/registered/{USER}"), None)
        .await;
    assert_eq!(body["registered"], true);
    assert_eq!(body["logId"], LOG);
}

#[tokio::test]
async fn duplicate_registration_is_a_conflict() {
    let app = test_app(vec![]).await;
    app.register().await;

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/api/v1/auth/register/{USER}/0.0.201"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "ALREADY_EXISTS");
    assert_eq!(body["code"], 409);
}

#[tokio::test]
async fn malformed_account_id_is_a_bad_request() {
    let app = test_app(vec![]).await;
    let (status, body) = app
        .send(Method::POST, "/api/v1/auth/register/alice/0.0.200", None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "VALIDATION");
}

#[tokio::test]
async fn failed_initial_append_reports_incomplete_registration() {
    let app = test_app(vec![]).await;
    app.ledger.fail_next(
        LedgerOp::Append,
        LedgerError::Unavailable("gateway timeout".to_string()),
    );

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/api/v1/auth/register/{USER}/{LOG}"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["kind"], "PARTIAL_FAILURE");
    assert_eq!(body["saga"]["reached"], "INDEXED");
}

// ============================================================================
// Profile
// ============================================================================

#[tokio::test]
async fn unregistered_profile_is_not_found() {
    let app = test_app(vec![]).await;
    let (status, body) = app
        .send(Method::GET, "/api/v1/users/0.0.999/profile", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "NOT_FOUND");
    assert!(body.get("saga").is_none());
}

#[tokio::test]
async fn update_profile_is_readable() {
    let app = test_app(vec![]).await;
    app.register().await;

    let uri = format!("/api/v1/users/{USER}/profile");
    let (status, body) = app
        .send(
            Method::PUT,
            &uri,
            Some(json!({"displayName": "alice", "bio": "long only"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bio"], "long only");

    let (status, body) = app.send(Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["displayName"], "alice");
    assert_eq!(body["bio"], "long only");
    assert_eq!(app.ledger.memos(LOG).last().unwrap(), "profile updated");
}

// ============================================================================
// Tokenization
// ============================================================================

#[tokio::test]
async fn tokenize_portfolio_end_to_end() {
    let app = test_app(vec![position("AAPL", dec!(12.5)), position("TSLA", dec!(3))]).await;
    app.register().await;

    let (status, body) = app
        .send(Method::POST, &format!("/api/v1/users/{USER}/tokenize"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let receipts = body["receipts"].as_array().unwrap();
    assert_eq!(receipts.len(), 1);
    assert_eq!(receipts[0]["symbol"], "AAPL");
    assert_eq!(receipts[0]["amount"].as_f64(), Some(12.5));

    let (_, holdings) = app
        .send(
            Method::GET,
            &format!("/api/v1/users/{USER}/tokenized-assets"),
            None,
        )
        .await;
    assert_eq!(holdings[0]["symbol"], "AAPL");
    assert_eq!(holdings[0]["tokenizedAmount"].as_f64(), Some(12.5));
    assert_eq!(app.ledger.balance(AAPL_TOKEN, USER), dec!(12.5));

    let (status, summary) = app
        .send(Method::GET, &format!("/api/v1/users/{USER}/portfolio"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["positionCount"], 2);
    assert_eq!(summary["tokenizedCount"], 1);
}

#[tokio::test]
async fn failed_transfer_reports_orphaned_mint() {
    let app = test_app(vec![position("AAPL", dec!(12.5))]).await;
    app.register().await;
    app.ledger.fail_next(
        LedgerOp::Transfer,
        LedgerError::RejectedByNetwork {
            status: "TOKEN_NOT_ASSOCIATED_TO_ACCOUNT".to_string(),
        },
    );

    let (status, body) = app
        .send(Method::POST, &format!("/api/v1/users/{USER}/tokenize"), None)
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["kind"], "PARTIAL_FAILURE");
    assert_eq!(body["saga"]["symbol"], "AAPL");
    assert_eq!(body["saga"]["reached"], "RECORDED");
    assert_eq!(body["saga"]["failedAt"], "TRANSFER");
    assert_eq!(body["saga"]["orphanedMint"], true);

    let (_, holdings) = app
        .send(
            Method::GET,
            &format!("/api/v1/users/{USER}/tokenized-assets"),
            None,
        )
        .await;
    assert_eq!(holdings[0]["tokenizedAmount"].as_f64(), Some(12.5));
    assert_eq!(app.ledger.balance(AAPL_TOKEN, USER), Decimal::ZERO);
}

#[tokio::test]
async fn no_eligible_holdings_is_unprocessable() {
    let app = test_app(vec![position("TSLA", dec!(3))]).await;
    app.register().await;

    let (status, body) = app
        .send(Method::POST, &format!("/api/v1/users/{USER}/tokenize"), None)
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "INELIGIBLE_ASSET");
    assert!(app.ledger.mints().is_empty());
}

#[tokio::test]
async fn tokenize_single_symbol() {
    let app = test_app(vec![position("AAPL", dec!(2))]).await;
    app.register().await;

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/api/v1/users/{USER}/tokenize/AAPL"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tokenId"], AAPL_TOKEN);
    assert_eq!(app.ledger.balance(AAPL_TOKEN, USER), dec!(2));
}

// ============================================================================
// Brokerage and assets
// ============================================================================

#[tokio::test]
async fn portfolio_history_defaults() {
    let app = test_app(vec![]).await;

    let (status, body) = app
        .send(Method::GET, "/api/v1/brokerage/portfolio-history", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timeframe"], "1H");

    app.send(
        Method::GET,
        "/api/v1/brokerage/portfolio-history?period=1A&timeframe=1D",
        None,
    )
    .await;

    let requests = app.brokerage.history_requests.lock().unwrap().clone();
    assert_eq!(
        requests,
        vec![
            ("30D".to_string(), "1H".to_string()),
            ("1A".to_string(), "1D".to_string())
        ]
    );
}

#[tokio::test]
async fn brokerage_positions_pass_through() {
    let app = test_app(vec![position("AAPL", dec!(1))]).await;
    let (status, body) = app
        .send(Method::GET, "/api/v1/brokerage/positions", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["symbol"], "AAPL");
}

#[tokio::test]
async fn logo_and_eligible_assets() {
    let app = test_app(vec![]).await;

    let (status, body) = app
        .send(Method::GET, "/api/v1/assets/aapl/logo", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["symbol"], "AAPL");
    assert_eq!(body["logoRef"], "https://logos.test/default.png");

    let (_, body) = app.send(Method::GET, "/api/v1/assets/eligible", None).await;
    assert_eq!(body[0]["symbol"], "AAPL");
    assert_eq!(body[0]["tokenId"], AAPL_TOKEN);
}
