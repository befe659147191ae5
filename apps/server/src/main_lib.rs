use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use hashvault_brokerage::AlpacaClient;
use hashvault_core::{
    accounts::{AccountIndexRepositoryTrait, AccountStateStore, AccountStateStoreTrait},
    brokerage::BrokerageProviderTrait,
    ledger::{InMemoryLedger, LedgerLogTrait, TokenLedgerTrait},
    portfolio::{PortfolioService, PortfolioServiceTrait},
    tokenization::{TokenizationConfig, TokenizationService, TokenizationServiceTrait},
};
use hashvault_ledger::LedgerClient;
use hashvault_storage_sqlite::{
    account_index::AccountIndexRepository,
    db::{self, write_actor},
};

use crate::config::{Config, LedgerMode};

pub struct AppState {
    pub state_store: Arc<dyn AccountStateStoreTrait>,
    pub tokenization_service: Arc<dyn TokenizationServiceTrait>,
    pub portfolio_service: Arc<dyn PortfolioServiceTrait>,
}

/// External collaborators the services are wired to.
pub struct Collaborators {
    pub index: Arc<dyn AccountIndexRepositoryTrait>,
    pub ledger_log: Arc<dyn LedgerLogTrait>,
    pub token_ledger: Arc<dyn TokenLedgerTrait>,
    pub brokerage: Arc<dyn BrokerageProviderTrait>,
}

pub fn init_tracing() {
    let log_format = std::env::var("HV_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

/// Wires the services on top of the given collaborators.
pub fn assemble_state(tokenization: TokenizationConfig, deps: Collaborators) -> Arc<AppState> {
    let state_store: Arc<dyn AccountStateStoreTrait> =
        Arc::new(AccountStateStore::new(deps.index, deps.ledger_log));
    let tokenization_service = Arc::new(TokenizationService::new(
        tokenization,
        deps.brokerage.clone(),
        deps.token_ledger,
        state_store.clone(),
    ));
    let portfolio_service = Arc::new(PortfolioService::new(deps.brokerage, state_store.clone()));

    Arc::new(AppState {
        state_store,
        tokenization_service,
        portfolio_service,
    })
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = write_actor::spawn_writer(pool.clone());
    let index = Arc::new(AccountIndexRepository::new(pool, writer));

    let (ledger_log, token_ledger): (Arc<dyn LedgerLogTrait>, Arc<dyn TokenLedgerTrait>) =
        match &config.ledger {
            LedgerMode::Network(ledger_config) => {
                let client = Arc::new(LedgerClient::new(ledger_config.clone())?);
                (client.clone(), client)
            }
            LedgerMode::InMemory {
                operator_account_id,
            } => {
                tracing::warn!(
                    "Using an in-memory ledger for operator {}; account state will not survive a restart",
                    operator_account_id
                );
                let ledger = Arc::new(InMemoryLedger::new(operator_account_id.clone()));
                (ledger.clone(), ledger)
            }
        };

    let brokerage = Arc::new(AlpacaClient::new(config.brokerage.clone())?);
    tracing::info!(
        "Brokerage at {}; {} eligible asset(s)",
        brokerage.base_url(),
        config.tokenization.eligible_assets.len()
    );

    Ok(assemble_state(
        config.tokenization.clone(),
        Collaborators {
            index,
            ledger_log,
            token_ledger,
            brokerage,
        },
    ))
}
