use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use super::portfolio_model::PortfolioSummary;
use super::portfolio_traits::PortfolioServiceTrait;
use crate::accounts::AccountStateStoreTrait;
use crate::brokerage::{BrokerPosition, BrokerageProviderTrait, PortfolioHistory};
use crate::constants::{DEFAULT_HISTORY_PERIOD, DEFAULT_HISTORY_TIMEFRAME};
use crate::errors::Result;

pub struct PortfolioService {
    brokerage: Arc<dyn BrokerageProviderTrait>,
    state_store: Arc<dyn AccountStateStoreTrait>,
}

impl PortfolioService {
    pub fn new(
        brokerage: Arc<dyn BrokerageProviderTrait>,
        state_store: Arc<dyn AccountStateStoreTrait>,
    ) -> Self {
        Self {
            brokerage,
            state_store,
        }
    }
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() {
        default
    } else {
        value
    }
}

#[async_trait]
impl PortfolioServiceTrait for PortfolioService {
    async fn portfolio_summary(&self, account_id: &str) -> Result<PortfolioSummary> {
        // Resolve the snapshot first so unknown accounts fail without a
        // brokerage round trip.
        let snapshot = self.state_store.get_state(account_id).await?;
        let account = self.brokerage.get_account().await?;
        let positions = self.brokerage.get_positions().await?;

        Ok(PortfolioSummary {
            account_id: account_id.to_string(),
            portfolio_value: account.portfolio_value,
            cash: account.cash,
            currency: account.currency,
            position_count: positions.len(),
            tokenized_count: snapshot.tokenized_holdings.len(),
        })
    }

    async fn positions(&self) -> Result<Vec<BrokerPosition>> {
        self.brokerage.get_positions().await
    }

    async fn portfolio_history(&self, period: &str, timeframe: &str) -> Result<PortfolioHistory> {
        let period = or_default(period, DEFAULT_HISTORY_PERIOD);
        let timeframe = or_default(timeframe, DEFAULT_HISTORY_TIMEFRAME);
        debug!("[Portfolio] History for period {} at {}", period, timeframe);
        self.brokerage.get_portfolio_history(period, timeframe).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::{AccountSnapshot, Profile, RegisteredAccount, TokenizedHolding};
    use crate::brokerage::{BrokerAccountSummary, BrokerageError};
    use crate::errors::{Error, ErrorKind};
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    struct MockStateStore {
        snapshot: Option<AccountSnapshot>,
    }

    #[async_trait]
    impl AccountStateStoreTrait for MockStateStore {
        fn log_id(&self, _account_id: &str) -> Result<String> {
            unimplemented!()
        }

        fn is_registered(&self, _account_id: &str) -> Result<bool> {
            unimplemented!()
        }

        async fn get_state(&self, account_id: &str) -> Result<AccountSnapshot> {
            self.snapshot
                .clone()
                .ok_or_else(|| Error::UnregisteredAccount(account_id.to_string()))
        }

        async fn put_state(
            &self,
            _account_id: &str,
            _snapshot: AccountSnapshot,
            _memo: &str,
        ) -> Result<u64> {
            unimplemented!()
        }

        async fn register(
            &self,
            _account_id: &str,
            _log_id: &str,
            _profile: Profile,
        ) -> Result<RegisteredAccount> {
            unimplemented!()
        }

        async fn update_profile(
            &self,
            _account_id: &str,
            _profile: Profile,
        ) -> Result<AccountSnapshot> {
            unimplemented!()
        }
    }

    #[derive(Default)]
    struct MockBrokerage {
        history_requests: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl BrokerageProviderTrait for MockBrokerage {
        async fn get_positions(&self) -> Result<Vec<BrokerPosition>> {
            Ok(vec![
                BrokerPosition {
                    symbol: "AAPL".to_string(),
                    ..Default::default()
                },
                BrokerPosition {
                    symbol: "TSLA".to_string(),
                    ..Default::default()
                },
            ])
        }

        async fn get_position(&self, symbol: &str) -> Result<BrokerPosition> {
            Err(BrokerageError::NotFound(symbol.to_string()).into())
        }

        async fn get_account(&self) -> Result<BrokerAccountSummary> {
            Ok(BrokerAccountSummary {
                account_number: "PA123".to_string(),
                portfolio_value: dec!(10250.75),
                cash: dec!(250.75),
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
                timeframe: timeframe.to_string(),
                ..Default::default()
            })
        }
    }

    fn snapshot_with_holding() -> AccountSnapshot {
        let mut snapshot =
            AccountSnapshot::initial("0.0.100", "0.0.200", Profile::default(), Utc::now());
        snapshot.merge_tokenized(TokenizedHolding {
            symbol: "AAPL".to_string(),
            tokenized_amount: dec!(12.5),
            ..Default::default()
        });
        snapshot
    }

    #[tokio::test]
    async fn test_portfolio_summary() {
        let service = PortfolioService::new(
            Arc::new(MockBrokerage::default()),
            Arc::new(MockStateStore {
                snapshot: Some(snapshot_with_holding()),
            }),
        );

        let summary = service.portfolio_summary("0.0.100").await.unwrap();
        assert_eq!(summary.portfolio_value, dec!(10250.75));
        assert_eq!(summary.position_count, 2);
        assert_eq!(summary.tokenized_count, 1);
    }

    #[tokio::test]
    async fn test_portfolio_summary_for_unregistered_account() {
        let service = PortfolioService::new(
            Arc::new(MockBrokerage::default()),
            Arc::new(MockStateStore { snapshot: None }),
        );

        let err = service.portfolio_summary("0.0.100").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_portfolio_history_defaults() {
        let brokerage = Arc::new(MockBrokerage::default());
        let service = PortfolioService::new(
            brokerage.clone(),
            Arc::new(MockStateStore { snapshot: None }),
        );

        service.portfolio_history("", " ").await.unwrap();
        service.portfolio_history("1A", "1D").await.unwrap();

        let requests = brokerage.history_requests.lock().unwrap();
        assert_eq!(requests[0], ("30D".to_string(), "1H".to_string()));
        assert_eq!(requests[1], ("1A".to_string(), "1D".to_string()));
    }
}
