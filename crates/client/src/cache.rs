//! Contract lookup caching using Moka.
//!
//! Operators reopen the same contract many times while editing a
//! settlement; lookups are served from memory for a short TTL.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::debug;
use repasse_core::contract::{ContractSummary, LeaseContract, YearMonth};
use repasse_core::ports::{CollaboratorError, ContractRegistry};
use repasse_shared::config::CacheConfig;
use repasse_shared::types::ContractId;

/// A contract registry that caches `fetch_contract` results.
///
/// Eligible-contract listings always go to the wrapped registry.
#[derive(Clone)]
pub struct CachedContractRegistry<R> {
    inner: Arc<R>,
    contracts: Cache<ContractId, LeaseContract>,
}

impl<R: ContractRegistry> CachedContractRegistry<R> {
    /// Wraps `inner` with a cache of at most `max_capacity` contracts.
    #[must_use]
    pub fn new(inner: R, max_capacity: u64, ttl: Duration) -> Self {
        let contracts = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();
        Self {
            inner: Arc::new(inner),
            contracts,
        }
    }

    /// Wraps `inner` using the configured cache limits.
    #[must_use]
    pub fn from_config(inner: R, config: &CacheConfig) -> Self {
        Self::new(
            inner,
            config.max_contracts,
            Duration::from_secs(config.contract_ttl_secs),
        )
    }

    /// Drops a cached contract.
    pub async fn invalidate(&self, id: ContractId) {
        self.contracts.invalidate(&id).await;
    }

    /// Number of cached contracts.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.contracts.entry_count()
    }

    /// Runs pending cache maintenance.
    pub async fn run_pending_tasks(&self) {
        self.contracts.run_pending_tasks().await;
    }
}

#[async_trait]
impl<R: ContractRegistry + 'static> ContractRegistry for CachedContractRegistry<R> {
    async fn fetch_contract(&self, id: ContractId) -> Result<LeaseContract, CollaboratorError> {
        let inner = Arc::clone(&self.inner);
        self.contracts
            .try_get_with(id, async move {
                debug!(contract_id = %id, "Contract cache miss");
                inner.fetch_contract(id).await
            })
            .await
            .map_err(|e: Arc<CollaboratorError>| (*e).clone())
    }

    async fn eligible_contracts(
        &self,
        period: YearMonth,
    ) -> Result<Vec<ContractSummary>, CollaboratorError> {
        self.inner.eligible_contracts(period).await
    }
}
