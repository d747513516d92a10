//! Settlement persistence over HTTP.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use repasse_core::ports::{CollaboratorError, SettlementStore};
use repasse_core::settlement::SettlementRecord;
use repasse_shared::types::SettlementId;

use crate::http::HttpCollaborator;

#[derive(Deserialize)]
struct Saved {
    id: SettlementId,
}

/// Posts finished settlements to the persistence service.
#[derive(Debug, Clone)]
pub struct HttpSettlementStore {
    http: HttpCollaborator,
}

impl HttpSettlementStore {
    /// Creates an adapter for the store at `base_url`.
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            http: HttpCollaborator::new(client, base_url, "settlement-store"),
        }
    }
}

#[async_trait]
impl SettlementStore for HttpSettlementStore {
    async fn save(&self, record: &SettlementRecord) -> Result<SettlementId, CollaboratorError> {
        let saved: Saved = self.http.post("/settlements", record).await?;
        Ok(saved.id)
    }
}
