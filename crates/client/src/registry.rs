//! Contract registry over HTTP.

use async_trait::async_trait;
use reqwest::Client;
use repasse_core::contract::{ContractSummary, LeaseContract, YearMonth};
use repasse_core::ports::{CollaboratorError, ContractRegistry};
use repasse_shared::types::ContractId;

use crate::http::HttpCollaborator;

const SERVICE: &str = "contract-registry";

/// Reads contracts from the contract registry service.
#[derive(Debug, Clone)]
pub struct HttpContractRegistry {
    http: HttpCollaborator,
}

impl HttpContractRegistry {
    /// Creates an adapter for the registry at `base_url`.
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            http: HttpCollaborator::new(client, base_url, SERVICE),
        }
    }
}

#[async_trait]
impl ContractRegistry for HttpContractRegistry {
    async fn fetch_contract(&self, id: ContractId) -> Result<LeaseContract, CollaboratorError> {
        self.http
            .get(&format!("/contracts/{id}"), &[])
            .await
            .map_err(|e| match e {
                CollaboratorError::Status { status: 404, .. } => CollaboratorError::NotFound {
                    service: SERVICE,
                    entity: format!("contract {id}"),
                },
                other => other,
            })
    }

    async fn eligible_contracts(
        &self,
        period: YearMonth,
    ) -> Result<Vec<ContractSummary>, CollaboratorError> {
        self.http
            .get("/contracts/eligible", &[("period", period.to_string())])
            .await
    }
}
