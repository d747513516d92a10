//! Periodic calculation service over HTTP.

use async_trait::async_trait;
use reqwest::Client;
use repasse_core::ports::{CollaboratorError, PeriodQuote, PeriodicCalculation, QuoteRequest};

use crate::http::HttpCollaborator;

/// Asks the periodic calculation service for period figures.
#[derive(Debug, Clone)]
pub struct HttpPeriodicCalculation {
    http: HttpCollaborator,
}

impl HttpPeriodicCalculation {
    /// Creates an adapter for the service at `base_url`.
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            http: HttpCollaborator::new(client, base_url, "periodic-calculation"),
        }
    }
}

#[async_trait]
impl PeriodicCalculation for HttpPeriodicCalculation {
    async fn calculate(&self, request: &QuoteRequest) -> Result<PeriodQuote, CollaboratorError> {
        self.http.post("/calculations/period", request).await
    }
}
