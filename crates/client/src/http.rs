//! Shared JSON-over-HTTP plumbing for the collaborator adapters.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use repasse_core::ports::CollaboratorError;

/// Builds the HTTP client shared by every adapter.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialised.
pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("repasse/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// A collaborator reachable at a base URL.
#[derive(Debug, Clone)]
pub struct HttpCollaborator {
    client: Client,
    base_url: String,
    service: &'static str,
}

impl HttpCollaborator {
    /// Creates a collaborator handle. Trailing slashes on `base_url` are ignored.
    pub fn new(client: Client, base_url: impl Into<String>, service: &'static str) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            service,
        }
    }

    /// Collaborator name used in errors and logs.
    #[must_use]
    pub fn service(&self) -> &'static str {
        self.service
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Sends a GET and decodes the JSON reply.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, CollaboratorError> {
        let mut request = self.client.get(self.url(path));
        if !query.is_empty() {
            request = request.query(query);
        }
        self.send(request).await
    }

    /// Sends a JSON POST and decodes the JSON reply.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, CollaboratorError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.client.post(self.url(path)).json(body)).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, CollaboratorError> {
        let response = request.send().await.map_err(|e| {
            warn!(error = %e, service = self.service, "Collaborator request failed");
            CollaboratorError::Unavailable {
                service: self.service,
                message: e.to_string(),
            }
        })?;
        self.decode(response).await
    }

    async fn decode<T: DeserializeOwned>(&self, response: Response) -> Result<T, CollaboratorError> {
        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), service = self.service, url = %response.url(), "Collaborator returned an error status");
            return Err(CollaboratorError::Status {
                service: self.service,
                status: status.as_u16(),
            });
        }
        response.json::<T>().await.map_err(|e| CollaboratorError::Decode {
            service: self.service,
            message: e.to_string(),
        })
    }
}
