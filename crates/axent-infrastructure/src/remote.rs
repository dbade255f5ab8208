//! Remote document store and session probe over HTTP.
//!
//! Failures are reported through the `Result` channel, never by panic:
//! the state store treats every remote failure as non-fatal.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use axent_core::error::{AxentError, Result};
use axent_core::sync::{DocumentStore, SessionSource, SessionState, SessionSubscription};
use axent_core::user::UserIdentity;

/// Connection settings for the remote document backend.
#[derive(Debug, Clone)]
pub struct RemoteSettings {
    pub base_url: String,
    pub api_key: String,
}

/// Document store talking to a JSON document API.
///
/// One endpoint per document: `{base_url}/{collection}/{id}`. `PUT`
/// replaces the document wholesale, `PATCH` merges fields.
#[derive(Clone)]
pub struct HttpDocumentStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpDocumentStore {
    /// Creates a store for the given backend settings.
    pub fn new(settings: &RemoteSettings) -> Self {
        Self {
            client: Client::new(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
        }
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{}/{}", self.base_url, collection, id)
    }
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn read_document(&self, collection: &str, id: &str) -> Result<Option<serde_json::Value>> {
        let response = self
            .client
            .get(self.document_url(collection, id))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|err| AxentError::sync(format!("document read failed: {err}")))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let document = response
                    .json()
                    .await
                    .map_err(|err| AxentError::sync(format!("document body invalid: {err}")))?;
                Ok(Some(document))
            }
            status => Err(AxentError::sync(format!(
                "document read returned {status} for {collection}/{id}"
            ))),
        }
    }

    async fn write_document(
        &self,
        collection: &str,
        id: &str,
        document: &serde_json::Value,
        merge: bool,
    ) -> Result<()> {
        let url = self.document_url(collection, id);
        let request = if merge {
            self.client.patch(url)
        } else {
            self.client.put(url)
        };

        let response = request
            .bearer_auth(&self.api_key)
            .json(document)
            .send()
            .await
            .map_err(|err| AxentError::sync(format!("document write failed: {err}")))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(AxentError::sync(format!(
                "document write returned {status} for {collection}/{id}"
            )))
        }
    }
}

/// Session probe for remote mode.
///
/// The backend has no push primitive over plain HTTP, so the current
/// session is polled at a fixed interval: `GET {base_url}/session`
/// returns the identity record, 401/404 mean no session.
pub struct HttpSessionSource {
    client: Client,
    base_url: String,
    api_key: String,
    poll_interval: Duration,
}

impl HttpSessionSource {
    pub fn new(settings: &RemoteSettings, poll_interval: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            poll_interval,
        }
    }

    async fn probe(client: &Client, url: &str, api_key: &str) -> Option<SessionState> {
        let response = match client.get(url).bearer_auth(api_key).send().await {
            Ok(response) => response,
            Err(err) => {
                // Transient transport failure: keep the last known state.
                debug!(error = %err, "session probe failed");
                return None;
            }
        };

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::NOT_FOUND => Some(SessionState::Anonymous),
            status if status.is_success() => match response.json::<UserIdentity>().await {
                Ok(identity) => Some(SessionState::Identified(identity)),
                Err(err) => {
                    warn!(error = %err, "session probe returned an invalid identity");
                    Some(SessionState::Anonymous)
                }
            },
            status => {
                debug!(%status, "session probe returned unexpected status");
                None
            }
        }
    }
}

impl SessionSource for HttpSessionSource {
    fn subscribe(&self) -> SessionSubscription {
        let (tx, rx) = watch::channel(SessionState::Checking);
        let token = CancellationToken::new();
        let task_token = token.clone();

        let client = self.client.clone();
        let url = format!("{}/session", self.base_url);
        let api_key = self.api_key.clone();
        let poll_interval = self.poll_interval;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(poll_interval);
            loop {
                tokio::select! {
                    _ = task_token.cancelled() => break,
                    _ = interval.tick() => {
                        if let Some(next) = Self::probe(&client, &url, &api_key).await {
                            tx.send_if_modified(|current| {
                                if *current == next {
                                    false
                                } else {
                                    *current = next;
                                    true
                                }
                            });
                        }
                    }
                }
            }
        });

        SessionSubscription::new(rx, Box::new(move || token.cancel()))
    }
}
