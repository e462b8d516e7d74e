//! HTTP implementation of the remote service.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use snafu::prelude::*;
use tracing::debug;

use crate::config::RemoteConfig;
use crate::types::{Feedback, FeedbackRecord, NewResponses, ProductRequest, ProductRequestRecord};

use super::{DecodeSnafu, RemoteError, RemoteService, TransportSnafu};

/// Header carrying the service api key, when one is configured.
const API_KEY_HEADER: &str = "apikey";

/// Remote service client over HTTP.
///
/// Every request carries the configured timeout; a hung call fails that
/// operation's replay instead of blocking the drain forever.
pub struct HttpRemote {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpRemote {
    pub fn new(config: &RemoteConfig) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context(TransportSnafu)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    fn apply_key(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        }
    }

    async fn post_json<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> Result<(), RemoteError> {
        let response = self
            .apply_key(self.client.post(self.url(endpoint)).json(body))
            .send()
            .await
            .context(TransportSnafu)?;

        let status = response.status();
        ensure!(
            status.is_success(),
            super::StatusSnafu {
                endpoint,
                status: status.as_u16(),
            }
        );

        debug!(endpoint, status = status.as_u16(), "Remote write accepted");
        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, RemoteError> {
        let response = self
            .apply_key(self.client.get(self.url(endpoint)).query(query))
            .send()
            .await
            .context(TransportSnafu)?;

        let status = response.status();
        ensure!(
            status.is_success(),
            super::StatusSnafu {
                endpoint,
                status: status.as_u16(),
            }
        );

        response.json().await.context(DecodeSnafu { endpoint })
    }
}

#[async_trait]
impl RemoteService for HttpRemote {
    async fn create_product_request(&self, request: &ProductRequest) -> Result<(), RemoteError> {
        self.post_json("product-requests", request).await
    }

    async fn create_feedback(&self, feedback: &Feedback) -> Result<(), RemoteError> {
        self.post_json("feedback", feedback).await
    }

    async fn list_product_requests(&self) -> Result<Vec<ProductRequestRecord>, RemoteError> {
        self.get_json("product-requests", &[]).await
    }

    async fn list_feedback(&self) -> Result<Vec<FeedbackRecord>, RemoteError> {
        self.get_json("feedback", &[]).await
    }

    async fn responses_since(&self, since: DateTime<Utc>) -> Result<NewResponses, RemoteError> {
        self.get_json("responses", &[("since", since.to_rfc3339())])
            .await
    }

    async fn health(&self) -> Result<(), RemoteError> {
        let response = self
            .apply_key(self.client.get(self.url("health")))
            .send()
            .await
            .context(TransportSnafu)?;

        let status = response.status();
        ensure!(
            status.is_success(),
            super::StatusSnafu {
                endpoint: "health",
                status: status.as_u16(),
            }
        );
        Ok(())
    }
}
