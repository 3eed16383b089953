//! HTTP client for the fund service.
//!
//! One attempt per call: no retries and no client-side timeout. Every
//! failure is folded into [`ApiError`], whose `Display` is the line shown to
//! the user.

use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use tracing::{debug, warn};

use fondos_core::{Fund, SubscriptionRequest, Transaction, TransactionRequest};

use crate::error::{ApiError, DecodeError};
use crate::wire::{self, Confirmation};

#[derive(Debug, Clone)]
pub struct FondosClient {
    http: reqwest::Client,
    base_url: String,
}

impl FondosClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http(reqwest::Client::new(), base_url)
    }

    pub fn with_http(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /fondos`
    pub async fn list_funds(&self) -> Result<Vec<Fund>, ApiError> {
        const ENDPOINT: &str = "GET /fondos";
        let body = self.send(Method::GET, "/fondos", &[], None::<&()>).await?;
        decoded(ENDPOINT, wire::decode_funds(&body))
    }

    /// `POST /subscribe`
    pub async fn subscribe(&self, payload: &SubscriptionRequest) -> Result<Confirmation, ApiError> {
        const ENDPOINT: &str = "POST /subscribe";
        let body = self.send(Method::POST, "/subscribe", &[], Some(payload)).await?;
        decoded(ENDPOINT, wire::decode_confirmation(&body))
    }

    /// `GET /transactions?user={user}`
    pub async fn list_transactions(&self, user: &str) -> Result<Vec<Transaction>, ApiError> {
        const ENDPOINT: &str = "GET /transactions";
        let body = self
            .send(Method::GET, "/transactions", &[("user", user)], None::<&()>)
            .await?;
        decoded(ENDPOINT, wire::decode_transactions(&body))
    }

    /// `POST /transactions`
    pub async fn create_transaction(
        &self,
        payload: &TransactionRequest,
    ) -> Result<Confirmation, ApiError> {
        const ENDPOINT: &str = "POST /transactions";
        let body = self
            .send(Method::POST, "/transactions", &[], Some(payload))
            .await?;
        decoded(ENDPOINT, wire::decode_confirmation(&body))
    }

    /// Perform one call and return the raw success body.
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<String, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "api request");

        let mut req = self
            .http
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json");
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await.map_err(|e| {
            warn!(%method, %url, error = %e, "api transport failure");
            ApiError::Transport(e)
        })?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            let message = wire::error_message(status.as_u16(), &text);
            warn!(%method, %url, status = status.as_u16(), %message, "api error response");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        debug!(%method, %url, status = status.as_u16(), bytes = text.len(), "api response");
        Ok(text)
    }
}

fn decoded<T>(endpoint: &'static str, result: Result<T, DecodeError>) -> Result<T, ApiError> {
    result.map_err(|source| {
        warn!(endpoint, error = %source, "undecodable response");
        ApiError::Decode { endpoint, source }
    })
}
