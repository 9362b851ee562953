//! HTTP client for the EnergyGrid authentication API

use crate::config::ApiConfig;
use crate::error::Result;
use crate::models::{ErrorBody, LoginRequest, LoginResponse, User};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Failures
// ============================================================================

/// Every way a call to the authentication API can fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    /// The server answered with a non-2xx status.
    #[error("Server responded with status {status}")]
    Response { status: u16, body: ErrorBody },

    /// The request went out but no response came back.
    #[error("Network error: {0}")]
    Network(String),

    /// Failure on the client side (encoding, decoding, local storage).
    #[error("{0}")]
    Client(String),
}

impl From<reqwest::Error> for AuthFailure {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            AuthFailure::Response {
                status: status.as_u16(),
                body: ErrorBody::default(),
            }
        } else if e.is_connect() || e.is_timeout() || e.is_request() {
            AuthFailure::Network(e.to_string())
        } else {
            AuthFailure::Client(e.to_string())
        }
    }
}

// ============================================================================
// API
// ============================================================================

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> std::result::Result<LoginResponse, AuthFailure>;

    async fn current_user(&self, token: &str) -> std::result::Result<User, AuthFailure>;

    async fn logout(&self, token: &str) -> std::result::Result<(), AuthFailure>;
}

pub struct ApiClient {
    http: Client,
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        config.validate()?;

        let http = Client::builder()
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    async fn read_json<T: DeserializeOwned>(resp: Response) -> std::result::Result<T, AuthFailure> {
        let status = resp.status();

        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let body = serde_json::from_str::<ErrorBody>(&text).unwrap_or_default();
            tracing::debug!("Auth API returned {}", status);
            return Err(AuthFailure::Response {
                status: status.as_u16(),
                body,
            });
        }

        resp.json::<T>()
            .await
            .map_err(|e| AuthFailure::Client(format!("Invalid response from server: {}", e)))
    }
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, request: &LoginRequest) -> std::result::Result<LoginResponse, AuthFailure> {
        let resp = self
            .http
            .post(self.config.endpoint("auth/login"))
            .json(request)
            .send()
            .await?;

        Self::read_json(resp).await
    }

    async fn current_user(&self, token: &str) -> std::result::Result<User, AuthFailure> {
        let resp = self
            .http
            .get(self.config.endpoint("auth/me"))
            .bearer_auth(token)
            .send()
            .await?;

        let data: LoginResponse = Self::read_json(resp).await?;
        data.data
            .and_then(|d| d.user)
            .ok_or_else(|| AuthFailure::Client("Session response did not include a user".to_string()))
    }

    async fn logout(&self, token: &str) -> std::result::Result<(), AuthFailure> {
        let resp = self
            .http
            .post(self.config.endpoint("auth/logout"))
            .bearer_auth(token)
            .send()
            .await?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(AuthFailure::Response {
                status: resp.status().as_u16(),
                body: ErrorBody::default(),
            })
        }
    }
}
