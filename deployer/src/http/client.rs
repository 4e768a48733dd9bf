//! HTTP client implementation

use std::time::Duration;

use reqwest::{header, Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error};
use url::Url;

use crate::app::options::ClientOptions;
use crate::authn::session::Session;
use crate::errors::DeployError;

/// HTTP client for the Portainer API
pub struct HttpClient {
    pub(super) client: Client,
    pub(super) base_url: String,
    pub(super) logout_timeout: Duration,
}

impl HttpClient {
    /// Create a new HTTP client for the Portainer instance at `host`
    pub fn new(host: &str, options: &ClientOptions) -> Result<Self, DeployError> {
        let host = host.trim_end_matches('/');
        Url::parse(host)
            .map_err(|e| DeployError::ConfigError(format!("Invalid Portainer host {}: {}", host, e)))?;

        let client = Client::builder().timeout(options.request_timeout).build()?;

        Ok(Self {
            client,
            base_url: format!("{}/api", host),
            logout_timeout: options.logout_timeout,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(super) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder, session: &Session) -> RequestBuilder {
        request.header(header::AUTHORIZATION, session.bearer())
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str, session: &Session) -> Result<T, DeployError> {
        let url = self.url(path);
        debug!("GET {}", url);

        let request = self.authorized(self.client.get(&url), session);
        let response = check_status("GET", request.send().await?).await?;

        let body = response.json().await?;
        Ok(body)
    }

    /// Make a POST request, discarding the response body
    pub async fn post<Q: Serialize, B: Serialize>(
        &self,
        path: &str,
        session: &Session,
        query: &Q,
        body: &B,
    ) -> Result<(), DeployError> {
        let url = self.url(path);
        debug!("POST {}", url);

        let request = self
            .authorized(self.client.post(&url), session)
            .query(query)
            .json(body);
        check_status("POST", request.send().await?).await?;

        Ok(())
    }

    /// Make a PUT request, discarding the response body
    pub async fn put<Q: Serialize, B: Serialize>(
        &self,
        path: &str,
        session: &Session,
        query: &Q,
        body: &B,
    ) -> Result<(), DeployError> {
        let url = self.url(path);
        debug!("PUT {}", url);

        let request = self
            .authorized(self.client.put(&url), session)
            .query(query)
            .json(body);
        check_status("PUT", request.send().await?).await?;

        Ok(())
    }
}

/// Turn a non-success response into an API error carrying status and body
async fn check_status(method: &str, response: Response) -> Result<Response, DeployError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    error!("HTTP {} failed: {} - {}", method, status, body);
    Err(DeployError::ApiError(format!("{}: {}", status, body)))
}
