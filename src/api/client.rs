// HTTP client for the poller's /service endpoint

use crate::api::{NewService, ServiceRecord};
use crate::error::{ApiError, ApiResult, Result, SvcpollError};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{RequestBuilder, Url};
use std::time::Duration;

/// Path of the service-list resource, relative to the server base URL
pub const SERVICE_PATH: &str = "service";

/// Accept header sent with mutating requests
pub const ACCEPT_ANY: &str = "application/json, text/plain, */*";

/// Operations offered by the `/service` endpoint family.
///
/// Every call yields a tagged result: the success branch carries the decoded
/// body, the failure branch says whether the transport, the status code or the
/// body was at fault. Callers are expected to handle both.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceApi: Send + Sync {
    /// `GET /service`
    async fn list_services(&self) -> ApiResult<Vec<ServiceRecord>>;

    /// `POST /service`, returns the server's plain-text reply
    async fn create_service(&self, service: &NewService) -> ApiResult<String>;

    /// `DELETE /service` with a JSON array of urls, returns the server's plain-text reply
    async fn delete_services(&self, urls: &[String]) -> ApiResult<String>;
}

/// reqwest-backed implementation of [`ServiceApi`]
#[derive(Debug, Clone)]
pub struct HttpServiceApi {
    http: reqwest::Client,
    endpoint: Url,
}

impl HttpServiceApi {
    /// Create a client for the server at `base_url`
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self> {
        let endpoint = Self::endpoint_for(base_url)?;

        let http = reqwest::Client::builder()
            .user_agent(concat!("svcpoll/", env!("CARGO_PKG_VERSION")))
            .timeout(request_timeout)
            .build()?;

        tracing::debug!("Service endpoint: {}", endpoint);

        Ok(Self { http, endpoint })
    }

    /// Resolve the `/service` URL below a base URL, keeping any path prefix
    pub fn endpoint_for(base_url: &str) -> Result<Url> {
        let invalid = |message: String| SvcpollError::ServerUrl {
            url: base_url.to_string(),
            message,
        };

        let base = Url::parse(&format!("{}/", base_url.trim().trim_end_matches('/')))
            .map_err(|e| invalid(e.to_string()))?;

        if !matches!(base.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", base.scheme())).into());
        }

        Ok(base.join(SERVICE_PATH).map_err(|e| invalid(e.to_string()))?)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn transport(&self, source: reqwest::Error) -> ApiError {
        ApiError::Transport {
            endpoint: self.endpoint.to_string(),
            source,
        }
    }

    /// Send a request and return the body text of a 2xx response
    async fn send_for_text(&self, request: RequestBuilder) -> ApiResult<String> {
        let response = request.send().await.map_err(|e| self.transport(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport(e))?;

        if !status.is_success() {
            tracing::warn!("{} answered {}: {}", self.endpoint, status, body);
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl ServiceApi for HttpServiceApi {
    async fn list_services(&self) -> ApiResult<Vec<ServiceRecord>> {
        let request = self
            .http
            .get(self.endpoint.clone())
            .header(ACCEPT, "application/json");

        let body = self.send_for_text(request).await?;

        serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            endpoint: self.endpoint.to_string(),
            message: e.to_string(),
        })
    }

    async fn create_service(&self, service: &NewService) -> ApiResult<String> {
        tracing::info!("Adding service '{}' ({})", service.name, service.url);

        let request = self
            .http
            .post(self.endpoint.clone())
            .header(ACCEPT, ACCEPT_ANY)
            .header(CONTENT_TYPE, "application/json")
            .json(service);

        self.send_for_text(request).await
    }

    async fn delete_services(&self, urls: &[String]) -> ApiResult<String> {
        tracing::info!("Deleting {} service(s)", urls.len());

        let request = self
            .http
            .delete(self.endpoint.clone())
            .header(ACCEPT, ACCEPT_ANY)
            .header(CONTENT_TYPE, "application/json")
            .json(urls);

        self.send_for_text(request).await
    }
}
