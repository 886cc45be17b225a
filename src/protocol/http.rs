//! HttpEndpoint — reqwest transport for the transactional endpoint

use async_trait::async_trait;
use reqwest::header::{ACCEPT, LOCATION};
use reqwest::{Client, Method, RequestBuilder, Response};
use std::time::Duration;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{CypherResult, Error};
use crate::protocol::endpoint::TransactionEndpoint;
use crate::protocol::wire::{EndpointResponse, RequestBody, ResponseBody};

/// Transport that sends transaction requests over HTTP.
pub struct HttpEndpoint {
    http_client: Client,
    username: Option<String>,
    password: Option<String>,
}

impl HttpEndpoint {
    pub fn new(config: &ClientConfig) -> CypherResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            http_client,
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self
            .http_client
            .request(method, url)
            .header(ACCEPT, "application/json; charset=UTF-8");

        match &self.username {
            Some(user) => builder.basic_auth(user, self.password.as_ref()),
            None => builder,
        }
    }

    /// Decode a response. Error records arrive with both success and failure
    /// statuses, so the body is decoded first and the status only matters
    /// when it cannot be.
    async fn read(response: Response) -> CypherResult<EndpointResponse> {
        let status = response.status();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?;

        debug!("Endpoint answered {} ({} bytes)", status, bytes.len());

        if bytes.is_empty() {
            return if status.is_success() {
                Ok(EndpointResponse {
                    location,
                    body: ResponseBody::default(),
                })
            } else {
                Err(Error::Status(status.as_u16()))
            };
        }

        match serde_json::from_slice::<ResponseBody>(&bytes) {
            Ok(body) => Ok(EndpointResponse { location, body }),
            Err(e) if status.is_success() => Err(e.into()),
            Err(_) => Err(Error::Status(status.as_u16())),
        }
    }
}

#[async_trait]
impl TransactionEndpoint for HttpEndpoint {
    async fn post(&self, url: &str, body: &RequestBody) -> CypherResult<EndpointResponse> {
        debug!("POST {} ({} statements)", url, body.statements.len());
        let response = self.request(Method::POST, url).json(body).send().await?;
        Self::read(response).await
    }

    async fn delete(&self, url: &str) -> CypherResult<EndpointResponse> {
        debug!("DELETE {}", url);
        let response = self.request(Method::DELETE, url).send().await?;
        Self::read(response).await
    }
}
