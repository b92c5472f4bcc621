use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;

use crate::app::{Result, TouchlineError};
use crate::fetcher::Fetcher;

pub const CONNECT_TIMEOUT: Duration = Duration::from_millis(15_000);
pub const READ_TIMEOUT: Duration = Duration::from_millis(10_000);

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .read_timeout(READ_TIMEOUT)
            .gzip(true)
            .brotli(true)
            .user_agent(concat!("touchline/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let url = Url::parse(url)?;

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::error!("Error response code: {}", status.as_u16());
            return Err(TouchlineError::HttpStatus(status.as_u16()));
        }

        let body = response.bytes().await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}
