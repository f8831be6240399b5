use std::future::Future;
use std::time::Duration;

use tracing::{debug, info};
use url::Url;

use crate::config::ApiConfig;
use crate::error::NetworkError;

use super::api_types::parse_dogs;
use super::types::Dog;

/// Source of the full dog collection. Stateless; no retries.
pub trait RemoteSource: Send + Sync {
  fn fetch_all(&self) -> impl Future<Output = Result<Vec<Dog>, NetworkError>> + Send;
}

/// HTTP client for the dogs JSON endpoint
#[derive(Clone)]
pub struct DogClient {
  http: reqwest::Client,
  url: Url,
}

impl DogClient {
  pub fn new(config: &ApiConfig) -> Result<Self, NetworkError> {
    let http = reqwest::Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()?;

    Ok(Self {
      http,
      url: config.url.clone(),
    })
  }

  pub fn url(&self) -> &Url {
    &self.url
  }
}

impl RemoteSource for DogClient {
  async fn fetch_all(&self) -> Result<Vec<Dog>, NetworkError> {
    debug!(url = %self.url, "Fetching dogs");

    let response = self.http.get(self.url.clone()).send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
      return Err(NetworkError::from_status(status, &body));
    }

    let dogs = parse_dogs(&body)?;
    info!(count = dogs.len(), "Fetched dogs from remote");
    Ok(dogs)
  }
}
