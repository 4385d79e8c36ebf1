//! Market demand lookup. The only place the service talks to the remote
//! job-market backend.
//!
//! `AppState` carries an `Arc<dyn DemandSource>`: `HttpDemandClient` when
//! `MARKET_API_URL` is configured, `NoDemandSource` otherwise.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

use crate::dashboard::insights::JobDemand;

const DEMAND_PATH: &str = "/api/job_demand";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum DemandError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("demand API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("demand API unavailable after {retries} retries")]
    Exhausted { retries: u32 },
}

#[async_trait]
pub trait DemandSource: Send + Sync {
    /// Demand figures for `role`, or `None` when the source has nothing to say.
    async fn lookup(&self, role: &str) -> Result<Option<JobDemand>, DemandError>;
}

/// Used when no remote market service is configured.
pub struct NoDemandSource;

#[async_trait]
impl DemandSource for NoDemandSource {
    async fn lookup(&self, _role: &str) -> Result<Option<JobDemand>, DemandError> {
        Ok(None)
    }
}

#[derive(Clone)]
pub struct HttpDemandClient {
    client: Client,
    base_url: String,
}

impl HttpDemandClient {
    pub fn new(base_url: &str) -> Result<Self, DemandError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, DEMAND_PATH)
    }
}

/// 250ms, 500ms, ... before retry number `attempt`.
fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_millis(250 * (1 << (attempt - 1)))
}

#[async_trait]
impl DemandSource for HttpDemandClient {
    /// Retries on 429 and 5xx with exponential backoff. A 404 means the
    /// service knows nothing about the role.
    async fn lookup(&self, role: &str) -> Result<Option<JobDemand>, DemandError> {
        let mut last_error: Option<DemandError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = backoff_delay(attempt);
                warn!(
                    "Demand lookup attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self
                .client
                .get(self.endpoint())
                .query(&[("role", role)])
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(DemandError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                last_error = Some(DemandError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if status.as_u16() == 404 {
                return Ok(None);
            }

            if !status.is_success() {
                return Err(DemandError::Api {
                    status: status.as_u16(),
                    message: response.text().await.unwrap_or_default(),
                });
            }

            let demand: JobDemand = response.json().await?;
            debug!("Demand lookup for '{role}' succeeded: {demand:?}");
            return Ok(Some(demand));
        }

        Err(last_error.unwrap_or(DemandError::Exhausted {
            retries: MAX_RETRIES,
        }))
    }
}
