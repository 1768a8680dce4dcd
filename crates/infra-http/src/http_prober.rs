// HTTP prober implementation
// reason: reqwest for async HTTP with rustls (no system OpenSSL)
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use linkwatch_core::domain::Target;
use linkwatch_core::port::Prober;
use linkwatch_core::{AppError, Result};

const USER_AGENT: &str = concat!("linkwatch/", env!("CARGO_PKG_VERSION"));

/// Prober that issues one `GET` per check
///
/// Any HTTP response counts as reachable, including 4xx/5xx: the endpoint
/// answered. Only transport failures (DNS, refused connection, timeout,
/// TLS handshake) count as down.
pub struct HttpProber {
    client: reqwest::Client,
}

impl HttpProber {
    /// Create a prober
    ///
    /// # Arguments
    /// * `request_timeout` - Per-request deadline. `None` keeps the client
    ///   default (no explicit timeout).
    ///
    /// # Example
    /// ```ignore
    /// let prober = HttpProber::new(Some(Duration::from_secs(10)))?;
    /// ```
    pub fn new(request_timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| AppError::Config(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self { client })
    }
}

fn failure_kind(e: &reqwest::Error) -> &'static str {
    if e.is_timeout() {
        "timeout"
    } else if e.is_connect() {
        "connect"
    } else if e.is_builder() {
        "invalid_request"
    } else if e.is_request() {
        "request"
    } else {
        "transport"
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, target: &Target) -> bool {
        match self.client.get(target.as_str()).send().await {
            Ok(response) => {
                debug!(
                    endpoint = %target,
                    status = response.status().as_u16(),
                    "Endpoint answered"
                );
                true
            }
            Err(e) => {
                debug!(
                    endpoint = %target,
                    kind = failure_kind(&e),
                    error = %e,
                    "Probe transport failure"
                );
                false
            }
        }
    }
}
