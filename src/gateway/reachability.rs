use crate::error::GatewayError;
use reqwest::Url;
use std::time::Duration;
use tokio::net::TcpStream;

/// Cheap connectivity check against the API host before a request goes out
#[derive(Debug, Clone)]
pub struct ReachabilityProbe {
    host: String,
    port: u16,
    timeout: Duration,
}

impl ReachabilityProbe {
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }

    /// Probe the host and default port of `url`
    pub fn for_url(url: &Url, timeout: Duration) -> Option<Self> {
        let host = url.host_str()?;
        let port = url.port_or_known_default()?;
        Some(Self::new(host, port, timeout))
    }

    pub fn target(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub async fn is_reachable(&self) -> bool {
        match tokio::time::timeout(self.timeout, TcpStream::connect((self.host.as_str(), self.port))).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                log::debug!("Reachability check for {} failed: {}", self.target(), e);
                false
            }
            Err(_) => {
                log::debug!("Reachability check for {} timed out", self.target());
                false
            }
        }
    }

    pub async fn check(&self) -> Result<(), GatewayError> {
        if self.is_reachable().await {
            Ok(())
        } else {
            Err(GatewayError::NetworkUnreachable(format!(
                "{} is not reachable",
                self.target()
            )))
        }
    }
}
