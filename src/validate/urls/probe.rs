//! Network reachability probes.

use std::error::Error;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;

use crate::config::UrlCheckConfig;

/// Fetches a URL and reports why it is unreachable.
pub trait Probe: Sync {
    /// `Err` carries the failure reason: an error status or a transport error.
    fn probe(&self, url: &str) -> Result<(), String>;
}

/// Blocking HTTP probe.
///
/// Redirects are followed by the client. Any final status of 400 or more is
/// a failure.
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    pub fn new(config: &UrlCheckConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .timeout(Duration::from_secs(
                config.connect_timeout + config.read_timeout,
            ))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

impl Probe for HttpProbe {
    fn probe(&self, url: &str) -> Result<(), String> {
        let response = self.client.get(url).send().map_err(|e| error_chain(&e))?;
        let status = response.status().as_u16();
        if status >= 400 {
            return Err(format!("response code is {status}"));
        }
        Ok(())
    }
}

/// Error message including every source, outermost first.
fn error_chain(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_message = cause.to_string();
        if !message.contains(&cause_message) {
            message.push_str(": ");
            message.push_str(&cause_message);
        }
        source = cause.source();
    }
    message
}
