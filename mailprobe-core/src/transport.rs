use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{MailProbeError, Result};

/// Request timeout applied to every outbound call. There is no retry on top.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Outbound proxy settings. An empty host means a direct connection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProxyConfig {
    pub host: String,
    pub scheme: String,
    pub user: String,
    pub password: String,
}

impl ProxyConfig {
    fn url(&self) -> String {
        let scheme = if self.scheme.is_empty() {
            "http"
        } else {
            self.scheme.as_str()
        };
        format!("{}://{}", scheme, self.host)
    }
}

/// Build the HTTP client a probe runs its requests through.
///
/// The connection pool keeps no idle connections, so nothing lingers
/// between checks sharing one client. Construction performs no network
/// activity.
pub fn build_client(proxy: &ProxyConfig, timeout: Duration) -> Result<Client> {
    let mut builder = Client::builder()
        .timeout(timeout)
        .pool_max_idle_per_host(0);

    if !proxy.host.is_empty() {
        let mut p = reqwest::Proxy::all(proxy.url())
            .map_err(|e| MailProbeError::InvalidProxy(e.to_string()))?;
        if !proxy.user.is_empty() && !proxy.password.is_empty() {
            p = p.basic_auth(&proxy.user, &proxy.password);
        }
        builder = builder.proxy(p);
    }

    Ok(builder.build()?)
}
