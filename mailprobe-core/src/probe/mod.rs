mod microsoft;
mod yahoo;

pub use microsoft::MicrosoftProbe;
pub use yahoo::YahooProbe;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::error::{MailProbeError, Result};
use crate::status::Status;
use crate::transport::{self, ProxyConfig, DEFAULT_TIMEOUT};

/// Webmail providers a probe can be built for.
///
/// `Google` is declared for parity with the provider taxonomy but has no
/// implemented probe; the factory rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailKind {
    Microsoft,
    Google,
    Yahoo,
}

impl fmt::Display for MailKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MailKind::Microsoft => "microsoft",
            MailKind::Google => "google",
            MailKind::Yahoo => "yahoo",
        };
        f.write_str(name)
    }
}

impl FromStr for MailKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "microsoft" => Ok(MailKind::Microsoft),
            "google" => Ok(MailKind::Google),
            "yahoo" => Ok(MailKind::Yahoo),
            _ => Err(format!("Unknown mail provider: {}", s)),
        }
    }
}

/// A provider-specific signup-flow probe.
///
/// Each variant wraps one provider's two-step interaction behind a common
/// `check` call; the variant is fixed at construction.
#[derive(Debug, Clone)]
pub enum Probe {
    Microsoft(MicrosoftProbe),
    Yahoo(YahooProbe),
}

impl Probe {
    /// Build a probe for `kind`, routing its requests through `proxy`.
    ///
    /// An unimplemented kind is a configuration error, reported here and
    /// never during checking.
    pub fn new(kind: MailKind, proxy: &ProxyConfig) -> Result<Probe> {
        let http = transport::build_client(proxy, DEFAULT_TIMEOUT)?;
        match kind {
            MailKind::Microsoft => Ok(Probe::Microsoft(MicrosoftProbe::new(http))),
            MailKind::Yahoo => Ok(Probe::Yahoo(YahooProbe::new(http))),
            MailKind::Google => {
                error!(kind = %kind, "no probe implemented for provider");
                Err(MailProbeError::UnsupportedProvider(kind.to_string()))
            }
        }
    }

    /// Classify `email` against the provider behind this probe.
    ///
    /// Always returns a populated status; every internal failure collapses
    /// to `CheckError`.
    pub async fn check(&self, email: &str) -> Status {
        match self {
            Probe::Microsoft(probe) => probe.check(email).await,
            Probe::Yahoo(probe) => probe.check(email).await,
        }
    }
}
