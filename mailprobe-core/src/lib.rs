pub mod bulk;
pub mod error;
mod extract;
pub mod output;
pub mod probe;
pub mod status;
pub mod transport;

pub use error::{MailProbeError, Result};
pub use status::{Status, StatusId};

pub use probe::{MailKind, MicrosoftProbe, Probe, YahooProbe};
pub use transport::{build_client, ProxyConfig, DEFAULT_TIMEOUT};

pub use bulk::{BulkChecker, BulkResult, ProgressCallback};
pub use output::{get_formatter, OutputFormat, OutputFormatter};
