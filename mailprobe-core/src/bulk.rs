//! Bounded-concurrency checking of many addresses against one probe.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::probe::Probe;
use crate::status::Status;

pub type ProgressCallback = Box<dyn Fn(usize, usize, &str) + Send + Sync>;

/// Outcome for a single address in a bulk run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkResult {
    pub email: String,
    pub status: Status,
    pub duration_ms: u64,
}

/// Runs checks for a list of addresses with bounded concurrency.
///
/// Checks share one probe (and therefore one transport); there is no state
/// between them, so results arrive in completion order.
#[derive(Debug)]
pub struct BulkChecker {
    probe: Probe,
    concurrency: usize,
}

impl BulkChecker {
    pub fn new(probe: Probe) -> Self {
        Self {
            probe,
            concurrency: 4,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub async fn execute(
        &self,
        emails: Vec<String>,
        progress: Option<ProgressCallback>,
    ) -> Vec<BulkResult> {
        let total = emails.len();
        let completed = Arc::new(AtomicUsize::new(0));

        debug!(total, concurrency = self.concurrency, "starting bulk check");

        stream::iter(emails)
            .map(|email| {
                let completed = completed.clone();
                let progress = progress.as_ref();
                let probe = &self.probe;
                async move {
                    let start = Instant::now();
                    let status = probe.check(&email).await;
                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    if let Some(callback) = progress {
                        callback(done, total, &email);
                    }
                    BulkResult {
                        email,
                        status,
                        duration_ms: start.elapsed().as_millis() as u64,
                    }
                }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await
    }
}
