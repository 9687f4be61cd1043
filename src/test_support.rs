//! Shared test support utilities
//!
//! Provides `MemorySink`, an `IngestionSink` that captures payloads in memory
//! for use in unit and integration tests.

use crate::domain::SinkError;
use crate::port::IngestionSink;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Sink that records every payload it receives.
#[derive(Default)]
pub struct MemorySink {
    payloads: Arc<Mutex<Vec<String>>>,
    should_fail: AtomicBool,
    attempts: AtomicUsize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following send fail with HTTP 503.
    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    /// Payloads accepted so far, in send order.
    pub fn payloads(&self) -> Vec<String> {
        self.payloads
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Accepted payloads decoded as JSON. Undecodable payloads are skipped.
    pub fn records(&self) -> Vec<Value> {
        self.payloads()
            .iter()
            .filter_map(|payload| serde_json::from_str(payload).ok())
            .collect()
    }

    /// Number of sends attempted, including failed ones.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl IngestionSink for MemorySink {
    fn post_data_to_stream(
        &self,
        payload: String,
    ) -> Pin<Box<dyn Future<Output = Result<(), SinkError>> + Send + '_>> {
        let payloads = self.payloads.clone();
        Box::pin(async move {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            if self.should_fail.load(Ordering::SeqCst) {
                return Err(SinkError::Rejected {
                    status: 503,
                    body: "Mock sink failure".to_string(),
                });
            }
            if let Ok(mut guard) = payloads.lock() {
                guard.push(payload);
            }
            Ok(())
        })
    }
}
