// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use finanzero::application::LedgerService;
use finanzero::cli::Session;
use finanzero::storage::{Clock, LedgerStore};
use serde_json::{json, Value};

/// Clock that only moves when a test tells it to
#[derive(Clone)]
pub struct ManualClock {
    seconds: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn starting_at(seconds: i64) -> Self {
        Self {
            seconds: Arc::new(AtomicI64::new(seconds)),
        }
    }

    pub fn advance(&self, seconds: i64) {
        self.seconds.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.seconds.load(Ordering::SeqCst), 0)
            .unwrap()
    }
}

/// Helper to create a service over a fresh in-memory store
pub fn test_service() -> LedgerService {
    LedgerService::in_memory()
}

/// Helper to create a service whose timestamps are driven by the returned clock
pub fn service_with_clock() -> (LedgerService, ManualClock) {
    let clock = ManualClock::starting_at(1_762_732_800); // 2025-11-10
    let service = LedgerService::new(LedgerStore::with_clock(clock.clone()));
    (service, clock)
}

/// Raw form submission as the UI sends it: every field as text
pub fn form(description: &str, amount: &str, kind: &str) -> Value {
    json!({
        "description": description,
        "amount": amount,
        "kind": kind,
    })
}

/// Run a session script and return everything it printed
pub fn run_session(service: &LedgerService, script: &str) -> String {
    let mut session = Session::new(service, Vec::new());
    session.run(script.as_bytes()).unwrap();
    String::from_utf8(session.into_inner()).unwrap()
}
