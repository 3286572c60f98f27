//! Shared fixtures for dispatcher tests.

use std::sync::{Arc, Mutex};

use courier_schema::{Params, ProtocolDefinition};
use rstest::fixture;
use serde_json::Value;

use crate::{Connection, ConnectionError, Dispatcher};

/// A small protocol with one command per interesting parameter shape.
pub(crate) const PAGE_PROTOCOL: &str = r#"{
    "domains": [
        {
            "domain": "Page",
            "commands": [
                {"name": "enable"},
                {
                    "name": "navigate",
                    "parameters": [
                        {"name": "url", "type": "string"},
                        {"name": "referrer", "type": "string", "optional": true}
                    ]
                }
            ],
            "events": [{"name": "loaded"}, {"name": "frameNavigated"}]
        },
        {
            "domain": "Network",
            "commands": [{"name": "enable"}],
            "events": [{"name": "requestWillBeSent"}]
        }
    ]
}"#;

/// Connection that records every payload and can be told to fail.
#[derive(Debug, Default)]
pub(crate) struct RecordingConnection {
    sent: Mutex<Vec<String>>,
    failing: Mutex<bool>,
}

impl RecordingConnection {
    /// Makes every subsequent send fail with [`ConnectionError::Closed`].
    pub(crate) fn fail_sends(&self) {
        *self.failing.lock().expect("failing lock") = true;
    }

    /// Returns the payloads sent so far, parsed as JSON.
    pub(crate) fn sent(&self) -> Vec<Value> {
        self.sent
            .lock()
            .expect("sent lock")
            .iter()
            .map(|payload| serde_json::from_str(payload).expect("payload is JSON"))
            .collect()
    }
}

impl Connection for RecordingConnection {
    fn send(&self, payload: &str) -> Result<(), ConnectionError> {
        if *self.failing.lock().expect("failing lock") {
            return Err(ConnectionError::Closed);
        }
        self.sent
            .lock()
            .expect("sent lock")
            .push(payload.to_owned());
        Ok(())
    }
}

/// Dispatcher type used throughout the tests.
pub(crate) type TestDispatcher = Dispatcher<Arc<RecordingConnection>>;

/// Builds a dispatcher over [`PAGE_PROTOCOL`] and a fresh recording
/// connection.
pub(crate) fn new_dispatcher() -> TestDispatcher {
    let definition =
        ProtocolDefinition::from_json_str(PAGE_PROTOCOL).expect("fixture protocol parses");
    Dispatcher::new(Arc::new(definition), Arc::new(RecordingConnection::default()))
}

#[fixture]
pub(crate) fn dispatcher() -> TestDispatcher {
    new_dispatcher()
}

/// Parses a JSON object literal into a parameter bag.
pub(crate) fn params(json: &str) -> Params {
    serde_json::from_str(json).expect("params are a JSON object")
}

/// Collects `(member, params)` pairs delivered to a listener.
pub(crate) type EventLog = Arc<Mutex<Vec<(String, Value)>>>;

/// Registers a listener on `domain` that appends to a fresh log.
pub(crate) fn record_domain(dispatcher: &TestDispatcher, domain: &str) -> EventLog {
    let log = EventLog::default();
    let sink = Arc::clone(&log);
    dispatcher.register_domain_listener(domain, move |member, params| {
        sink.lock()
            .expect("log lock")
            .push((member.to_owned(), params.clone()));
    });
    log
}
