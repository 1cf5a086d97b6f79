//! Narrow interfaces to the things the panel core does not own: configuration,
//! the durable key-value store, the display, and the diagnostics channel.

use std::collections::BTreeMap;

use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::parser::RejectedLine;
use crate::settings::Settings;
use crate::types::Bundle;

/// Live configuration. Implementations may re-read their backing store on every call.
pub trait ConfigSource {
    fn settings(&self) -> Settings;
}

impl ConfigSource for Settings {
    fn settings(&self) -> Settings {
        self.clone()
    }
}

/// Durable per-installation key-value store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<Value>;
    fn update(&mut self, key: &str, value: Value) -> Result<()>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    pub values: BTreeMap<String, Value>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn update(&mut self, key: &str, value: Value) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Where the status line and bundles go. Delivery is fire-and-forget.
pub trait DisplaySink {
    fn set_status(&mut self, text: String);
    fn post(&mut self, bundle: Bundle);
    fn stream_ended(&mut self, _code: Option<i32>) {}
}

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    Status(String),
    Bundle(Box<Bundle>),
    StreamEnded(Option<i32>),
}

/// Forwards everything to the dashboard over an unbounded channel.
/// A closed receiver just drops the event.
pub struct ChannelSink {
    tx: UnboundedSender<SurfaceEvent>,
}

impl ChannelSink {
    pub fn new(tx: UnboundedSender<SurfaceEvent>) -> Self {
        Self { tx }
    }
}

impl DisplaySink for ChannelSink {
    fn set_status(&mut self, text: String) {
        let _ = self.tx.send(SurfaceEvent::Status(text));
    }

    fn post(&mut self, bundle: Bundle) {
        let _ = self.tx.send(SurfaceEvent::Bundle(Box::new(bundle)));
    }

    fn stream_ended(&mut self, code: Option<i32>) {
        let _ = self.tx.send(SurfaceEvent::StreamEnded(code));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    MalformedLine(RejectedLine),
    /// `{"error": ...}` record reported by the collector itself
    CollectorError(String),
    Stderr(String),
    PersistFailed(String),
    StreamEnded { code: Option<i32> },
}

pub trait DiagnosticSink {
    fn report(&mut self, d: Diagnostic);
}

impl<F: FnMut(Diagnostic)> DiagnosticSink for F {
    fn report(&mut self, d: Diagnostic) {
        self(d)
    }
}

/// Default sink: everything goes to `tracing`, malformed lines are counted.
#[derive(Debug, Default)]
pub struct TracingDiagnostics {
    pub malformed: u64,
}

impl DiagnosticSink for TracingDiagnostics {
    fn report(&mut self, d: Diagnostic) {
        match d {
            Diagnostic::MalformedLine(r) => {
                self.malformed += 1;
                debug!(total = self.malformed, error = %r.error, line = %r.line, "discarded malformed line");
            }
            Diagnostic::CollectorError(e) => warn!(target: "collector", "collector reported: {e}"),
            Diagnostic::Stderr(s) => warn!(target: "collector", "{}", s.trim_end()),
            Diagnostic::PersistFailed(e) => warn!("failed to persist selection: {e}"),
            Diagnostic::StreamEnded { code } => {
                info!(?code, malformed = self.malformed, "collector stream ended")
            }
        }
    }
}
