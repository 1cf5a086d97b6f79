//! Panel core: feeds collector output through parser -> status -> relay, and
//! applies device selections coming back from the surface.
//!
//! Every handler runs to completion before the next event is taken, so the
//! status line for a sample is always set before its bundle is posted.

use tokio::sync::mpsc::UnboundedReceiver;

use crate::host::{ConfigSource, Diagnostic, DiagnosticSink, DisplaySink, KeyValueStore};
use crate::parser::parse_chunk;
use crate::relay::DisplayRelay;
use crate::status::{project, STATUS_PENDING};
use crate::supervisor::{CollectorEvent, Supervisor};
use crate::types::UiMessage;

pub struct Panel<C, K, S, D> {
    relay: DisplayRelay<C, K>,
    sink: S,
    diagnostics: D,
    delivered: u64,
    stream_ended: bool,
}

impl<C, K, S, D> Panel<C, K, S, D>
where
    C: ConfigSource,
    K: KeyValueStore,
    S: DisplaySink,
    D: DiagnosticSink,
{
    pub fn new(relay: DisplayRelay<C, K>, mut sink: S, diagnostics: D) -> Self {
        sink.set_status(STATUS_PENDING.to_string());
        Self {
            relay,
            sink,
            diagnostics,
            delivered: 0,
            stream_ended: false,
        }
    }

    /// Handles one raw stdout chunk; returns how many samples it produced.
    pub fn ingest_chunk(&mut self, chunk: &[u8]) -> usize {
        let parsed = parse_chunk(chunk);
        for r in parsed.rejected {
            self.diagnostics.report(Diagnostic::MalformedLine(r));
        }
        let n = parsed.samples.len();
        for sample in parsed.samples {
            if let Some(e) = &sample.error {
                self.diagnostics.report(Diagnostic::CollectorError(e.clone()));
            }
            self.sink.set_status(project(&sample));
            self.relay.relay(sample, &mut self.sink);
        }
        self.delivered += n as u64;
        n
    }

    pub fn handle_stderr(&mut self, chunk: &[u8]) {
        let text = String::from_utf8_lossy(chunk).into_owned();
        self.diagnostics.report(Diagnostic::Stderr(text));
    }

    pub fn handle_message(&mut self, msg: UiMessage) {
        if let Err(e) = self.relay.handle_message(msg) {
            self.diagnostics.report(Diagnostic::PersistFailed(e.to_string()));
        }
    }

    pub fn handle_event(&mut self, ev: CollectorEvent) {
        match ev {
            CollectorEvent::Stdout(chunk) => {
                self.ingest_chunk(&chunk);
            }
            CollectorEvent::Stderr(chunk) => self.handle_stderr(&chunk),
            CollectorEvent::Exited(code) => {
                self.stream_ended = true;
                self.diagnostics.report(Diagnostic::StreamEnded { code });
                self.sink.stream_ended(code);
            }
        }
    }

    /// Drives the panel until the collector stream has ended and the inbound
    /// channel is closed. The display keeps its last state after the collector dies.
    pub async fn run(&mut self, sup: &mut Supervisor, inbound: &mut UnboundedReceiver<UiMessage>) {
        let mut inbound_open = true;
        loop {
            tokio::select! {
                ev = sup.next_event(), if !self.stream_ended => match ev {
                    Some(ev) => self.handle_event(ev),
                    None => self.stream_ended = true,
                },
                msg = inbound.recv(), if inbound_open => match msg {
                    Some(msg) => self.handle_message(msg),
                    None => inbound_open = false,
                },
                else => break,
            }
        }
    }

    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    pub fn stream_ended(&self) -> bool {
        self.stream_ended
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn diagnostics(&self) -> &D {
        &self.diagnostics
    }
}
