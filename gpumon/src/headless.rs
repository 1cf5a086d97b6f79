//! Headless surface: the Core -> UI protocol as JSON lines on stdout, UI -> Core
//! messages read as JSON lines from stdin.
//!
//! stdout lines are one of
//! `{"status": "GPU: 48%"}`, `{"payload": .., "thresholds": .., "selectedGpu": n}`,
//! `{"ended": code}`.

use std::io::Write;

use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::host::DisplaySink;
use crate::relay::decode_message;
use crate::types::{Bundle, UiMessage};

/// Writes each display event as one JSON line to the wrapped writer.
pub struct JsonLinesSink<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn emit(&mut self, v: &serde_json::Value) {
        if let Err(e) = writeln!(self.out, "{v}").and_then(|_| self.out.flush()) {
            debug!("headless write failed: {e}");
        }
    }
}

impl<W: Write> DisplaySink for JsonLinesSink<W> {
    fn set_status(&mut self, text: String) {
        self.emit(&json!({ "status": text }));
    }

    fn post(&mut self, bundle: Bundle) {
        match serde_json::to_value(&bundle) {
            Ok(v) => self.emit(&v),
            Err(e) => debug!("bundle encode failed: {e}"),
        }
    }

    fn stream_ended(&mut self, code: Option<i32>) {
        self.emit(&json!({ "ended": code }));
    }
}

/// Forwards UI messages from stdin until EOF. Garbage lines are skipped.
pub async fn forward_stdin(tx: UnboundedSender<UiMessage>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if line.trim().is_empty() {
                    continue;
                }
                if let Some(msg) = decode_message(&line) {
                    if tx.send(msg).is_err() {
                        break;
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                debug!("stdin read failed: {e}");
                break;
            }
        }
    }
}
