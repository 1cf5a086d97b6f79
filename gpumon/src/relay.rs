//! Packages samples for the rendering surface and persists the device selection it sends back.

use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::host::{ConfigSource, DisplaySink, KeyValueStore};
use crate::settings::SELECTED_GPU_KEY;
use crate::types::{Bundle, Sample, UiMessage};

pub struct DisplayRelay<C, K> {
    config: C,
    store: K,
}

impl<C: ConfigSource, K: KeyValueStore> DisplayRelay<C, K> {
    pub fn new(config: C, store: K) -> Self {
        Self { config, store }
    }

    /// Persisted selection, 0 when unset or not an integer.
    pub fn selected_gpu(&self) -> i64 {
        self.store
            .get(SELECTED_GPU_KEY)
            .and_then(|v| v.as_i64())
            .unwrap_or(0)
    }

    pub fn bundle(&self, sample: Sample) -> Bundle {
        Bundle {
            payload: sample,
            thresholds: self.config.settings().thresholds(),
            selected_gpu: self.selected_gpu(),
        }
    }

    pub fn relay(&self, sample: Sample, sink: &mut dyn DisplaySink) {
        sink.post(self.bundle(sample));
    }

    /// Stores the selection as-is; range checks are the surface's business.
    pub fn handle_message(&mut self, msg: UiMessage) -> Result<()> {
        match msg {
            UiMessage::SelectGpu { value } => {
                debug!(value, "device selection");
                self.store.update(SELECTED_GPU_KEY, Value::from(value))
            }
        }
    }

    pub fn store(&self) -> &K {
        &self.store
    }
}

/// Parses one inbound message; `None` for unknown types or garbage.
pub fn decode_message(raw: &str) -> Option<UiMessage> {
    match serde_json::from_str::<UiMessage>(raw.trim()) {
        Ok(m) => Some(m),
        Err(e) => {
            debug!("ignoring ui message {raw:?}: {e}");
            None
        }
    }
}
