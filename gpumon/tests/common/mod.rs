//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use gpumon::host::{Diagnostic, DiagnosticSink, DisplaySink, SurfaceEvent};
use gpumon::types::Bundle;

pub const GPU_47: &str = r#"{"metrics":[{"gpu":47.6,"vram":4.0,"vram_total":16.0,"temp":60,"power":120.5,"name":"RTX A","mig":0}],"cpu":12.5,"ram":40.0,"disk_read":1.5,"disk_write":0.5,"disk_used":100.04,"disk_total":500.0,"gpu_list":[{"gpu":47.6,"name":"RTX A","mig":0}]}"#;

pub const GPU_91: &str = r#"{"metrics":[{"gpu":91,"vram":4.0,"vram_total":16.0,"temp":60,"power":200,"name":"RTX A"}],"cpu":5,"ram":30,"disk_read":0,"disk_write":0,"disk_used":1,"disk_total":2,"gpu_list":[{"gpu":91,"name":"RTX A"}]}"#;

pub const NO_GPU: &str = r#"{"metrics":[],"cpu":5,"ram":30,"disk_read":0,"disk_write":0,"disk_used":1,"disk_total":2,"gpu_list":[]}"#;

pub const TWO_GPUS: &str = r#"{"metrics":[{"gpu":10,"vram":1,"vram_total":10,"temp":40,"power":50,"name":"A"},{"gpu":70,"vram":5,"vram_total":10,"temp":70,"power":150,"name":"B","mig":true}],"cpu":1,"ram":2,"disk_read":3,"disk_write":4,"disk_used":5,"disk_total":6,"gpu_list":[{"gpu":10,"name":"A"},{"gpu":70,"name":"B","mig":1}]}"#;

/// Records everything the panel sends to the display, in order.
#[derive(Default)]
pub struct Capture {
    pub events: Vec<SurfaceEvent>,
}

impl Capture {
    pub fn bundles(&self) -> Vec<&Bundle> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Bundle(b) => Some(b.as_ref()),
                _ => None,
            })
            .collect()
    }

    pub fn statuses(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Status(s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl DisplaySink for Capture {
    fn set_status(&mut self, text: String) {
        self.events.push(SurfaceEvent::Status(text));
    }

    fn post(&mut self, bundle: Bundle) {
        self.events.push(SurfaceEvent::Bundle(Box::new(bundle)));
    }

    fn stream_ended(&mut self, code: Option<i32>) {
        self.events.push(SurfaceEvent::StreamEnded(code));
    }
}

#[derive(Default)]
pub struct Diags(pub Vec<Diagnostic>);

impl DiagnosticSink for Diags {
    fn report(&mut self, d: Diagnostic) {
        self.0.push(d);
    }
}

pub fn chunk(lines: &[&str]) -> Vec<u8> {
    let mut s = String::new();
    for l in lines {
        s.push_str(l);
        s.push('\n');
    }
    s.into_bytes()
}
