//! Bundle packaging, inbound selection messages, and persistence of the selection.
mod common;

use common::{Capture, GPU_47};
use gpumon::host::{KeyValueStore, MemoryStore};
use gpumon::parser::parse_line;
use gpumon::relay::{decode_message, DisplayRelay};
use gpumon::settings::{FileConfig, FileStore, Overrides, Settings, SELECTED_GPU_KEY};
use gpumon::types::{AlertThresholds, UiMessage};
use serde_json::json;

#[test]
fn bundle_carries_thresholds_and_default_selection() {
    let relay = DisplayRelay::new(Settings::default(), MemoryStore::default());
    let b = relay.bundle(parse_line(GPU_47).unwrap());
    assert_eq!(b.selected_gpu, 0);
    assert_eq!(b.thresholds, AlertThresholds { gpu: 90.0, vram: 90.0, temp: 85.0 });
}

#[test]
fn bundle_wire_shape() {
    let relay = DisplayRelay::new(Settings::default(), MemoryStore::default());
    let v = serde_json::to_value(relay.bundle(parse_line(GPU_47).unwrap())).unwrap();
    assert_eq!(v["selectedGpu"], 0);
    assert_eq!(v["thresholds"], json!({"gpu": 90.0, "vram": 90.0, "temp": 85.0}));
    assert_eq!(v["payload"]["metrics"][0]["name"], "RTX A");
    assert_eq!(v["payload"]["disk_total"], 500.0);
    assert!(v.get("selected_gpu").is_none());
}

#[test]
fn select_message_shows_up_in_next_bundle() {
    let mut relay = DisplayRelay::new(Settings::default(), MemoryStore::default());
    relay.handle_message(UiMessage::SelectGpu { value: 2 }).unwrap();
    let mut sink = Capture::default();
    relay.relay(parse_line(GPU_47).unwrap(), &mut sink);
    assert_eq!(sink.bundles()[0].selected_gpu, 2);
}

#[test]
fn out_of_range_selection_is_stored_unchanged() {
    let mut relay = DisplayRelay::new(Settings::default(), MemoryStore::default());
    relay.handle_message(UiMessage::SelectGpu { value: 17 }).unwrap();
    assert_eq!(relay.selected_gpu(), 17);
    relay.handle_message(UiMessage::SelectGpu { value: -1 }).unwrap();
    assert_eq!(relay.store().get(SELECTED_GPU_KEY), Some(json!(-1)));
}

#[test]
fn non_integer_stored_value_reads_as_zero() {
    let mut store = MemoryStore::default();
    store.update(SELECTED_GPU_KEY, json!("two")).unwrap();
    let relay = DisplayRelay::new(Settings::default(), store);
    assert_eq!(relay.selected_gpu(), 0);
}

#[test]
fn selection_survives_restart() {
    let td = tempfile::tempdir().unwrap();
    let path = td.path().join("gpumon").join("state.json");
    {
        let mut relay = DisplayRelay::new(Settings::default(), FileStore::open(path.clone()));
        relay.handle_message(UiMessage::SelectGpu { value: 2 }).unwrap();
    }
    let relay = DisplayRelay::new(Settings::default(), FileStore::open(path));
    let b = relay.bundle(parse_line(GPU_47).unwrap());
    assert_eq!(b.selected_gpu, 2);
}

#[test]
fn thresholds_follow_live_settings_file() {
    let td = tempfile::tempdir().unwrap();
    let path = td.path().join("settings.json");
    let relay = DisplayRelay::new(FileConfig::new(path.clone(), Overrides::default()), MemoryStore::default());
    assert_eq!(relay.bundle(parse_line(GPU_47).unwrap()).thresholds.gpu, 90.0);

    std::fs::write(&path, r#"{"alertGpu": 50, "alertTemp": 70}"#).unwrap();
    let t = relay.bundle(parse_line(GPU_47).unwrap()).thresholds;
    assert_eq!(t, AlertThresholds { gpu: 50.0, vram: 90.0, temp: 70.0 });
}

#[test]
fn decodes_select_messages_only() {
    assert_eq!(
        decode_message(r#"{"type":"selectGpu","value":3}"#),
        Some(UiMessage::SelectGpu { value: 3 })
    );
    assert_eq!(decode_message(r#"{"type":"refresh"}"#), None);
    assert_eq!(decode_message(r#"{"type":"selectGpu"}"#), None);
    assert_eq!(decode_message("garbage"), None);
}

#[test]
fn select_message_wire_shape() {
    let v = serde_json::to_value(UiMessage::SelectGpu { value: 1 }).unwrap();
    assert_eq!(v, json!({"type": "selectGpu", "value": 1}));
}
