//! Types that mirror the collector's NDJSON schema.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// Collector emits `mig` as 0/1; accept a bool too.
fn de_flag<'de, D>(de: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Num(f64),
        Null(()),
    }
    Ok(match Flag::deserialize(de)? {
        Flag::Bool(b) => b,
        Flag::Num(n) => n != 0.0,
        Flag::Null(()) => false,
    })
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// One device reading inside `metrics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceMetrics {
    pub gpu: f64,
    pub vram: f64,
    pub vram_total: f64,
    pub temp: f64,
    pub power: f64,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "de_flag", skip_serializing_if = "is_false")]
    pub mig: bool,
}

impl DeviceMetrics {
    /// Memory utilization in percent. A zero total yields NaN/inf, same as the collector's math.
    pub fn vram_pct(&self) -> f64 {
        self.vram / self.vram_total * 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuListEntry {
    #[serde(default)]
    pub gpu: f64,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "de_flag", skip_serializing_if = "is_false")]
    pub mig: bool,
}

/// One parsed collector record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    #[serde(default)]
    pub metrics: Vec<DeviceMetrics>,
    #[serde(default)]
    pub cpu: f64,
    #[serde(default)]
    pub ram: f64,
    #[serde(default)]
    pub disk_read: f64,
    #[serde(default)]
    pub disk_write: f64,
    #[serde(default)]
    pub disk_used: f64,
    #[serde(default)]
    pub disk_total: f64,
    #[serde(default)]
    pub gpu_list: Vec<GpuListEntry>,
    // collector-side failure report: {"error": "..."}
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    // anything else the collector sends is passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Sample {
    pub fn has_devices(&self) -> bool {
        !self.metrics.is_empty()
    }

    pub fn primary(&self) -> Option<&DeviceMetrics> {
        self.metrics.first()
    }

    /// Combined disk throughput as charted (read + write, MB/s).
    pub fn disk_io(&self) -> f64 {
        self.disk_read + self.disk_write
    }

    /// Device identities for the selector. Prefers `gpu_list`, falls back to `metrics`.
    pub fn descriptors(&self) -> Vec<DeviceDescriptor> {
        if !self.gpu_list.is_empty() {
            self.gpu_list
                .iter()
                .enumerate()
                .map(|(index, g)| DeviceDescriptor {
                    index,
                    name: g.name.clone(),
                    mig: g.mig,
                })
                .collect()
        } else {
            self.metrics
                .iter()
                .enumerate()
                .map(|(index, g)| DeviceDescriptor {
                    index,
                    name: g.name.clone(),
                    mig: g.mig,
                })
                .collect()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    pub index: usize,
    pub name: String,
    pub mig: bool,
}

impl DeviceDescriptor {
    pub fn label(&self) -> String {
        let mig = if self.mig { " (MIG)" } else { "" };
        format!("[{}] {}{mig}", self.index, self.name)
    }
}

/// Alert limits, in percent (gpu, vram) and °C (temp).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertThresholds {
    pub gpu: f64,
    pub vram: f64,
    pub temp: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            gpu: 90.0,
            vram: 90.0,
            temp: 85.0,
        }
    }
}

/// Core -> UI message: one sample plus everything the surface needs to render it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    pub payload: Sample,
    pub thresholds: AlertThresholds,
    #[serde(rename = "selectedGpu")]
    pub selected_gpu: i64,
}

/// UI -> Core messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UiMessage {
    #[serde(rename = "selectGpu")]
    SelectGpu { value: i64 },
}
