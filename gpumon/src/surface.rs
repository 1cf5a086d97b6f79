//! Dashboard state: what the rendering surface does with each bundle, kept free of
//! terminal code so it can be driven directly.

use crate::history::Series;
use crate::host::SurfaceEvent;
use crate::status::STATUS_PENDING;
use crate::types::{AlertThresholds, Bundle, DeviceDescriptor, DeviceMetrics, UiMessage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chart {
    Gpu,
    Vram,
    Temp,
    Power,
    Cpu,
    Ram,
    Disk,
}

impl Chart {
    pub const ALL: [Chart; 7] = [
        Chart::Gpu,
        Chart::Vram,
        Chart::Temp,
        Chart::Power,
        Chart::Cpu,
        Chart::Ram,
        Chart::Disk,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Chart::Gpu => "GPU %",
            Chart::Vram => "VRAM %",
            Chart::Temp => "Temp °C",
            Chart::Power => "Power W",
            Chart::Cpu => "CPU %",
            Chart::Ram => "RAM %",
            Chart::Disk => "Disk MB/s",
        }
    }

    /// Fixed sparkline ceiling for percentage charts.
    pub fn ceiling(self) -> Option<u64> {
        match self {
            Chart::Gpu | Chart::Vram | Chart::Cpu | Chart::Ram => Some(100),
            _ => None,
        }
    }

    fn idx(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Empty device list: only the "no device" indicator changed
    NoDevice,
    /// Selected index has no reading in this sample
    Missing,
    Updated { alert: bool },
}

/// Strict comparison: a value equal to its limit does not alert.
pub fn alert_text(g: &DeviceMetrics, t: &AlertThresholds) -> Option<String> {
    let vram_pct = g.vram_pct();
    if g.gpu > t.gpu || vram_pct > t.vram || g.temp > t.temp {
        Some(format!(
            "High usage: GPU {}% | VRAM {:.1}% | Temp {}°C",
            g.gpu, vram_pct, g.temp
        ))
    } else {
        None
    }
}

#[derive(Debug, Clone)]
pub struct Surface {
    pub status: String,
    pub devices: Vec<DeviceDescriptor>,
    pub selected: i64,
    pub no_device: bool,
    pub alert: Option<String>,
    /// (used, total) in GB from the last applied sample
    pub disk: Option<(f64, f64)>,
    pub last_update: Option<String>,
    /// `Some(code)` once the collector stream ended
    pub ended: Option<Option<i32>>,
    charts: Vec<Series>,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface {
    pub fn new() -> Self {
        Self {
            status: STATUS_PENDING.to_string(),
            devices: Vec::new(),
            selected: 0,
            no_device: false,
            alert: None,
            disk: None,
            last_update: None,
            ended: None,
            charts: vec![Series::default(); Chart::ALL.len()],
        }
    }

    pub fn disk_space(&self) -> Option<String> {
        self.disk
            .map(|(used, total)| format!("Disk: {used:.1} / {total:.1} GB"))
    }

    pub fn series(&self, c: Chart) -> &Series {
        &self.charts[c.idx()]
    }

    pub fn apply_event(&mut self, ev: SurfaceEvent) {
        match ev {
            SurfaceEvent::Status(s) => self.status = s,
            SurfaceEvent::Bundle(b) => {
                let ts = chrono::Local::now().format("%H:%M:%S").to_string();
                self.apply_at(&b, &ts);
            }
            SurfaceEvent::StreamEnded(code) => self.ended = Some(code),
        }
    }

    /// Applies one bundle, labelling any new chart points with `ts`.
    pub fn apply_at(&mut self, b: &Bundle, ts: &str) -> Applied {
        let p = &b.payload;
        if !p.has_devices() {
            self.no_device = true;
            return Applied::NoDevice;
        }
        self.no_device = false;

        if self.devices.is_empty() {
            self.devices = p.descriptors();
            self.selected = b.selected_gpu;
        }

        let Some(g) = usize::try_from(self.selected)
            .ok()
            .and_then(|i| p.metrics.get(i))
        else {
            return Applied::Missing;
        };

        let points = [
            (Chart::Gpu, g.gpu),
            (Chart::Vram, g.vram_pct()),
            (Chart::Temp, g.temp),
            (Chart::Power, g.power),
            (Chart::Cpu, p.cpu),
            (Chart::Ram, p.ram),
            (Chart::Disk, p.disk_io()),
        ];
        for (c, v) in points {
            self.charts[c.idx()].push(ts, v);
        }

        self.disk = Some((p.disk_used, p.disk_total));
        self.alert = alert_text(g, &b.thresholds);
        self.last_update = Some(ts.to_string());
        Applied::Updated {
            alert: self.alert.is_some(),
        }
    }

    /// User picked a device. No-op until the selector has been populated.
    pub fn select(&mut self, index: i64) -> Option<UiMessage> {
        if self.devices.is_empty() || index < 0 || index as usize >= self.devices.len() {
            return None;
        }
        self.selected = index;
        Some(UiMessage::SelectGpu { value: index })
    }

    pub fn select_next(&mut self) -> Option<UiMessage> {
        let n = self.devices.len() as i64;
        if n == 0 {
            return None;
        }
        self.select((self.selected.clamp(-1, n - 1) + 1).rem_euclid(n))
    }

    pub fn select_prev(&mut self) -> Option<UiMessage> {
        let n = self.devices.len() as i64;
        if n == 0 {
            return None;
        }
        self.select((self.selected.clamp(0, n) - 1).rem_euclid(n))
    }
}
