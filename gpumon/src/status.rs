//! Status line text derived from the primary device.

use crate::types::Sample;

pub const STATUS_PENDING: &str = "GPU: --%";
pub const STATUS_NO_DEVICE: &str = "GPU: n/a";

pub fn project(sample: &Sample) -> String {
    match sample.primary() {
        // f64::round is half-away-from-zero; `{:.0}` alone would round half-to-even
        Some(g) => format!("GPU: {:.0}%", g.gpu.round()),
        None => STATUS_NO_DEVICE.to_string(),
    }
}
