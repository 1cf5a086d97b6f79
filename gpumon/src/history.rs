//! Small utilities to manage bounded history buffers for charts.

use std::collections::VecDeque;

/// Points kept per chart; oldest evicted first.
pub const WINDOW: usize = 60;

pub fn push_capped<T>(dq: &mut VecDeque<T>, v: T, cap: usize) {
    if dq.len() == cap {
        dq.pop_front();
    }
    dq.push_back(v);
}

// One chart's rolling window: time labels alongside values
#[derive(Debug, Clone, Default)]
pub struct Series {
    pub labels: VecDeque<String>,
    pub values: VecDeque<f64>,
}

impl Series {
    pub fn push(&mut self, label: &str, v: f64) {
        push_capped(&mut self.labels, label.to_string(), WINDOW);
        push_capped(&mut self.values, v, WINDOW);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn last(&self) -> Option<f64> {
        self.values.back().copied()
    }

    // Sparkline input: the newest `max_points` values, non-finite and negative as 0
    pub fn tail_u64(&self, max_points: usize) -> Vec<u64> {
        let start = self.values.len().saturating_sub(max_points);
        self.values
            .iter()
            .skip(start)
            .map(|v| if v.is_finite() { v.max(0.0).round() as u64 } else { 0 })
            .collect()
    }
}
