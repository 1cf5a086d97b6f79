//! UI module root: exposes drawing functions for individual panels.

pub mod charts;
pub mod disks;
pub mod gpu;
pub mod header;
pub mod theme;
pub mod util;
