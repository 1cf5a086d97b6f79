//! Library surface for the gpumon panel: collector supervision, sample ingestion,
//! and the dashboard state the binary renders.

pub mod app;
pub mod error;
pub mod headless;
pub mod history;
pub mod host;
pub mod panel;
pub mod parser;
pub mod relay;
pub mod settings;
pub mod status;
pub mod supervisor;
pub mod surface;
pub mod types;
pub mod ui;
