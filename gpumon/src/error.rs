use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PanelError {
    #[error("failed to start collector `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to stop collector: {0}")]
    Kill(#[source] io::Error),

    #[error("collector stdout/stderr not captured")]
    Pipes,

    #[error("state file {path}: {source}")]
    StateIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("state encode: {0}")]
    StateEncode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PanelError>;
