//! Turns raw stdout chunks from the collector into samples.
//!
//! Each chunk is split on `\n` and every non-blank line is decoded on its own.
//! Nothing is carried over between chunks: a record the pipe delivers in two
//! reads fails to decode in both halves and is lost.

use crate::types::Sample;

/// A line that failed to decode, with the decoder's message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedLine {
    pub line: String,
    pub error: String,
}

#[derive(Debug, Default)]
pub struct ParsedChunk {
    pub samples: Vec<Sample>,
    pub rejected: Vec<RejectedLine>,
}

pub fn parse_chunk(chunk: &[u8]) -> ParsedChunk {
    let text = String::from_utf8_lossy(chunk);
    let mut out = ParsedChunk::default();
    for line in text.split('\n') {
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line) {
            Ok(s) => out.samples.push(s),
            Err(e) => out.rejected.push(RejectedLine {
                line: line.to_string(),
                error: e.to_string(),
            }),
        }
    }
    out
}

pub fn parse_line(line: &str) -> Result<Sample, serde_json::Error> {
    serde_json::from_str::<Sample>(line.trim())
}
