//! Assembler source output (`.s`, rgbds syntax).
//!
//! Each song becomes a byte stream:
//!
//! | Bytes | Meaning |
//! |---|---|
//! | `aa vv` (`aa` in `$10..=$3F`) | write `vv` to `$FF00 + aa` |
//! | `$00` | wait for the next frame |
//! | `$FF` | end of song |
//!
//! The streams are preceded by a song count and a table of pointers.
use std::fs;
use std::path::{Path, PathBuf};

use crate::recorder::{SongTrace, TraceEvent};
use crate::writer::TraceWriter;
use crate::{Error, Result};

pub const FRAME_MARKER: u8 = 0x00;
pub const END_MARKER: u8 = 0xFF;

const BYTES_PER_LINE: usize = 16;

/// Encode one trace as a player byte stream, including the end marker.
pub fn encode_stream(trace: &SongTrace) -> Vec<u8> {
    let mut out = Vec::with_capacity(trace.len() * 2 + 1);
    for event in trace.events() {
        match *event {
            TraceEvent::Write { address, value } => {
                out.push(address);
                out.push(value);
            }
            TraceEvent::Frame => out.push(FRAME_MARKER),
        }
    }
    out.push(END_MARKER);
    out
}

/// Render all traces as one assembler source listing.
pub fn to_source(traces: &[SongTrace]) -> String {
    let mut lines = vec![
        "; Generated by lsdpack. Do not edit.".to_string(),
        String::new(),
        "SECTION \"lsdpack_songs\", ROMX".to_string(),
        String::new(),
        "SongCount::".to_string(),
        format!("    db {}", traces.len()),
        String::new(),
        "SongTable::".to_string(),
    ];
    lines.extend((0..traces.len()).map(|index| format!("    dw Song{}", index)));
    for (index, trace) in traces.iter().enumerate() {
        lines.push(String::new());
        lines.push(format!("Song{}:", index));
        for chunk in encode_stream(trace).chunks(BYTES_PER_LINE) {
            let bytes: Vec<String> = chunk.iter().map(|b| format!("${:02X}", b)).collect();
            lines.push(format!("    db {}", bytes.join(",")));
        }
    }

    let mut src = lines.join("\n");
    src.push('\n');
    src
}

/// Writes every trace into a single `.s` file.
#[derive(Debug, Clone)]
pub struct AsmWriter {
    path: PathBuf,
}

impl AsmWriter {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        AsmWriter { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TraceWriter for AsmWriter {
    fn write_traces(&mut self, traces: &[SongTrace]) -> Result<()> {
        fs::write(&self.path, to_source(traces)).map_err(|source| Error::Write {
            path: self.path.clone(),
            source,
        })
    }
}
