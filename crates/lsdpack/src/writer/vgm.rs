//! VGM output, one file per song.
//!
//! Each trace becomes a `soundlog` document: the GB DMG is registered at its
//! master clock, register writes become `GbDmgWrite` commands and every frame
//! marker a 735-sample wait.
use std::fs;
use std::path::{Path, PathBuf};

use soundlog::chip::{self, Chip};
use soundlog::vgm::command::{EndOfData, Instance, Wait735Samples};
use soundlog::{VgmBuilder, VgmDocument};

use crate::clock::FRAMES_PER_SECOND;
use crate::detector::SOUND_REGISTERS;
use crate::recorder::{SongTrace, TraceEvent};
use crate::writer::TraceWriter;
use crate::{Error, Result};

/// GB DMG master clock in Hz.
pub const GB_DMG_CLOCK: u32 = 4_194_304;

/// Build the VGM document for one trace.
pub fn document(trace: &SongTrace) -> VgmDocument {
    let mut builder = VgmBuilder::new();
    builder.register_chip(Chip::GbDmg, Instance::Primary, GB_DMG_CLOCK);
    for event in trace.events() {
        match *event {
            // register 0 of the VGM GB DMG command is NR10 ($FF10)
            TraceEvent::Write { address, value } => {
                builder.add_chip_write(
                    Instance::Primary,
                    chip::GbDmgSpec {
                        register: address.wrapping_sub(*SOUND_REGISTERS.start()),
                        value,
                    },
                );
            }
            TraceEvent::Frame => {
                builder.add_vgm_command(Wait735Samples);
            }
        }
    }
    builder.add_vgm_command(EndOfData);

    let mut doc = builder.finalize();
    doc.header.sample_rate = FRAMES_PER_SECOND;
    doc
}

/// Serialize one trace as a complete VGM file.
pub fn encode(trace: &SongTrace) -> Vec<u8> {
    document(trace).into()
}

/// Writes `<stem>-NN.vgm` files into a directory, numbering songs from 1.
#[derive(Debug, Clone)]
pub struct VgmWriter {
    dir: PathBuf,
    stem: String,
    written: Vec<PathBuf>,
}

impl VgmWriter {
    pub fn new<P: Into<PathBuf>, S: Into<String>>(dir: P, stem: S) -> Self {
        VgmWriter {
            dir: dir.into(),
            stem: stem.into(),
            written: Vec::new(),
        }
    }

    /// Path of the file holding song `number` (1-based).
    pub fn song_path(&self, number: usize) -> PathBuf {
        self.dir.join(format!("{}-{:02}.vgm", self.stem, number))
    }

    /// Files produced so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn write_one(&mut self, path: &Path, trace: &SongTrace) -> Result<()> {
        fs::write(path, encode(trace)).map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })?;
        self.written.push(path.to_path_buf());
        Ok(())
    }
}

impl TraceWriter for VgmWriter {
    fn write_traces(&mut self, traces: &[SongTrace]) -> Result<()> {
        for (index, trace) in traces.iter().enumerate() {
            let path = self.song_path(index + 1);
            self.write_one(&path, trace)?;
        }
        Ok(())
    }
}
