//! The recording run: load each ROM, walk its song slots, record every
//! song, then write the results.
//!
//! Per ROM the run is one driving loop over [`Phase`]. Each iteration
//! advances the core by exactly one frame with the keypad state decided
//! before the frame starts, so every register write and LCD interrupt of
//! a frame reaches the detector before the loop looks at the outcome.
use std::path::{Path, PathBuf};

use log::{debug, info, trace, warn};

use crate::clock::{FRAMES_PER_SECOND, FrameClock};
use crate::detector::{PlaybackDetector, SessionState};
use crate::emulator::EmulationCore;
use crate::gbs::{GbsHeader, Metadata};
use crate::input::{Keypad, Keys};
use crate::navigator::{Navigator, Script, Timing};
use crate::recorder::SongTrace;
use crate::writer::{AsmWriter, TraceWriter, VgmWriter};
use crate::{Error, Result};

/// File name of the GBS header written in archive mode.
pub const GBS_HEADER_FILE: &str = "gbs-header.bin";

/// Derive the output file name from an input ROM path.
///
/// The last two characters (`gb` of `.gb`) are replaced by `s` and any
/// directory prefix, `/` or `\` separated, is removed:
/// `/a/b/song.gb` gives `song.s`, `C:\x\tune.gb` gives `tune.s`.
pub fn output_name(input: &str) -> Result<String> {
    let cut = input
        .char_indices()
        .rev()
        .nth(1)
        .map(|(i, _)| i)
        .ok_or_else(|| Error::InvalidInputPath(input.to_string()))?;
    let renamed = format!("{}s", &input[..cut]);
    let name = renamed.rsplit(['/', '\\']).next().unwrap_or_default();
    Ok(name.to_string())
}

/// Run configuration.
#[derive(Debug, Clone)]
pub struct Options {
    /// Write a GBS header next to the song data.
    pub gbs: bool,
    /// Also write one VGM file per song.
    pub vgm: bool,
    /// Directory receiving every output file.
    pub output_dir: PathBuf,
    pub metadata: Metadata,
    pub timing: Timing,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            gbs: false,
            vgm: false,
            output_dir: PathBuf::from("."),
            metadata: Metadata::default(),
            timing: Timing::default(),
        }
    }
}

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub songs: usize,
    pub output: PathBuf,
    pub vgm_files: Vec<PathBuf>,
    pub gbs_header: Option<PathBuf>,
}

/// Per-ROM state of the driving loop.
#[derive(Debug)]
enum Phase {
    /// Waiting for the ROM to boot.
    Settling(Script),
    /// Running the load macro for `slot`.
    Navigating { slot: usize, script: Script },
    /// Holding START until the song's session closes.
    Recording { slot: usize, frames: u64 },
}

/// Owns the core and all per-run state.
pub struct Pipeline<C: EmulationCore> {
    core: C,
    keypad: Keypad,
    clock: FrameClock,
    detector: PlaybackDetector,
    navigator: Navigator,
    options: Options,
    songs: usize,
}

impl<C: EmulationCore> Pipeline<C> {
    pub fn new(core: C, options: Options) -> Self {
        Pipeline {
            core,
            keypad: Keypad::new(),
            clock: FrameClock::new(),
            detector: PlaybackDetector::new(),
            navigator: Navigator::new(options.timing),
            options,
            songs: 0,
        }
    }

    pub fn core(&self) -> &C {
        &self.core
    }

    /// Songs recorded so far across all ROMs.
    pub fn songs(&self) -> usize {
        self.songs
    }

    /// Traces recorded and not yet written.
    pub fn traces(&self) -> &[SongTrace] {
        self.detector.recorder().traces()
    }

    /// Frames emulated so far.
    pub fn frames(&self) -> u64 {
        self.clock.elapsed()
    }

    /// Record every ROM, then write the outputs named after the first one.
    pub fn run<P: AsRef<Path>>(&mut self, roms: &[P]) -> Result<Summary> {
        let first = roms
            .first()
            .ok_or_else(|| Error::InvalidInputPath(String::new()))?;
        let name = output_name(&first.as_ref().to_string_lossy())?;
        let output = self.options.output_dir.join(&name);
        info!("Recording to '{}'", output.display());

        for rom in roms {
            self.record_rom(rom.as_ref())?;
        }
        self.finish(&output)
    }

    /// Load `rom` and record all of its songs. Returns the number of songs
    /// recorded from this ROM.
    pub fn record_rom(&mut self, rom: &Path) -> Result<usize> {
        info!("Loading {}...", rom.display());
        self.core.load(rom)?;
        self.record_inserted()
    }

    /// Record all songs of the ROM the core currently holds.
    pub fn record_inserted(&mut self) -> Result<usize> {
        self.detector.disarm();
        let before = self.songs;

        let mut phase = Phase::Settling(self.navigator.boot());
        loop {
            phase = match phase {
                Phase::Settling(mut script) => match script.next_keys() {
                    Some(keys) => {
                        self.step(keys);
                        Phase::Settling(script)
                    }
                    None => self.navigate(0),
                },
                Phase::Navigating { slot, mut script } => match script.next_keys() {
                    Some(keys) => {
                        self.step(keys);
                        Phase::Navigating { slot, script }
                    }
                    None if self.core.is_song_empty() => {
                        debug!("slot {} is empty", slot);
                        break;
                    }
                    None => {
                        info!("Song {}...", self.songs + 1);
                        self.detector.arm();
                        Phase::Recording { slot, frames: 0 }
                    }
                },
                Phase::Recording { slot, frames } => {
                    self.step(self.navigator.playback());
                    let frames = frames + 1;
                    if frames % u64::from(FRAMES_PER_SECOND) != 0 {
                        Phase::Recording { slot, frames }
                    } else if self.detector.is_finished() {
                        self.songs += 1;
                        self.navigate(slot + 1)
                    } else if self.detector.state() == SessionState::Idle {
                        // sound never came on: nothing to record in this slot
                        self.detector.disarm();
                        warn!("slot {} never enabled sound, skipped", slot);
                        self.navigate(slot + 1)
                    } else if frames >= self.options.timing.recording_limit_frames() {
                        self.detector.disarm();
                        return Err(Error::RecordingTimeout {
                            song: self.songs + 1,
                            seconds: self.options.timing.recording_limit,
                        });
                    } else {
                        Phase::Recording { slot, frames }
                    }
                }
            };
        }
        Ok(self.songs - before)
    }

    /// Write the recorded traces (and the GBS header when enabled).
    pub fn finish(&mut self, output: &Path) -> Result<Summary> {
        let songs = self.detector.recorder().traces().len();
        let mut writers: Vec<Box<dyn TraceWriter>> = vec![Box::new(AsmWriter::new(output))];
        let vgm = self.options.vgm.then(|| {
            let stem = output
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "song".to_string());
            VgmWriter::new(&self.options.output_dir, stem)
        });
        let vgm_files: Vec<PathBuf> = vgm
            .as_ref()
            .map(|w| (1..=songs).map(|n| w.song_path(n)).collect())
            .unwrap_or_default();
        if let Some(w) = vgm {
            writers.push(Box::new(w));
        }
        self.detector.recorder_mut().flush(writers.as_mut_slice())?;

        let gbs_header = if self.options.gbs {
            let path = self.options.output_dir.join(GBS_HEADER_FILE);
            GbsHeader::new(songs, self.options.metadata.clone())?.write_to(&path)?;
            Some(path)
        } else {
            None
        };

        Ok(Summary {
            songs,
            output: output.to_path_buf(),
            vgm_files,
            gbs_header,
        })
    }

    fn navigate(&self, slot: usize) -> Phase {
        trace!("loading slot {}", slot);
        Phase::Navigating {
            slot,
            script: self.navigator.load_song(slot),
        }
    }

    fn step(&mut self, keys: Keys) {
        self.keypad.set(keys);
        self.clock
            .tick(&mut self.core, &self.keypad, &mut self.detector);
    }
}
