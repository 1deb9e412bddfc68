//! A synthetic emulation core for tests and dry runs.
//!
//! `StubCore` does not emulate a CPU. It reads a JSON "stub ROM" listing
//! the songs of a fake tracker and imitates just enough of the LSDj menu
//! for the navigation macros to work:
//!
//! - UP/DOWN move a cursor over the song list on the frame they are
//!   pressed, then auto-repeat while held.
//! - A selects the song under the cursor and stops playback.
//! - SELECT stops playback.
//! - START plays the selected song: its register writes are replayed at
//!   their frame offsets, each frame's writes before that frame's LCD
//!   interrupt.
//!
//! ```json
//! { "slots": [
//!     { "name": "INTRO", "events": [
//!         { "frame": 0, "address": 38, "value": 128 },
//!         { "frame": 4, "address": 38, "value": 0 } ] } ] }
//! ```
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::emulator::{BusObserver, EmulationCore, InputSource, SAMPLES_PER_FRAME};
use crate::input::Keys;
use crate::{Error, Result};

/// Minimum length of the song list, as in LSDj.
const LIST_LEN: usize = 32;
/// Frames a direction key is held before it starts repeating.
const REPEAT_DELAY: u32 = 30;
/// Frames between repeats.
const REPEAT_RATE: u32 = 4;

/// One register write of a stub song, `frame` frames after START.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StubEvent {
    pub frame: u32,
    pub address: u8,
    pub value: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StubSong {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub events: Vec<StubEvent>,
}

/// Contents of a stub ROM file. Slots past the end of `slots` are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StubRom {
    pub slots: Vec<StubSong>,
}

impl StubRom {
    pub fn from_json(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Repeat {
    held: u32,
}

impl Repeat {
    /// Whether the key moves the cursor on this frame.
    fn step(&mut self, pressed: bool) -> bool {
        if !pressed {
            self.held = 0;
            return false;
        }
        self.held += 1;
        self.held == 1 || (self.held > REPEAT_DELAY && (self.held - REPEAT_DELAY) % REPEAT_RATE == 0)
    }
}

#[derive(Debug, Clone, Copy)]
struct Playback {
    slot: usize,
    frame: u32,
}

#[derive(Debug, Default)]
pub struct StubCore {
    rom: Option<StubRom>,
    previous: Keys,
    up: Repeat,
    down: Repeat,
    cursor: usize,
    selected: Option<usize>,
    playing: Option<Playback>,
    pending_samples: usize,
    frames: u64,
}

impl StubCore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A core with `rom` already loaded.
    pub fn with_rom(rom: StubRom) -> Self {
        let mut core = Self::new();
        core.insert(rom);
        core
    }

    fn insert(&mut self, rom: StubRom) {
        *self = StubCore {
            rom: Some(rom),
            ..StubCore::default()
        };
    }

    /// Frames emulated since the last load.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    fn slots(&self) -> &[StubSong] {
        self.rom.as_ref().map(|r| r.slots.as_slice()).unwrap_or(&[])
    }

    fn list_len(&self) -> usize {
        LIST_LEN.max(self.slots().len() + 1)
    }

    fn run_frame(&mut self, input: &dyn InputSource, observer: &mut dyn BusObserver) {
        let keys = input.keys();
        let pressed = keys & !self.previous;

        if self.up.step(keys.contains(Keys::UP)) {
            self.cursor = self.cursor.saturating_sub(1);
        }
        if self.down.step(keys.contains(Keys::DOWN)) {
            self.cursor = (self.cursor + 1).min(self.list_len() - 1);
        }
        if pressed.contains(Keys::A) {
            self.selected = Some(self.cursor);
            self.playing = None;
        }
        if pressed.contains(Keys::SELECT) {
            self.playing = None;
        }
        if pressed.contains(Keys::START)
            && let Some(slot) = self.selected
            && slot < self.slots().len()
        {
            self.playing = Some(Playback { slot, frame: 0 });
        }

        if let Some(playback) = self.playing.as_mut() {
            let frame = playback.frame;
            playback.frame += 1;
            let slot = playback.slot;
            if let Some(song) = self.rom.as_ref().and_then(|r| r.slots.get(slot)) {
                for event in song.events.iter().filter(|e| e.frame == frame) {
                    observer.on_io_write(event.address, event.value);
                }
            }
        }
        observer.on_lcd_interrupt();

        self.previous = keys;
        self.frames += 1;
    }
}

impl EmulationCore for StubCore {
    fn load(&mut self, rom: &Path) -> Result<()> {
        let bytes = fs::read(rom).map_err(|source| Error::Load {
            path: rom.to_path_buf(),
            source,
        })?;
        let parsed = StubRom::from_json(&bytes).map_err(|e| Error::InvalidRom {
            path: rom.to_path_buf(),
            reason: e.to_string(),
        })?;
        self.insert(parsed);
        Ok(())
    }

    fn run_for(&mut self, samples: usize, input: &dyn InputSource, observer: &mut dyn BusObserver) {
        self.pending_samples += samples;
        while self.pending_samples >= SAMPLES_PER_FRAME {
            self.pending_samples -= SAMPLES_PER_FRAME;
            self.run_frame(input, observer);
        }
    }

    fn is_song_empty(&self) -> bool {
        match self.selected {
            Some(slot) => slot >= self.slots().len(),
            None => true,
        }
    }
}
