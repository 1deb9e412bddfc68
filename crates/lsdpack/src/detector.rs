//! Infers song start and end from sound register activity.
//!
//! LSDj switches the APU on through NR52 (`0xFF26`) when a song starts and
//! a song ending in an `HFF` command switches it off again. The detector
//! watches those writes, opens and closes a recording session accordingly
//! and forwards everything that happens inside a session to the
//! [`Recorder`].
use std::ops::RangeInclusive;

use log::debug;

use crate::emulator::BusObserver;
use crate::recorder::Recorder;

/// I/O addresses of the sound hardware (NR10 through wave RAM).
pub const SOUND_REGISTERS: RangeInclusive<u8> = 0x10..=0x3F;

/// NR52, the APU master enable.
pub const NR52: u8 = 0x26;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Active,
}

/// A [`BusObserver`] that gates register writes into recording sessions.
///
/// A session can only open while the detector is armed. The pipeline arms
/// it when it starts playback of a slot; closing the session disarms it
/// again, so every played slot yields at most one trace and the menu
/// navigation in between is never recorded.
#[derive(Debug, Default)]
pub struct PlaybackDetector {
    state: SessionState,
    armed: bool,
    finished: bool,
    recorder: Recorder,
}

impl PlaybackDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow the next NR52 enable to open a session.
    pub fn arm(&mut self) {
        self.armed = true;
        self.finished = false;
    }

    /// Drop any open session without keeping its trace.
    pub fn disarm(&mut self) {
        if self.state == SessionState::Active {
            debug!("session abandoned");
            self.recorder.abort();
        }
        self.state = SessionState::Idle;
        self.armed = false;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// True once a session opened after [`arm`](Self::arm) has closed.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    pub fn recorder_mut(&mut self) -> &mut Recorder {
        &mut self.recorder
    }

    fn open(&mut self) {
        debug!("session opened");
        self.state = SessionState::Active;
        self.recorder.begin();
    }

    fn close(&mut self) {
        debug!("session closed");
        self.state = SessionState::Idle;
        self.armed = false;
        self.finished = true;
        self.recorder.finish();
    }
}

impl BusObserver for PlaybackDetector {
    fn on_io_write(&mut self, address: u8, value: u8) {
        if !SOUND_REGISTERS.contains(&address) {
            return;
        }
        if address == NR52 {
            match (self.state, value) {
                (SessionState::Active, 0) => {
                    self.close();
                    return;
                }
                (SessionState::Idle, v) if v != 0 && self.armed => self.open(),
                _ => {}
            }
        }
        if self.state == SessionState::Active {
            self.recorder.write(address, value);
        }
    }

    fn on_lcd_interrupt(&mut self) {
        if self.state == SessionState::Active {
            self.recorder.frame();
        }
    }
}
