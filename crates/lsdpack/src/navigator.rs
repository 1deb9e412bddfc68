//! Scripted keypad macros that drive the LSDj menus.
//!
//! A macro is a [`Script`]: a queue of [`Press`] steps, each holding a key
//! combination for a number of frames. The pipeline pulls one frame's keys
//! at a time with [`Script::next_keys`], so the script never runs the core
//! itself.
//!
//! The waits are empirical. They over-allocate time for LSDj's screen
//! transitions and file loading and are not derived from the tracker's
//! internals; if a different LSDj version animates more slowly, raise the
//! [`Timing`] values.
use std::collections::VecDeque;

use crate::clock::{FRAMES_PER_SECOND, FrameClock};
use crate::input::Keys;

/// Durations (in seconds) used by the macros.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    /// Length of a single key tap and of the release that follows it.
    pub tap: f32,
    /// Wait after loading a ROM before touching the keypad.
    pub boot_settle: f32,
    /// DOWN hold that moves the project menu cursor onto LOAD/SAVE.
    pub menu_scroll: f32,
    /// UP hold that scrolls the song list back to its first entry.
    pub list_scroll: f32,
    /// Wait for LSDj to finish loading the selected song.
    pub load_settle: f32,
    /// Emulated seconds a song may play before the run is aborted.
    pub recording_limit: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Timing {
            tap: 0.1,
            boot_settle: 3.0,
            menu_scroll: 3.0,
            list_scroll: 5.0,
            load_settle: 5.0,
            recording_limit: 60 * 60,
        }
    }
}

impl Timing {
    /// The recording limit expressed in frames.
    pub fn recording_limit_frames(&self) -> u64 {
        u64::from(self.recording_limit) * u64::from(FRAMES_PER_SECOND)
    }
}

/// Hold `keys` for `ticks` frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Press {
    pub keys: Keys,
    pub ticks: u32,
}

/// A queue of presses, consumed one frame at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    steps: VecDeque<Press>,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a press of `keys` lasting `seconds`.
    ///
    /// The keys stay held until the next press replaces them, so
    /// `press(Keys::empty(), ..)` is how a key is released and also how the
    /// script waits for the UI to settle.
    pub fn press(&mut self, keys: Keys, seconds: f32) -> &mut Self {
        let ticks = FrameClock::ticks_for(seconds);
        if ticks > 0 {
            self.steps.push_back(Press { keys, ticks });
        }
        self
    }

    /// Keys to hold during the next frame, or `None` once the script is done.
    pub fn next_keys(&mut self) -> Option<Keys> {
        let front = self.steps.front_mut()?;
        let keys = front.keys;
        front.ticks -= 1;
        if front.ticks == 0 {
            self.steps.pop_front();
        }
        Some(keys)
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Frames left until the script is exhausted.
    pub fn remaining_ticks(&self) -> u64 {
        self.steps.iter().map(|p| u64::from(p.ticks)).sum()
    }

    pub fn steps(&self) -> impl Iterator<Item = &Press> {
        self.steps.iter()
    }
}

/// Builds the macros for one LSDj session.
#[derive(Debug, Clone, Copy, Default)]
pub struct Navigator {
    timing: Timing,
}

impl Navigator {
    pub fn new(timing: Timing) -> Self {
        Navigator { timing }
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    /// Wait with no keys held while LSDj boots.
    pub fn boot(&self) -> Script {
        let mut script = Script::new();
        script.press(Keys::empty(), self.timing.boot_settle);
        script
    }

    /// Open the file menu and load the song in `slot`.
    ///
    /// Once the script is exhausted the caller asks the core whether the
    /// loaded slot is empty; an empty slot means the ROM holds no more songs.
    pub fn load_song(&self, slot: usize) -> Script {
        let t = &self.timing;
        let idle = Keys::empty();
        let mut s = Script::new();

        // project screen
        s.press(Keys::SELECT, t.tap);
        s.press(Keys::SELECT | Keys::UP, t.tap);
        s.press(idle, t.tap);
        // LOAD/SAVE FILE, then LOAD
        s.press(Keys::DOWN, t.menu_scroll);
        s.press(idle, t.tap);
        s.press(Keys::A, t.tap);
        s.press(idle, t.tap);
        s.press(Keys::A, t.tap);
        s.press(idle, t.tap);
        // top of the song list
        s.press(Keys::UP, t.list_scroll);
        s.press(idle, t.tap);
        for _ in 0..slot {
            s.press(Keys::DOWN, t.tap);
            s.press(idle, t.tap);
        }
        // song name
        s.press(Keys::A, t.tap);
        s.press(idle, t.tap);
        // discard unsaved changes
        s.press(Keys::LEFT, t.tap);
        s.press(idle, t.tap);
        s.press(Keys::A, t.tap);
        s.press(idle, t.load_settle);
        s
    }

    /// Keys held for the whole playback phase.
    ///
    /// START is never released; the next menu macro replaces it.
    pub fn playback(&self) -> Keys {
        Keys::START
    }
}
