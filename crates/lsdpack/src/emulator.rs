//! The seam between the pipeline and the Game Boy emulation core.
//!
//! The core itself (CPU/PPU/APU emulation, cartridge loading) lives outside
//! this crate. It is driven through [`EmulationCore`] and reports back
//! through two capabilities handed to it on every [`EmulationCore::run_for`]
//! call:
//!
//! - [`InputSource`] is polled for the joypad state.
//! - [`BusObserver`] receives every `0xFFxx` I/O write and every LCD
//!   (vertical blank) interrupt, synchronously and in the order the core
//!   produces them.
//!
//! Nothing is retained between calls, so the delivery contract stays
//! single-threaded and needs no shared ownership.
use std::path::Path;

use crate::Result;
use crate::input::Keys;

pub mod stub;

/// Audio samples the core renders during one video frame (the DMG runs
/// 70224 CPU cycles per frame and the core emits one sample per two cycles).
pub const SAMPLES_PER_FRAME: usize = 35112;

/// Supplies the joypad state when the core polls it.
pub trait InputSource {
    fn keys(&self) -> Keys;
}

/// Receives bus activity while the core runs.
pub trait BusObserver {
    /// A write to I/O port `0xFF00 + address`.
    fn on_io_write(&mut self, address: u8, value: u8);

    /// The LCD interrupt fired (once per frame).
    fn on_lcd_interrupt(&mut self);
}

/// An emulation core able to run an LSDj cartridge.
pub trait EmulationCore {
    /// Load a ROM image and reset the machine.
    fn load(&mut self, rom: &Path) -> Result<()>;

    /// Run until `samples` audio samples have been produced.
    ///
    /// All observer callbacks for the emulated span fire before this
    /// returns.
    fn run_for(&mut self, samples: usize, input: &dyn InputSource, observer: &mut dyn BusObserver);

    /// Whether the song slot the tracker currently shows is unused.
    fn is_song_empty(&self) -> bool;
}
