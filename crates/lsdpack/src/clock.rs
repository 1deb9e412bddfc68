//! Frame-stepped time base.
//!
//! Every duration in the pipeline is a whole number of frames: the core is
//! advanced one frame's worth of audio samples at a time, and all register
//! writes and interrupts for that frame have been delivered when
//! [`FrameClock::tick`] returns.
use crate::emulator::{BusObserver, EmulationCore, InputSource, SAMPLES_PER_FRAME};

/// Frames per emulated second.
pub const FRAMES_PER_SECOND: u32 = 60;

#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    samples_per_frame: usize,
    elapsed: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        FrameClock {
            samples_per_frame: SAMPLES_PER_FRAME,
            elapsed: 0,
        }
    }

    /// Number of frames covering `seconds`, rounded to the nearest frame.
    pub fn ticks_for(seconds: f32) -> u32 {
        (FRAMES_PER_SECOND as f32 * seconds).round().max(0.0) as u32
    }

    /// Run the core for exactly one frame.
    pub fn tick<C>(&mut self, core: &mut C, input: &dyn InputSource, observer: &mut dyn BusObserver)
    where
        C: EmulationCore + ?Sized,
    {
        core.run_for(self.samples_per_frame, input, observer);
        self.elapsed += 1;
    }

    /// Run the core for `round(60 × seconds)` frames.
    pub fn advance<C>(
        &mut self,
        seconds: f32,
        core: &mut C,
        input: &dyn InputSource,
        observer: &mut dyn BusObserver,
    ) where
        C: EmulationCore + ?Sized,
    {
        for _ in 0..Self::ticks_for(seconds) {
            self.tick(core, input, observer);
        }
    }

    /// Frames run since the clock was created.
    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::PlaybackDetector;
    use crate::emulator::stub::{StubCore, StubRom};
    use crate::input::Keypad;

    #[test]
    fn seconds_round_to_frames() {
        assert_eq!(FrameClock::ticks_for(0.1), 6);
        assert_eq!(FrameClock::ticks_for(1.0), 60);
        assert_eq!(FrameClock::ticks_for(3.0), 180);
        assert_eq!(FrameClock::ticks_for(0.0125), 1);
        assert_eq!(FrameClock::ticks_for(0.0), 0);
    }

    #[test]
    fn advance_runs_whole_frames() {
        let mut core = StubCore::with_rom(StubRom::default());
        let mut observer = PlaybackDetector::new();
        let keypad = Keypad::new();
        let mut clock = FrameClock::new();

        clock.advance(1.0, &mut core, &keypad, &mut observer);
        clock.tick(&mut core, &keypad, &mut observer);
        assert_eq!(clock.elapsed(), 61);
        assert_eq!(core.frames(), 61);
    }
}
