#![doc = include_str!("../README.md")]
//! lsdpack: automated song extraction from an emulated LSDj cartridge
//!
//! Components, from the keypad up:
//!
//! - [`input`]: the virtual joypad the core polls every frame.
//! - [`clock`]: advances the core one frame at a time.
//! - [`navigator`]: keypad macros that load a song slot and start playback.
//! - [`detector`]: opens and closes recording sessions from NR52 writes.
//! - [`recorder`]: collects each session into a [`SongTrace`].
//! - [`writer`]: serializes traces (`.s` listing, VGM).
//! - [`gbs`]: the GBS archive header.
//! - [`pipeline`]: ties everything together for a list of ROMs.
//! - [`emulator`]: the traits an emulation core implements, and a stub core.
//!
//! Example: record the songs of a stub ROM
//!
//! ```rust
//! use lsdpack::emulator::stub::{StubCore, StubEvent, StubRom, StubSong};
//! use lsdpack::{Options, Pipeline};
//!
//! let song = StubSong {
//!     name: "DEMO".to_string(),
//!     events: vec![
//!         StubEvent { frame: 0, address: 0x26, value: 0x80 },
//!         StubEvent { frame: 10, address: 0x12, value: 0xF0 },
//!         StubEvent { frame: 20, address: 0x26, value: 0x00 },
//!     ],
//! };
//! let core = StubCore::with_rom(StubRom { slots: vec![song] });
//!
//! let mut pipeline = Pipeline::new(core, Options::default());
//! // the ROM is already inserted, so record without loading a file
//! let traces = pipeline.record_inserted().unwrap();
//! assert_eq!(traces, 1);
//! assert_eq!(
//!     pipeline.traces()[0].writes().collect::<Vec<_>>(),
//!     vec![(0x26, 0x80), (0x12, 0xF0)]
//! );
//! ```
mod binutil;
pub mod clock;
pub mod detector;
pub mod emulator;
mod error;
pub mod gbs;
pub mod input;
pub mod navigator;
pub mod pipeline;
pub mod recorder;
pub mod writer;

pub use binutil::ParseError;
pub use error::{Error, Result};
pub use gbs::{GbsHeader, Metadata};
pub use input::Keys;
pub use navigator::Timing;
pub use pipeline::{Options, Pipeline, Summary, output_name};
pub use recorder::{SongTrace, TraceEvent};
