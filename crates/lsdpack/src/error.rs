//! Error type shared by every stage of the pipeline.
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::binutil::ParseError;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The ROM image could not be read.
    #[error("failed to load {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The emulation core rejected the ROM image contents.
    #[error("invalid ROM {}: {reason}", path.display())]
    InvalidRom { path: PathBuf, reason: String },

    /// No output name can be derived from the given input path.
    #[error("cannot derive an output name from '{0}'")]
    InvalidInputPath(String),

    /// The song never issued the sound-off command that ends a recording.
    #[error(
        "Aborted: song {song} still playing after {seconds} seconds. \
         Please add a HFF command to song end to stop recording."
    )]
    RecordingTimeout { song: usize, seconds: u32 },

    /// The GBS song count field is a single byte.
    #[error("too many songs for a GBS header: {0} (max 255)")]
    TooManySongs(usize),

    /// Writing an output file failed.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),
}
