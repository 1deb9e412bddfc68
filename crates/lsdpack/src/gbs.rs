//! GBS archive header.
//!
//! The header describes where the player routine is loaded and how it is
//! called; the song data itself is assembled separately from the traces.
//! Layout (all multi-byte fields little-endian):
//!
//! | Offset | Field |
//! |---|---|
//! | 0x00 | `"GBS"` |
//! | 0x03 | version (1) |
//! | 0x04 | song count |
//! | 0x05 | first song (1-based) |
//! | 0x06 | load address |
//! | 0x08 | init address |
//! | 0x0A | play address |
//! | 0x0C | stack pointer |
//! | 0x0E | timer modulo (TMA) |
//! | 0x0F | timer control (TAC) |
//! | 0x10 | title, 32 bytes NUL padded |
//! | 0x30 | artist, 32 bytes NUL padded |
//! | 0x50 | copyright, 32 bytes NUL padded |
use std::fs;
use std::path::Path;

use crate::binutil::{
    ParseError, read_slice, read_u8_at, read_u16_le_at, write_slice, write_u8, write_u16,
};
use crate::{Error, Result};

pub const GBS_HEADER_SIZE: usize = 0x70;
pub const GBS_MAGIC: [u8; 3] = *b"GBS";
pub const GBS_VERSION: u8 = 1;

const TEXT_FIELD_LEN: usize = 32;

#[derive(Copy, Clone, Debug)]
enum GbsHeaderField {
    Magic,
    Version,
    SongCount,
    FirstSong,
    LoadAddress,
    InitAddress,
    PlayAddress,
    StackPointer,
    TimerModulo,
    TimerControl,
    Title,
    Artist,
    Copyright,
}

impl GbsHeaderField {
    fn offset(self) -> usize {
        match self {
            GbsHeaderField::Magic => 0x00,
            GbsHeaderField::Version => 0x03,
            GbsHeaderField::SongCount => 0x04,
            GbsHeaderField::FirstSong => 0x05,
            GbsHeaderField::LoadAddress => 0x06,
            GbsHeaderField::InitAddress => 0x08,
            GbsHeaderField::PlayAddress => 0x0A,
            GbsHeaderField::StackPointer => 0x0C,
            GbsHeaderField::TimerModulo => 0x0E,
            GbsHeaderField::TimerControl => 0x0F,
            GbsHeaderField::Title => 0x10,
            GbsHeaderField::Artist => 0x30,
            GbsHeaderField::Copyright => 0x50,
        }
    }
}

/// Free-text fields of the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub title: String,
    pub artist: String,
    pub copyright: String,
}

impl Default for Metadata {
    fn default() -> Self {
        Metadata {
            title: "<Title>".to_string(),
            artist: "<Artist>".to_string(),
            copyright: "<Copyright>".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GbsHeader {
    pub song_count: u8,
    pub first_song: u8,
    pub load_address: u16,
    pub init_address: u16,
    pub play_address: u16,
    pub stack_pointer: u16,
    pub timer_modulo: u8,
    pub timer_control: u8,
    pub metadata: Metadata,
}

impl Default for GbsHeader {
    fn default() -> Self {
        // entry points of the lsdpack player, which runs off the timer
        // interrupt (TAC = 4096 Hz, TMA = 0x4A)
        GbsHeader {
            song_count: 0,
            first_song: 1,
            load_address: 0x0400,
            init_address: 0x0401,
            play_address: 0x0404,
            stack_pointer: 0xFFFE,
            timer_modulo: 0x4A,
            timer_control: 0x06,
            metadata: Metadata::default(),
        }
    }
}

impl GbsHeader {
    /// Header for `song_count` songs with the fixed player entry points.
    pub fn new(song_count: usize, metadata: Metadata) -> Result<Self> {
        let song_count = u8::try_from(song_count).map_err(|_| Error::TooManySongs(song_count))?;
        Ok(GbsHeader {
            song_count,
            metadata,
            ..GbsHeader::default()
        })
    }

    pub fn to_bytes(&self) -> [u8; GBS_HEADER_SIZE] {
        let mut buf = [0u8; GBS_HEADER_SIZE];
        write_slice(&mut buf, GbsHeaderField::Magic.offset(), &GBS_MAGIC);
        write_u8(&mut buf, GbsHeaderField::Version.offset(), GBS_VERSION);
        write_u8(&mut buf, GbsHeaderField::SongCount.offset(), self.song_count);
        write_u8(&mut buf, GbsHeaderField::FirstSong.offset(), self.first_song);
        write_u16(&mut buf, GbsHeaderField::LoadAddress.offset(), self.load_address);
        write_u16(&mut buf, GbsHeaderField::InitAddress.offset(), self.init_address);
        write_u16(&mut buf, GbsHeaderField::PlayAddress.offset(), self.play_address);
        write_u16(&mut buf, GbsHeaderField::StackPointer.offset(), self.stack_pointer);
        write_u8(&mut buf, GbsHeaderField::TimerModulo.offset(), self.timer_modulo);
        write_u8(&mut buf, GbsHeaderField::TimerControl.offset(), self.timer_control);
        write_text(&mut buf, GbsHeaderField::Title, &self.metadata.title);
        write_text(&mut buf, GbsHeaderField::Artist, &self.metadata.artist);
        write_text(&mut buf, GbsHeaderField::Copyright, &self.metadata.copyright);
        buf
    }

    /// Write the header to `path`.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_bytes()).map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Write `text` as at most 32 ASCII bytes; other characters become `?`.
fn write_text(buf: &mut [u8], field: GbsHeaderField, text: &str) {
    let bytes: Vec<u8> = text
        .chars()
        .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
        .take(TEXT_FIELD_LEN)
        .collect();
    write_slice(buf, field.offset(), &bytes);
}

fn read_text(bytes: &[u8], field: GbsHeaderField) -> std::result::Result<String, ParseError> {
    let raw = read_slice(bytes, field.offset(), TEXT_FIELD_LEN)?;
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    Ok(String::from_utf8_lossy(&raw[..end]).into_owned())
}

impl TryFrom<&[u8]> for GbsHeader {
    type Error = ParseError;

    fn try_from(bytes: &[u8]) -> std::result::Result<Self, Self::Error> {
        let magic = read_slice(bytes, GbsHeaderField::Magic.offset(), 3)?;
        if magic != GBS_MAGIC {
            return Err(ParseError::InvalidIdent([magic[0], magic[1], magic[2]]));
        }
        let version = read_u8_at(bytes, GbsHeaderField::Version.offset())?;
        if version != GBS_VERSION {
            return Err(ParseError::UnsupportedVersion(version));
        }
        Ok(GbsHeader {
            song_count: read_u8_at(bytes, GbsHeaderField::SongCount.offset())?,
            first_song: read_u8_at(bytes, GbsHeaderField::FirstSong.offset())?,
            load_address: read_u16_le_at(bytes, GbsHeaderField::LoadAddress.offset())?,
            init_address: read_u16_le_at(bytes, GbsHeaderField::InitAddress.offset())?,
            play_address: read_u16_le_at(bytes, GbsHeaderField::PlayAddress.offset())?,
            stack_pointer: read_u16_le_at(bytes, GbsHeaderField::StackPointer.offset())?,
            timer_modulo: read_u8_at(bytes, GbsHeaderField::TimerModulo.offset())?,
            timer_control: read_u8_at(bytes, GbsHeaderField::TimerControl.offset())?,
            metadata: Metadata {
                title: read_text(bytes, GbsHeaderField::Title)?,
                artist: read_text(bytes, GbsHeaderField::Artist)?,
                copyright: read_text(bytes, GbsHeaderField::Copyright)?,
            },
        })
    }
}
