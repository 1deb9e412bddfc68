//! Serialization of finished song traces.
//!
//! Two formats are provided:
//! - [`AsmWriter`] writes every song into one assembler source file that a
//!   Game Boy player routine can include.
//! - [`VgmWriter`] writes one VGM file per song for use with VGM players.
use crate::Result;
use crate::recorder::SongTrace;

pub mod asm;
pub mod vgm;

pub use asm::AsmWriter;
pub use vgm::VgmWriter;

/// Destination for the traces recorded during a run.
pub trait TraceWriter {
    /// Persist `traces`, in recording order.
    fn write_traces(&mut self, traces: &[SongTrace]) -> Result<()>;
}

/// Fans the traces out to several writers, stopping at the first failure.
impl TraceWriter for [Box<dyn TraceWriter>] {
    fn write_traces(&mut self, traces: &[SongTrace]) -> Result<()> {
        for writer in self.iter_mut() {
            writer.write_traces(traces)?;
        }
        Ok(())
    }
}

/// Collects traces in memory, mostly useful in tests.
impl TraceWriter for Vec<SongTrace> {
    fn write_traces(&mut self, traces: &[SongTrace]) -> Result<()> {
        self.extend_from_slice(traces);
        Ok(())
    }
}
