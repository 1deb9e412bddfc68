//! Accumulates sound register activity into per-song traces.
use log::debug;

use crate::Result;
use crate::writer::TraceWriter;

/// One entry of a song trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceEvent {
    /// A write to sound register `0xFF00 + address`.
    Write { address: u8, value: u8 },
    /// One frame (LCD interrupt) elapsed.
    Frame,
}

/// The recorded register writes and frame markers of one song, in the
/// order they happened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongTrace {
    events: Vec<TraceEvent>,
}

impl SongTrace {
    pub fn new(events: Vec<TraceEvent>) -> Self {
        SongTrace { events }
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// The register writes only, as `(address, value)` pairs.
    pub fn writes(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.events.iter().filter_map(|e| match *e {
            TraceEvent::Write { address, value } => Some((address, value)),
            TraceEvent::Frame => None,
        })
    }

    /// Number of frames the song lasted.
    pub fn frames(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, TraceEvent::Frame))
            .count()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Collects the trace of the song currently playing and keeps every
/// finished trace until [`Recorder::flush`].
#[derive(Debug, Default)]
pub struct Recorder {
    current: Option<Vec<TraceEvent>>,
    finished: Vec<SongTrace>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new trace, discarding any unfinished one.
    pub fn begin(&mut self) {
        if self.current.replace(Vec::new()).is_some() {
            debug!("discarding unfinished trace");
        }
    }

    pub fn write(&mut self, address: u8, value: u8) {
        if let Some(events) = self.current.as_mut() {
            events.push(TraceEvent::Write { address, value });
        }
    }

    pub fn frame(&mut self) {
        if let Some(events) = self.current.as_mut() {
            events.push(TraceEvent::Frame);
        }
    }

    /// Close the current trace. Returns the finished trace, if one was open.
    pub fn finish(&mut self) -> Option<&SongTrace> {
        let events = self.current.take()?;
        let trace = SongTrace::new(events);
        debug!(
            "trace {} finished: {} events, {} frames",
            self.finished.len() + 1,
            trace.len(),
            trace.frames()
        );
        self.finished.push(trace);
        self.finished.last()
    }

    /// Drop the current trace without keeping it.
    pub fn abort(&mut self) {
        self.current = None;
    }

    pub fn is_recording(&self) -> bool {
        self.current.is_some()
    }

    /// Traces finished so far.
    pub fn traces(&self) -> &[SongTrace] {
        &self.finished
    }

    /// Hand every finished trace to `writer`.
    ///
    /// The traces are kept if the writer fails. Returns the number of
    /// traces written.
    pub fn flush<W>(&mut self, writer: &mut W) -> Result<usize>
    where
        W: TraceWriter + ?Sized,
    {
        writer.write_traces(&self.finished)?;
        let count = self.finished.len();
        self.finished.clear();
        Ok(count)
    }
}
