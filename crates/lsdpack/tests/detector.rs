use lsdpack::detector::{PlaybackDetector, SessionState};
use lsdpack::emulator::BusObserver;
use lsdpack::{SongTrace, TraceEvent};

fn w(address: u8, value: u8) -> TraceEvent {
    TraceEvent::Write { address, value }
}

fn finished(detector: &PlaybackDetector) -> Vec<SongTrace> {
    detector.recorder().traces().to_vec()
}

#[test]
fn nonzero_nr52_opens_and_zero_closes() {
    let mut d = PlaybackDetector::new();
    d.arm();

    d.on_io_write(0x26, 0x80);
    assert_eq!(d.state(), SessionState::Active);
    d.on_io_write(0x12, 0x77);
    d.on_io_write(0x26, 0x00);
    assert_eq!(d.state(), SessionState::Idle);
    assert!(d.is_finished());
    assert!(!d.is_armed());

    let traces = finished(&d);
    assert_eq!(traces.len(), 1);
    // the closing write is not part of the trace
    assert_eq!(traces[0].events(), &[w(0x26, 0x80), w(0x12, 0x77)]);
}

#[test]
fn writes_while_idle_are_dropped() {
    let mut d = PlaybackDetector::new();
    d.arm();

    d.on_io_write(0x12, 0x77);
    d.on_lcd_interrupt();
    d.on_io_write(0x26, 0x00);
    assert_eq!(d.state(), SessionState::Idle);
    assert!(!d.is_finished());
    assert!(d.recorder().traces().is_empty());
    assert!(!d.recorder().is_recording());
}

#[test]
fn writes_outside_sound_range_are_ignored() {
    let mut d = PlaybackDetector::new();
    d.arm();
    d.on_io_write(0x26, 0x80);

    for address in [0x00, 0x0F, 0x40, 0x41, 0x80, 0xFF] {
        d.on_io_write(address, 0x55);
    }
    d.on_io_write(0x10, 0x01);
    d.on_io_write(0x3F, 0x02);
    d.on_io_write(0x26, 0x00);

    let traces = finished(&d);
    assert_eq!(
        traces[0].writes().collect::<Vec<_>>(),
        vec![(0x26, 0x80), (0x10, 0x01), (0x3F, 0x02)]
    );
    assert!(
        traces[0]
            .writes()
            .all(|(a, _)| (0x10..=0x3F).contains(&a))
    );
}

#[test]
fn repeated_enable_does_not_reopen() {
    let mut d = PlaybackDetector::new();
    d.arm();

    d.on_io_write(0x26, 0x80);
    d.on_io_write(0x26, 0x8F);
    assert_eq!(d.state(), SessionState::Active);
    d.on_io_write(0x26, 0x00);
    // zero while idle is a no-op
    d.on_io_write(0x26, 0x00);

    let traces = finished(&d);
    assert_eq!(traces.len(), 1);
    assert_eq!(traces[0].events(), &[w(0x26, 0x80), w(0x26, 0x8F)]);
}

#[test]
fn session_needs_arming() {
    let mut d = PlaybackDetector::new();
    d.on_io_write(0x26, 0x80);
    assert_eq!(d.state(), SessionState::Idle);

    d.arm();
    d.on_io_write(0x26, 0x80);
    d.on_io_write(0x26, 0x00);
    // disarmed after closing: the next enable is ignored
    d.on_io_write(0x26, 0x80);
    assert_eq!(d.state(), SessionState::Idle);
    assert_eq!(d.recorder().traces().len(), 1);
}

#[test]
fn frame_pulses_recorded_only_while_active() {
    let mut d = PlaybackDetector::new();
    d.arm();

    d.on_lcd_interrupt();
    d.on_io_write(0x26, 0x80);
    d.on_lcd_interrupt();
    d.on_io_write(0x13, 0xCD);
    d.on_lcd_interrupt();
    d.on_io_write(0x26, 0x00);
    d.on_lcd_interrupt();

    let traces = finished(&d);
    assert_eq!(
        traces[0].events(),
        &[
            w(0x26, 0x80),
            TraceEvent::Frame,
            w(0x13, 0xCD),
            TraceEvent::Frame
        ]
    );
    assert_eq!(traces[0].frames(), 2);
}

#[test]
fn disarm_drops_open_session() {
    let mut d = PlaybackDetector::new();
    d.arm();
    d.on_io_write(0x26, 0x80);
    d.on_io_write(0x12, 0x77);

    d.disarm();
    assert_eq!(d.state(), SessionState::Idle);
    assert!(!d.recorder().is_recording());
    assert!(d.recorder().traces().is_empty());
}
