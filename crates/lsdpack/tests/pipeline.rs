use std::fs;
use std::path::PathBuf;

use lsdpack::emulator::stub::{StubCore, StubEvent, StubRom, StubSong};
use lsdpack::{Error, GbsHeader, Options, Pipeline, Timing, TraceEvent};

fn song(name: &str, events: &[(u32, u8, u8)]) -> StubSong {
    StubSong {
        name: name.to_string(),
        events: events
            .iter()
            .map(|&(frame, address, value)| StubEvent {
                frame,
                address,
                value,
            })
            .collect(),
    }
}

/// A song that switches the APU on, writes `marker` to NR12 and stops.
fn marked_song(marker: u8) -> StubSong {
    song(
        &format!("SONG{}", marker),
        &[(0, 0x26, 0x80), (30, 0x12, marker), (90, 0x26, 0x00)],
    )
}

fn write_rom(dir: &std::path::Path, name: &str, rom: &StubRom) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, rom.to_json().unwrap()).unwrap();
    path
}

#[test]
fn two_songs_then_empty_slot() {
    let rom = StubRom {
        slots: vec![
            song("A", &[(0, 0x26, 0x80), (5, 0x12, 0x77), (10, 0x26, 0x00)]),
            song("B", &[(0, 0x26, 0x80), (5, 0x12, 0x77), (10, 0x26, 0x00)]),
        ],
    };
    let mut pipeline = Pipeline::new(StubCore::with_rom(rom), Options::default());

    let recorded = pipeline.record_inserted().expect("recording failed");
    assert_eq!(recorded, 2);
    assert_eq!(pipeline.songs(), 2);

    let traces = pipeline.traces();
    assert_eq!(traces.len(), 2);
    for trace in traces {
        assert_eq!(
            trace.writes().collect::<Vec<_>>(),
            vec![(0x26, 0x80), (0x12, 0x77)]
        );
        // frames 0..=9 of playback happened while the session was open
        assert_eq!(trace.frames(), 10);
        assert_eq!(
            trace.events()[0],
            TraceEvent::Write {
                address: 0x26,
                value: 0x80
            }
        );
    }
    // the empty slot was the third one
    assert_eq!(pipeline.core().selected(), Some(2));
}

#[test]
fn every_slot_is_visited_once_in_order() {
    let rom = StubRom {
        slots: (0..6).map(marked_song).collect(),
    };
    let mut pipeline = Pipeline::new(StubCore::with_rom(rom), Options::default());

    assert_eq!(pipeline.record_inserted().unwrap(), 6);
    let markers: Vec<u8> = pipeline
        .traces()
        .iter()
        .map(|t| {
            t.writes()
                .find(|&(a, _)| a == 0x12)
                .map(|(_, v)| v)
                .unwrap()
        })
        .collect();
    assert_eq!(markers, vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn rom_without_songs_records_nothing() {
    let mut pipeline = Pipeline::new(StubCore::with_rom(StubRom::default()), Options::default());
    assert_eq!(pipeline.record_inserted().unwrap(), 0);
    assert!(pipeline.traces().is_empty());
}

#[test]
fn song_without_end_times_out() {
    let rom = StubRom {
        slots: vec![
            song("LOOP", &[(0, 0x26, 0x80), (1, 0x12, 0x77)]),
            marked_song(1),
        ],
    };
    let options = Options {
        timing: Timing {
            recording_limit: 2,
            ..Timing::default()
        },
        ..Options::default()
    };
    let mut pipeline = Pipeline::new(StubCore::with_rom(rom), options);

    let err = pipeline.record_inserted().unwrap_err();
    assert!(matches!(
        err,
        Error::RecordingTimeout {
            song: 1,
            seconds: 2
        }
    ));
    // no partial trace and the second slot was never loaded
    assert!(pipeline.traces().is_empty());
    assert_eq!(pipeline.core().selected(), Some(0));
}

#[test]
fn silent_slot_is_skipped_after_one_second() {
    let rom = StubRom {
        slots: vec![song("SILENT", &[(3, 0x12, 0x77)]), marked_song(9)],
    };
    let mut pipeline = Pipeline::new(StubCore::with_rom(rom), Options::default());

    assert_eq!(pipeline.record_inserted().expect("recording failed"), 1);
    let traces = pipeline.traces();
    assert_eq!(traces.len(), 1);
    assert_eq!(
        traces[0].writes().collect::<Vec<_>>(),
        vec![(0x26, 0x80), (0x12, 9)]
    );
    // the empty slot after the second song ended the walk
    assert_eq!(pipeline.core().selected(), Some(2));

    let nav = lsdpack::navigator::Navigator::default();
    let navigation = nav.boot().remaining_ticks()
        + (0..3).map(|slot| nav.load_song(slot).remaining_ticks()).sum::<u64>();
    // one second for the silent slot, two for the song closing at frame 90
    assert_eq!(pipeline.frames(), navigation + 60 + 120);
}

#[test]
fn session_closes_only_on_whole_second_checks() {
    let rom = StubRom {
        slots: vec![song("SHORT", &[(0, 0x26, 0x80), (1, 0x26, 0x00)])],
    };
    let mut pipeline = Pipeline::new(StubCore::with_rom(rom), Options::default());
    pipeline.record_inserted().unwrap();

    let nav = lsdpack::navigator::Navigator::default();
    let boot = nav.boot().remaining_ticks();
    let load0 = nav.load_song(0).remaining_ticks();
    let load1 = nav.load_song(1).remaining_ticks();
    // one second of playback for the only song
    assert_eq!(pipeline.frames(), boot + load0 + 60 + load1);
}

#[test]
fn run_writes_outputs_named_after_first_rom() {
    let dir = tempfile::tempdir().unwrap();
    let first = write_rom(
        dir.path(),
        "first.gb",
        &StubRom {
            slots: vec![marked_song(1), marked_song(2)],
        },
    );
    let second = write_rom(
        dir.path(),
        "second.gb",
        &StubRom {
            slots: vec![marked_song(3)],
        },
    );
    let options = Options {
        gbs: true,
        vgm: true,
        output_dir: dir.path().to_path_buf(),
        ..Options::default()
    };
    let mut pipeline = Pipeline::new(StubCore::new(), options);

    let summary = pipeline.run(&[first, second]).expect("run failed");
    assert_eq!(summary.songs, 3);
    assert_eq!(summary.output, dir.path().join("first.s"));

    let listing = fs::read_to_string(&summary.output).unwrap();
    assert!(listing.contains("SongCount::\n    db 3\n"));
    assert!(listing.contains("Song2:"));
    assert!(!listing.contains("Song3:"));

    assert_eq!(summary.vgm_files.len(), 3);
    assert_eq!(summary.vgm_files[0], dir.path().join("first-01.vgm"));
    for path in &summary.vgm_files {
        let bytes = fs::read(path).unwrap();
        assert_eq!(&bytes[0..4], b"Vgm ");
    }

    let header_path = summary.gbs_header.expect("gbs header missing");
    assert_eq!(header_path, dir.path().join("gbs-header.bin"));
    let bytes = fs::read(header_path).unwrap();
    assert_eq!(bytes.len(), 0x70);
    let header = GbsHeader::try_from(bytes.as_slice()).unwrap();
    assert_eq!(header.song_count, 3);
    assert_eq!(header.first_song, 1);

    // traces are handed over once
    assert!(pipeline.traces().is_empty());
}

#[test]
fn run_without_archive_mode_writes_listing_only() {
    let dir = tempfile::tempdir().unwrap();
    let rom = write_rom(
        dir.path(),
        "tune.gb",
        &StubRom {
            slots: vec![marked_song(7)],
        },
    );
    let options = Options {
        output_dir: dir.path().to_path_buf(),
        ..Options::default()
    };
    let summary = Pipeline::new(StubCore::new(), options).run(&[rom]).unwrap();

    assert_eq!(summary.songs, 1);
    assert!(summary.gbs_header.is_none());
    assert!(summary.vgm_files.is_empty());
    assert!(dir.path().join("tune.s").exists());
    assert!(!dir.path().join("gbs-header.bin").exists());
}

#[test]
fn missing_rom_fails_to_load() {
    let dir = tempfile::tempdir().unwrap();
    let options = Options {
        output_dir: dir.path().to_path_buf(),
        ..Options::default()
    };
    let mut pipeline = Pipeline::new(StubCore::new(), options);
    let err = pipeline.run(&[dir.path().join("nope.gb")]).unwrap_err();
    assert!(matches!(err, Error::Load { .. }));
}

#[test]
fn garbage_rom_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.gb");
    fs::write(&path, [0x00, 0xC3, 0x50, 0x01]).unwrap();
    let mut pipeline = Pipeline::new(StubCore::new(), Options::default());
    assert!(matches!(
        pipeline.record_rom(&path),
        Err(Error::InvalidRom { .. })
    ));
}
