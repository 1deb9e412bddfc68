use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use clap::error::ErrorKind;
use log::info;

use lsdpack::emulator::stub::StubCore;
use lsdpack::{Metadata, Options, Pipeline, Timing};

/// Record every song of one or more LSDj ROMs.
///
/// The songs of all ROMs are written to one `.s` listing named after the
/// first ROM (`lsdj.gb` -> `lsdj.s`). Options must come before the first
/// ROM; every argument after it is taken as a ROM path.
#[derive(Parser, Debug)]
#[command(
    name = "lsdpack",
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
)]
struct Args {
    /// Also write a GBS header (gbs-header.bin)
    #[arg(long)]
    gbs: bool,

    /// Also write one VGM file per song
    #[arg(long)]
    vgm: bool,

    /// Directory receiving the output files
    #[arg(long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// GBS title field
    #[arg(long, default_value = "<Title>")]
    title: String,

    /// GBS artist field
    #[arg(long, default_value = "<Artist>")]
    artist: String,

    /// GBS copyright field
    #[arg(long, default_value = "<Copyright>")]
    copyright: String,

    /// Abort when a song plays longer than this many emulated seconds
    #[arg(long, value_name = "SECONDS", default_value_t = 60 * 60)]
    max_song_seconds: u32,

    /// LSDj ROM images
    #[arg(value_name = "ROM", required = true, trailing_var_arg = true)]
    roms: Vec<PathBuf>,
}

fn run(args: Args) -> Result<()> {
    if args.gbs {
        info!(".gbs mode enabled");
    }
    fs::create_dir_all(&args.output_dir).with_context(|| {
        format!(
            "failed to create output directory: {}",
            args.output_dir.display()
        )
    })?;

    let options = Options {
        gbs: args.gbs,
        vgm: args.vgm,
        output_dir: args.output_dir,
        metadata: Metadata {
            title: args.title,
            artist: args.artist,
            copyright: args.copyright,
        },
        timing: Timing {
            recording_limit: args.max_song_seconds,
            ..Timing::default()
        },
    };

    let mut pipeline = Pipeline::new(StubCore::new(), options);
    let summary = pipeline.run(&args.roms)?;

    info!(
        "{} song(s) written to '{}'",
        summary.songs,
        summary.output.display()
    );
    for path in &summary.vgm_files {
        info!("wrote {}", path.display());
    }
    if let Some(path) = &summary.gbs_header {
        info!("wrote {}", path.display());
    }
    println!("OK");
    Ok(())
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            // usage errors exit with 1, not clap's default of 2
            let _ = e.print();
            return ExitCode::from(1);
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::from(1)
        }
    }
}
