use std::path::{Path, PathBuf};

use anyhow::{Context as _, bail};
use clap::{Parser, ValueEnum};
use gifframes::{
    Aggregation, DEFAULT_MIN_TILE_SIDE, Delay, EncodeOpts, MAX_PALETTE_LEN, MedianCut, Threading,
    TileScheduler,
};

/// Convert a GIF into a directory of PNG frames, or a directory of frames into a GIF.
///
/// If INPUT is a `.gif` file, OUTPUT is a directory (default: INPUT without its extension)
/// that receives `000.png`, `001.png`, ... and a `frames.json` manifest with per-frame delays.
///
/// If INPUT is a directory, its image files are read in name order and assembled into the GIF
/// at OUTPUT (default: INPUT with `.gif` appended).
#[derive(Parser, Debug)]
#[command(name = "gifframes", version)]
struct Cli {
    /// Input GIF file or frame directory.
    input: PathBuf,

    /// Output directory or GIF file.
    output: Option<PathBuf>,

    /// Delay for frames not listed in `frames.json`, in hundredths of a second.
    #[arg(long, default_value_t = 100)]
    delay: u16,

    /// Run every stage on the calling thread.
    #[arg(long, default_value_t = false)]
    serial: bool,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,

    /// Regions with either side below this are never split into tiles.
    #[arg(long, default_value_t = DEFAULT_MIN_TILE_SIDE)]
    tile_side: u32,

    /// Per-frame palette budget, including the transparent slot.
    #[arg(long, default_value_t = MAX_PALETTE_LEN)]
    max_colors: usize,

    /// How a median-cut bucket picks its representative color.
    #[arg(long, value_enum, default_value_t = AggregationArg::Mean)]
    aggregation: AggregationArg,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AggregationArg {
    Mean,
    Mode,
}

impl From<AggregationArg> for Aggregation {
    fn from(v: AggregationArg) -> Self {
        match v {
            AggregationArg::Mean => Aggregation::Mean,
            AggregationArg::Mode => Aggregation::Mode,
        }
    }
}

enum Direction {
    Split,
    Assemble,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let direction = detect_direction(&cli.input)?;
    let output = match &cli.output {
        Some(out) => {
            if out == &cli.input {
                bail!("input and output must not be the same");
            }
            out.clone()
        }
        None => default_output(&cli.input, &direction),
    };

    let threading = Threading {
        parallel: !cli.serial,
        threads: cli.threads,
        min_tile_side: cli.tile_side,
    };
    let scheduler = TileScheduler::new(&threading)?;

    match direction {
        Direction::Split => {
            let manifest = gifframes::io::gif_to_png_dir(&cli.input, &output, &scheduler)?;
            eprintln!(
                "wrote {} frames to {}",
                manifest.frames.len(),
                output.display()
            );
        }
        Direction::Assemble => {
            let quantizer = MedianCut::new(cli.aggregation.into());
            let opts = EncodeOpts {
                max_colors: cli.max_colors,
            };
            let stats = gifframes::io::png_dir_to_gif(
                &cli.input,
                &output,
                Delay(cli.delay),
                &quantizer,
                &opts,
                &scheduler,
            )?;
            eprintln!("wrote {} frames to {}", stats.frames, output.display());
        }
    }
    Ok(())
}

fn detect_direction(input: &Path) -> anyhow::Result<Direction> {
    let meta = std::fs::metadata(input)
        .with_context(|| format!("stat input '{}'", input.display()))?;
    if meta.is_dir() {
        return Ok(Direction::Assemble);
    }
    let is_gif = input
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gif"));
    if !is_gif {
        bail!("input file must be a GIF: '{}'", input.display());
    }
    Ok(Direction::Split)
}

fn default_output(input: &Path, direction: &Direction) -> PathBuf {
    match direction {
        Direction::Split => input.with_extension(""),
        Direction::Assemble => {
            let mut name = input.components().as_path().as_os_str().to_owned();
            name.push(".gif");
            PathBuf::from(name)
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
