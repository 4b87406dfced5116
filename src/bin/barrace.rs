use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use barrace::{Keyframe, KeyframeTrack, Observation, Player, QuarterlyRow, RaceConfig, RaceError};
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "barrace", version)]
struct Cli {
    /// Log debug-level diagnostics to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the keyframe sequence and write it as JSON.
    Keyframes(KeyframesArgs),
    /// Print the ranking at one keyframe.
    Frame(FrameArgs),
    /// Play the race in real time.
    Play(PlayArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Input data JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Shape of the input data.
    #[arg(long, value_enum, default_value_t = InputFormat::Observations)]
    format: InputFormat,

    /// Optional JSON config (subdivisions, frame_duration_ms, visible_bars).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Interpolated keyframes between two report dates (overrides the config).
    #[arg(long)]
    subdivisions: Option<u32>,
}

#[derive(Parser, Debug)]
struct KeyframesArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output JSON path (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Keyframe index (0-based).
    #[arg(long)]
    index: usize,

    /// Rows to print (overrides the config).
    #[arg(long)]
    top: Option<usize>,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Milliseconds per keyframe (overrides the config).
    #[arg(long)]
    duration_ms: Option<u64>,

    /// Rows to print per frame (overrides the config).
    #[arg(long)]
    top: Option<usize>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum InputFormat {
    /// A JSON array of observations.
    Observations,
    /// A JSON array of quarterly rows (`id`, `name`, `author`, `category`, `quarters`).
    Quarterly,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Keyframes(args) => cmd_keyframes(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Play(args) => cmd_play(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn read_observations(path: &Path, format: InputFormat) -> anyhow::Result<Vec<Observation>> {
    let f = File::open(path).with_context(|| format!("open input '{}'", path.display()))?;
    let r = BufReader::new(f);
    match format {
        InputFormat::Observations => {
            serde_json::from_reader(r).with_context(|| "parse observations JSON")
        }
        InputFormat::Quarterly => {
            let rows: Vec<QuarterlyRow> =
                serde_json::from_reader(r).with_context(|| "parse quarterly JSON")?;
            Ok(barrace::normalize_quarterly(&rows)?)
        }
    }
}

fn read_config(input: &InputArgs) -> anyhow::Result<RaceConfig> {
    let mut cfg = match &input.config {
        Some(path) => {
            let s = std::fs::read_to_string(path)
                .with_context(|| format!("read config '{}'", path.display()))?;
            RaceConfig::from_json_str(&s)
                .with_context(|| format!("load config '{}'", path.display()))?
        }
        None => RaceConfig::default(),
    };
    if let Some(subdivisions) = input.subdivisions {
        cfg.subdivisions = subdivisions;
    }
    Ok(cfg)
}

fn load_track(input: &InputArgs, cfg: &RaceConfig) -> anyhow::Result<KeyframeTrack> {
    let observations = read_observations(&input.in_path, input.format)?;
    let frames = barrace::build_keyframes(&observations, cfg.subdivisions)?;
    tracing::info!(
        observations = observations.len(),
        keyframes = frames.len(),
        "loaded {}",
        input.in_path.display()
    );
    Ok(KeyframeTrack::new(frames)?)
}

fn cmd_keyframes(args: KeyframesArgs) -> anyhow::Result<()> {
    let cfg = read_config(&args.input)?;
    cfg.validate()?;
    let track = load_track(&args.input, &cfg)?;

    match &args.out {
        Some(out) => {
            if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            let f = File::create(out).with_context(|| format!("create '{}'", out.display()))?;
            let mut w = BufWriter::new(f);
            serde_json::to_writer_pretty(&mut w, track.frames())
                .with_context(|| format!("write keyframes '{}'", out.display()))?;
            w.flush()?;
            eprintln!("wrote {}", out.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut w = stdout.lock();
            serde_json::to_writer_pretty(&mut w, track.frames())?;
            writeln!(w)?;
        }
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut cfg = read_config(&args.input)?;
    if let Some(top) = args.top {
        cfg.visible_bars = top;
    }
    cfg.validate()?;
    let track = load_track(&args.input, &cfg)?;

    let frame = track
        .get(args.index)
        .ok_or_else(|| RaceError::out_of_range(args.index, track.len()))?;
    let stdout = std::io::stdout();
    write_frame(&mut stdout.lock(), frame, cfg.visible_bars)?;
    Ok(())
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    let mut cfg = read_config(&args.input)?;
    if let Some(ms) = args.duration_ms {
        cfg.frame_duration_ms = ms;
    }
    if let Some(top) = args.top {
        cfg.visible_bars = top;
    }
    cfg.validate()?;
    let track = load_track(&args.input, &cfg)?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("build tokio runtime")?;

    let end = rt.block_on(async {
        let mut player = Player::new(track, cfg.frame_duration())?;
        player.controller_mut().on_started(|s| {
            tracing::info!(frame = s.frame_index, cycle = s.play_cycle_id, "playback started");
        });
        player.controller_mut().on_stopped(|s| {
            tracing::info!(frame = s.frame_index, cycle = s.play_cycle_id, "playback stopped");
        });

        let stdout = std::io::stdout();
        let mut write_err: Option<std::io::Error> = None;
        let end = player
            .play_from_start(|frame, _| {
                if write_err.is_some() {
                    return;
                }
                let mut w = stdout.lock();
                let res = write_frame(&mut w, frame, cfg.visible_bars).and_then(|()| writeln!(w));
                if let Err(e) = res {
                    write_err = Some(e);
                }
            })
            .await?;
        if let Some(e) = write_err {
            return Err(anyhow::Error::new(e).context("write frame"));
        }
        Ok::<_, anyhow::Error>(end)
    })?;

    eprintln!("played {} frames", end.frame_index + 1);
    Ok(())
}

const BAR_WIDTH: f64 = 40.0;

fn write_frame(w: &mut impl Write, frame: &Keyframe, top: usize) -> std::io::Result<()> {
    writeln!(w, "{}  ({})", frame.quarter_label(), frame.timestamp.date())?;
    let max = frame.max_value();
    for (rank, entry) in frame.top(top).iter().enumerate() {
        let len = if max > 0.0 {
            (entry.value / max * BAR_WIDTH).round().max(0.0) as usize
        } else {
            0
        };
        writeln!(
            w,
            "{:>3}. {:<32} {:>10.0} {}",
            rank + 1,
            entry.label,
            entry.value,
            "#".repeat(len)
        )?;
    }
    Ok(())
}
