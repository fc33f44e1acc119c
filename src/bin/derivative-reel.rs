use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use derivative_reel::{
    FontChoice, FrameIndex, PreparedAssetStore, Presentation, RecordingSink, RenderConfig,
    Renderer, Timeline, create_backend, encode::PngSequenceSink, encode::sink::save_frame_png,
    timeline::instructions::TracingSink,
};

#[derive(Parser, Debug)]
#[command(name = "derivative-reel", version, about = "Render the derivatives explainer video")]
struct Cli {
    /// Log debug events (reactive recomputes, shaping, per-instruction timing).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the whole presentation to an MP4 (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Dump the instruction stream and frame timing as JSON.
    Plan(PlanArgs),
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// JSON file with a `RenderConfig`; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Asset directory containing `car.svg`.
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Font file for all text. Defaults to `<assets>/fonts` or a system sans-serif face.
    #[arg(long)]
    font: Option<PathBuf>,

    #[arg(long)]
    fps: Option<u32>,

    #[arg(long, requires = "height")]
    width: Option<u32>,

    #[arg(long, requires = "width")]
    height: Option<u32>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Output MP4 path.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Write a PNG per frame into this directory instead of encoding an MP4.
    #[arg(long, conflicts_with = "out")]
    png_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct PlanArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Write the JSON here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Plan(args) => cmd_plan(args),
    }
}

fn load_config(common: &CommonArgs) -> anyhow::Result<RenderConfig> {
    let mut cfg = match &common.config {
        Some(path) => RenderConfig::from_json_file(path)?,
        None => RenderConfig::default(),
    };
    if let Some(assets) = &common.assets {
        cfg.assets = assets.clone();
    }
    if let Some(font) = &common.font {
        cfg.font = Some(font.clone());
    }
    if let Some(fps) = common.fps {
        cfg.fps = fps;
    }
    if let (Some(w), Some(h)) = (common.width, common.height) {
        cfg.width = w;
        cfg.height = h;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn prepare(presentation: &Presentation, cfg: &RenderConfig) -> anyhow::Result<PreparedAssetStore> {
    let assets = PreparedAssetStore::prepare(presentation, &cfg.assets, &cfg.font_choice())
        .with_context(|| format!("prepare assets from '{}'", cfg.assets.display()))?;
    if matches!(cfg.font_choice(), FontChoice::Auto) {
        tracing::info!(font = %assets.font().source, "using font");
    }
    Ok(assets)
}

fn renderer<'a>(
    presentation: &'a Presentation,
    cfg: &RenderConfig,
    assets: &'a PreparedAssetStore,
) -> anyhow::Result<Renderer<'a>> {
    let mut r = Renderer::new(
        presentation,
        cfg.frame_rate()?,
        cfg.canvas()?,
        cfg.background,
        assets,
        create_backend(derivative_reel::BackendKind::Cpu),
    )?;
    r.static_frame_elision = cfg.static_frame_elision;
    Ok(r)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(&args.common)?;
    if let Some(out) = args.out {
        cfg.output = out;
    }

    let presentation = Presentation::build()?;
    let assets = prepare(&presentation, &cfg)?;
    let mut r = renderer(&presentation, &cfg, &assets)?;

    let mut trace = TracingSink::default();
    presentation.drive(r.fps(), &mut trace)?;
    tracing::info!(frames = trace.frames, fps = r.fps().as_f64(), "instruction stream");

    let stats = match &args.png_dir {
        Some(dir) => r.render_all(&mut PngSequenceSink::new(dir))?,
        None => derivative_reel::render_to_mp4(&mut r, &cfg.output)?,
    };
    let written: &Path = args.png_dir.as_deref().unwrap_or(cfg.output.as_path());
    eprintln!(
        "wrote {} ({} frames, {} rendered, {} reused)",
        written.display(),
        stats.frames_total,
        stats.frames_rendered,
        stats.frames_elided
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.common)?;
    let presentation = Presentation::build()?;
    let assets = prepare(&presentation, &cfg)?;
    let mut r = renderer(&presentation, &cfg, &assets)?;

    let total = r.timeline().total_frames;
    if args.frame >= total {
        anyhow::bail!("frame {} is out of range (presentation has {total} frames)", args.frame);
    }
    let frame = r.render_frame(FrameIndex(args.frame))?;
    save_frame_png(&args.out, &frame, cfg.background)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

#[derive(serde::Serialize)]
struct PlanDump<'a> {
    duration_secs: f64,
    timeline: &'a Timeline,
    instructions: &'a [derivative_reel::Instruction],
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.common)?;
    let fps = cfg.frame_rate()?;
    let presentation = Presentation::build()?;

    let mut sink = RecordingSink::default();
    presentation.drive(fps, &mut sink)?;
    let timeline = Timeline::build(&presentation, fps);
    let dump = PlanDump {
        duration_secs: timeline.duration_secs(),
        timeline: &timeline,
        instructions: &sink.instructions,
    };
    let json = serde_json::to_string_pretty(&dump).context("serialize plan")?;

    match args.out {
        Some(path) => {
            derivative_reel::encode::ffmpeg::ensure_parent_dir(&path)?;
            std::fs::write(&path, json)
                .with_context(|| format!("write plan '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
