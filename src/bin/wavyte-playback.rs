use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use wavyte_playback::{
    Compositor, CompositorOpts, EffectResolver, EventKind, FactoryRegistry, HeadlessRenderer,
    Playlist, PlaylistDef, Resolution, TickOutcome, active_transitions, classify,
};

#[derive(Parser, Debug)]
#[command(name = "wavyte-playback", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a playlist and print its duration.
    Validate(ValidateArgs),
    /// Show what is playing at a given time.
    Inspect(InspectArgs),
    /// Play a playlist headlessly and print transport events.
    Simulate(SimulateArgs),
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input playlist JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Input playlist JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Playhead in seconds.
    #[arg(long)]
    at: f64,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Input playlist JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Simulated ticks per second.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Compositor options JSON.
    #[arg(long)]
    opts: Option<PathBuf>,

    /// Output width for render parameters.
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Output height for render parameters.
    #[arg(long, default_value_t = 720)]
    height: u32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Inspect(args) => cmd_inspect(args),
        Command::Simulate(args) => cmd_simulate(args),
    }
}

fn read_playlist(path: &Path) -> anyhow::Result<Playlist> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read playlist '{}'", path.display()))?;
    let def = PlaylistDef::from_json_str(&text)
        .with_context(|| format!("parse playlist '{}'", path.display()))?;
    let playlist = Playlist::from_def(&def)?;
    Ok(playlist)
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let playlist = read_playlist(&args.in_path)?;
    let segments = playlist.segments().count();
    println!(
        "ok: {} tracks, {segments} segments, duration {:.3}s",
        playlist.tracks().len(),
        playlist.duration()
    );
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let playlist = read_playlist(&args.in_path)?;
    let c = classify(&playlist, args.at);

    println!("playhead {:.3}s of {:.3}s", args.at, playlist.duration());
    for (label, list) in [
        ("to play", &c.to_play),
        ("playing", &c.currently_playing),
        ("finished", &c.finished),
    ] {
        let ids: Vec<&str> = list.iter().map(|t| t.segment.id.as_str()).collect();
        println!("{label:>9}: [{}]", ids.join(", "));
    }

    let mut renderer = HeadlessRenderer::new(Resolution::new(1280, 720));
    let mut effects = EffectResolver::new(&mut renderer)?;
    effects
        .sync(&mut renderer, playlist.effects())
        .context("compile playlist effects")?;

    for entry in &c.currently_playing {
        let effect = effects.resolve(&entry.segment.id);
        println!(
            "  {} (track {}, {}): effect '{}', source time {:.3}s",
            entry.segment.id,
            entry.track_index,
            entry.segment.type_tag,
            effect.id,
            entry.segment.source_time_at(args.at)
        );
    }

    for t in active_transitions(&playlist, &c, args.at) {
        println!(
            "  transition '{}' [{}]: window {:.3}..{:.3}, progress {:.3}",
            t.id,
            t.inputs.join(", "),
            t.overlap_start,
            t.overlap_end,
            t.progress
        );
    }
    Ok(())
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.fps > 0, "--fps must be > 0");
    let playlist = read_playlist(&args.in_path)?;
    let opts = match &args.opts {
        Some(p) => {
            let text = std::fs::read_to_string(p)
                .with_context(|| format!("read opts '{}'", p.display()))?;
            CompositorOpts::from_json_str(&text)
                .with_context(|| format!("parse opts '{}'", p.display()))?
        }
        None => CompositorOpts::default(),
    };

    let renderer = HeadlessRenderer::new(Resolution::new(args.width, args.height));
    let log = renderer.log();
    let mut comp = Compositor::new(Box::new(renderer), FactoryRegistry::headless(), opts)?;

    let events = Rc::new(RefCell::new(Vec::new()));
    for kind in [
        EventKind::Play,
        EventKind::Pause,
        EventKind::Ended,
        EventKind::Seek,
    ] {
        let sink = Rc::clone(&events);
        comp.add_event_listener(kind, move |_, e| sink.borrow_mut().push(*e));
    }

    comp.set_playlist(playlist)?;
    comp.play();

    let dt = 1.0 / f64::from(args.fps);
    // Generous bound: every segment may stall a few polls, and rate may be below 1.
    let rate = comp.opts().playback_rate;
    anyhow::ensure!(rate > 0.0, "playback_rate 0 never reaches the end");
    let max_ticks = ((comp.duration() / rate + 1.0) * f64::from(args.fps)) as u64 * 2 + 64;

    let (mut rendered, mut stalled) = (0u64, 0u64);
    let mut ended = false;
    for _ in 0..max_ticks {
        match comp.tick(dt)? {
            TickOutcome::Rendered { .. } => rendered += 1,
            TickOutcome::Stalled => stalled += 1,
            TickOutcome::Ended => {
                ended = true;
                break;
            }
            TickOutcome::Idle => break,
        }
    }

    for e in events.borrow().iter() {
        println!("{}", serde_json::to_string(e)?);
    }
    let compiled = log.borrow().compiled;
    eprintln!(
        "ticks: {rendered} rendered, {stalled} stalled; {compiled} programs compiled; ended: {ended}"
    );
    anyhow::ensure!(ended, "playlist did not end within {max_ticks} ticks");
    Ok(())
}
