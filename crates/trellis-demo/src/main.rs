//! Build the sample tree, replay a gesture script and print one frame.

use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
};

use anyhow::Context as _;
use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::fmt;
use trellis::{GpuResource, Options, geom::Size};
use trellis_demo::{scene::Scene, transcript::Transcript};

/// CLI flags for the demo driver.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Client area width.
    #[clap(long, default_value_t = 480)]
    width: u32,

    /// Client area height.
    #[clap(long, default_value_t = 320)]
    height: u32,

    /// Maximum log level written to stderr.
    #[clap(long, default_value = "info")]
    log: Level,

    /// JSON file with options and skin overrides.
    #[clap(long)]
    options: Option<PathBuf>,
}

/// Run the demo.
pub fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let format = fmt::format()
        .with_level(true)
        .with_ansi(false)
        .without_time()
        .compact();
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(args.log)
        .event_format(format)
        .init();

    let options = match &args.options {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Options::from_json(&json).with_context(|| format!("parsing {}", path.display()))?
        }
        None => Options::default(),
    };

    let mut scene = Scene::build(Size::new(args.width, args.height), options)?;
    let handled = scene.replay()?;
    info!(handled, "script replayed");

    // A texture retired off the render thread goes out with the next frame.
    scene.gui.disposer().defer(GpuResource::Texture(1));

    let mut transcript = Transcript::new();
    let stats = scene.gui.render(&mut transcript)?;

    let mut out = io::stdout().lock();
    for line in scene.outline()? {
        writeln!(out, "{line}")?;
    }
    transcript.write_to(&mut out)?;
    info!(
        released = stats.released,
        render = ?stats.render_time,
        calls = transcript.lines().len(),
        "frame"
    );
    Ok(())
}
