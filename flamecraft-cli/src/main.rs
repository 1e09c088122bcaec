use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use flamecraft::{Flame, FlameConfig, IteratorGroup, Point, Session};

#[derive(Parser, Debug)]
#[command(name = "flamecraft", version)]
struct Cli {
    /// JSON file with a flame configuration.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a summary of every flame in a document.
    Inspect(InspectArgs),
    /// Read, write and re-read a document, checking that nothing changed.
    Roundtrip(RoundtripArgs),
    /// List registered variations and their variables.
    Variations,
    /// Map a point between canvas and world coordinates of the first flame.
    Map(MapArgs),
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Input flame document.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Emit JSON instead of text.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Parser, Debug)]
struct RoundtripArgs {
    /// Input flame document.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output document path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct MapArgs {
    /// Input flame document.
    #[arg(long = "in")]
    in_path: PathBuf,

    #[arg(long, allow_negative_numbers = true)]
    x: f64,

    #[arg(long, allow_negative_numbers = true)]
    y: f64,

    /// Treat the point as world coordinates and map it to the canvas.
    #[arg(long, default_value_t = false)]
    to_canvas: bool,
}

#[derive(serde::Serialize, Debug)]
struct FlameSummary {
    name: String,
    size: [u32; 2],
    scale: f64,
    zoom: f64,
    angle: f64,
    regular: usize,
    finals: usize,
    iterators: Vec<IteratorSummary>,
}

#[derive(serde::Serialize, Debug)]
struct IteratorSummary {
    group: IteratorGroup,
    weight: f64,
    color: f64,
    variations: Vec<(String, f64)>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => FlameConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => FlameConfig::default(),
    };
    let session = Session::new(config);

    match cli.cmd {
        Command::Inspect(args) => cmd_inspect(&session, args),
        Command::Roundtrip(args) => cmd_roundtrip(&session, args),
        Command::Variations => cmd_variations(&session),
        Command::Map(args) => cmd_map(&session, args),
    }
}

fn load(session: &Session, path: &Path) -> anyhow::Result<Vec<Flame>> {
    let doc = std::fs::read_to_string(path)
        .with_context(|| format!("read flame document '{}'", path.display()))?;
    flamecraft::read_flames(session, &doc)
        .with_context(|| format!("parse flame document '{}'", path.display()))
}

fn summarize(flame: &Flame) -> FlameSummary {
    let iterators = flame.iterators();
    FlameSummary {
        name: flame.calculated_name(),
        size: [flame.canvas().width, flame.canvas().height],
        scale: flame.pixels_per_unit(),
        zoom: flame.zoom(),
        angle: flame.angle(),
        regular: iterators.count_in(IteratorGroup::Regular),
        finals: iterators.count_in(IteratorGroup::Final),
        iterators: iterators
            .iter()
            .map(|it| IteratorSummary {
                group: it.group(),
                weight: it.weight(),
                color: it.color(),
                variations: it
                    .variations()
                    .active()
                    .map(|e| (e.name().to_string(), e.weight()))
                    .collect(),
            })
            .collect(),
    }
}

fn cmd_inspect(session: &Session, args: InspectArgs) -> anyhow::Result<()> {
    let summaries: Vec<FlameSummary> = load(session, &args.in_path)?
        .iter()
        .map(summarize)
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }
    for s in &summaries {
        println!(
            "{}: {}x{} scale {} zoom {} angle {}, {} regular / {} final",
            s.name, s.size[0], s.size[1], s.scale, s.zoom, s.angle, s.regular, s.finals
        );
        for (i, it) in s.iterators.iter().enumerate() {
            let vars: Vec<String> = it
                .variations
                .iter()
                .map(|(n, w)| format!("{n}={w}"))
                .collect();
            println!(
                "  #{i} {:?} weight {} color {}: {}",
                it.group,
                it.weight,
                it.color,
                vars.join(" ")
            );
        }
    }
    Ok(())
}

fn cmd_roundtrip(session: &Session, args: RoundtripArgs) -> anyhow::Result<()> {
    let flames = load(session, &args.in_path)?;
    let doc = flamecraft::write_flames("roundtrip", &flames);

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, &doc)
        .with_context(|| format!("write flame document '{}'", args.out.display()))?;

    let back = load(session, &args.out)?;
    anyhow::ensure!(
        back.len() == flames.len(),
        "round trip changed the flame count from {} to {}",
        flames.len(),
        back.len()
    );
    for (a, b) in flames.iter().zip(&back) {
        anyhow::ensure!(
            a.is_equal(b),
            "flame '{}' changed during the round trip",
            a.calculated_name()
        );
    }

    eprintln!("wrote {} ({} flames, unchanged)", args.out.display(), flames.len());
    Ok(())
}

fn cmd_variations(session: &Session) -> anyhow::Result<()> {
    let registry = session.registry();
    for name in registry.names() {
        let vars = registry.variables_of(name).unwrap_or_default();
        if vars.is_empty() {
            println!("{name}");
        } else {
            println!("{name}: {}", vars.join(", "));
        }
    }
    Ok(())
}

fn cmd_map(session: &Session, args: MapArgs) -> anyhow::Result<()> {
    let flames = load(session, &args.in_path)?;
    let flame = flames
        .first()
        .with_context(|| format!("no flame in '{}'", args.in_path.display()))?;

    let p = Point::new(args.x, args.y);
    let q = if args.to_canvas {
        flame.world_to_canvas(p, None, None)
    } else {
        flame.canvas_to_world(p, None, None)
    };
    println!("{} {}", q.x, q.y);
    Ok(())
}
