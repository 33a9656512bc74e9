//! afmap CLI - map disk meshes onto planar polygons.
//!
//! Usage: afmap <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `afmap --help` for available commands. Set `RUST_LOG=afmap=debug` for
//! per-move tracing.

use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use afmap::algo::parameterize::{AdvancingFront, AdvancingFrontOptions, RunState, TargetDomain};
use afmap::algo::progress::Progress;
use afmap::io;
use afmap::mesh::{disk_boundary, to_face_vertex, HalfEdgeMesh};

#[derive(Parser)]
#[command(name = "afmap")]
#[command(author, version, long_about = None)]
#[command(about = "Certified advancing-front maps of disk meshes")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh information
    Info {
        /// Input mesh file
        input: PathBuf,
    },

    /// Map a disk mesh onto a planar polygon
    Map {
        /// Input mesh file
        input: PathBuf,

        /// Output OBJ file, with the map as texture coordinates
        output: PathBuf,

        /// Target polygon
        #[arg(short, long, value_enum, default_value = "circle")]
        domain: Domain,

        /// Disable refinement of non-convex front triangles
        #[arg(long)]
        no_refinement: bool,

        /// Per-move time budget in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Stop the run when a move exceeds the budget
        #[arg(long, requires = "timeout_ms")]
        enforce_timeout: bool,

        /// Scale texture coordinates into [0, 1]^2
        #[arg(long)]
        normalize: bool,

        /// Skip rounding of exact coordinates to floating point
        #[arg(long)]
        no_snap: bool,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Domain {
    /// Unit circle
    Circle,
    /// Square [-1, 1]^2
    Square,
    /// Five-pointed star
    Star,
}

impl From<Domain> for TargetDomain {
    fn from(domain: Domain) -> Self {
        match domain {
            Domain::Circle => TargetDomain::Circle,
            Domain::Square => TargetDomain::Square,
            Domain::Star => TargetDomain::Star,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Info { input } => cmd_info(&input),
        Commands::Map {
            input,
            output,
            domain,
            no_refinement,
            timeout_ms,
            enforce_timeout,
            normalize,
            no_snap,
        } => {
            let mut options = AdvancingFrontOptions::default()
                .with_domain(domain.into())
                .with_refinement(!no_refinement)
                .with_snap_rounding(!no_snap);
            if let Some(ms) = timeout_ms {
                options = options.with_move_timeout(Duration::from_millis(ms), enforce_timeout);
            }
            cmd_map(&input, &output, options, normalize)
        }
    }
}

/// Create a progress reporter that displays a progress bar on the terminal.
fn create_progress() -> Progress {
    let max_percent = Arc::new(AtomicUsize::new(0));

    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }

        let percent = if current >= total {
            100
        } else {
            ((current * 100) + (total / 2)) / total
        };

        // Only redraw when the bar grows
        if max_percent.fetch_max(percent, Ordering::Relaxed) >= percent && percent != 100 {
            return;
        }

        let bar_width = 30;
        let filled = (percent * bar_width) / 100;
        eprint!(
            "\r[{}{}] {:3}% {}",
            "=".repeat(filled),
            " ".repeat(bar_width - filled),
            percent,
            message
        );
        let _ = std::io::stderr().flush();

        if current >= total {
            eprintln!();
        }
    })
}

fn cmd_info(input: &PathBuf) -> Result<()> {
    let mesh: HalfEdgeMesh = io::load(input)
        .with_context(|| format!("loading {}", input.display()))?;

    println!("File: {}", input.display());
    println!("Vertices: {}", mesh.num_vertices());
    println!("Faces: {}", mesh.num_faces());
    println!("Edges: {}", mesh.num_edges());
    println!("Interior vertices: {}", mesh.num_interior_vertices());
    println!("Euler characteristic: {}", mesh.euler_characteristic());
    println!("Surface area: {:.6}", mesh.surface_area());

    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
    }

    match disk_boundary(&mesh) {
        Ok(boundary) => println!("Topology: disk ({} boundary vertices)", boundary.len()),
        Err(e) => println!("Topology: not mappable ({})", e),
    }

    Ok(())
}

fn cmd_map(
    input: &PathBuf,
    output: &PathBuf,
    options: AdvancingFrontOptions,
    normalize: bool,
) -> Result<()> {
    let mesh: HalfEdgeMesh = io::load(input)
        .with_context(|| format!("loading {}", input.display()))?;
    println!("Loaded: {} vertices, {} faces", mesh.num_vertices(), mesh.num_faces());

    let domain = options.domain;
    let mut run = AdvancingFront::new(&mesh, options);
    run.initialize().context("initializing advancing front")?;

    println!("Mapping onto {}...", domain);
    let progress = create_progress();
    let start = Instant::now();
    let state = run.run_with_progress(&progress)?;
    let elapsed = start.elapsed();

    let stats = run.stats().cloned().unwrap_or_default();
    println!("Run state: {} in {:.2?}", state, elapsed);
    println!(
        "Moves: {} splits ({} closures), {} flips, {} no-ops",
        stats.triangle_splits, stats.closures, stats.edge_flips, stats.no_ops
    );
    println!(
        "Refinement: {} vertices ({} chord splits), {} convexifications, {} concavifications",
        stats.refined_vertices,
        stats.chord_splits,
        stats.convexifications,
        stats.concavifications
    );
    println!("Exact fallbacks: {}", stats.exact_fallbacks);
    println!("Snap rounding: {} kept, {} rejected", stats.snap_successes, stats.snap_failures);

    if state != RunState::Terminated {
        bail!(
            "run {} with {} faces left",
            state,
            run.remaining_faces().unwrap_or(0)
        );
    }
    run.validate().context("validating map")?;

    let refined = run.output_mesh()?;
    let mut uv = run.uv_map()?;
    let (_, faces) = to_face_vertex(&refined);
    println!("Inverted faces (floating point): {}", uv.inverted_faces(&faces));

    if normalize {
        uv.normalize();
    }
    io::obj::save_with_uvs(&refined, &uv, output)
        .with_context(|| format!("saving {}", output.display()))?;
    println!("Saved: {}", output.display());

    Ok(())
}
