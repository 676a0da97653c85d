use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use worldmerge_kernel::{WorldId, WorldRegistry};
use worldmerge_persist::{CopyReport, MergePlan, WorldListing, execute_plan, scan_world};
use worldmerge_placement::{PlacementConfig, PlacementEngine};

#[derive(Parser)]
#[command(
    name = "worldmerge-cli",
    about = "Hide old Minecraft saves inside a new one by relocating their region files"
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print tool version and crate info
    Info,
    /// Place worlds and print the resulting map without copying anything
    Plan {
        #[command(flatten)]
        placement: PlacementArgs,
        /// Write the plan as JSON for a later `apply`
        #[arg(long)]
        plan_out: Option<PathBuf>,
    },
    /// Place worlds, show the map, and copy the regions once confirmed
    Merge {
        #[command(flatten)]
        placement: PlacementArgs,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Copy regions according to a plan written by `plan --plan-out`
    Apply {
        /// Plan JSON file
        plan: PathBuf,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args)]
struct PlacementArgs {
    /// Destination save (never moved), then the saves to hide inside it
    #[arg(required = true, num_args = 2..)]
    worlds: Vec<PathBuf>,
    /// RNG seed; a random one is drawn and logged when omitted
    #[arg(short, long)]
    seed: Option<u64>,
    /// JSON placement config; flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,
    /// Nominal distance of the first moved world, in regions
    #[arg(long)]
    move_distance: Option<i32>,
    /// Extra distance per already moved world, in regions
    #[arg(long)]
    move_step: Option<i32>,
    /// Random spread around the nominal distance, in regions
    #[arg(long)]
    move_variance: Option<i32>,
    /// Candidate offsets tried per world before giving up
    #[arg(long)]
    max_attempts: Option<u32>,
}

impl PlacementArgs {
    fn placement_config(&self) -> Result<PlacementConfig> {
        let mut config = match &self.config {
            Some(path) => PlacementConfig::load(path)
                .with_context(|| format!("loading placement config {}", path.display()))?,
            None => PlacementConfig::default(),
        };
        if let Some(v) = self.move_distance {
            config.move_distance = v;
        }
        if let Some(v) = self.move_step {
            config.move_step = v;
        }
        if let Some(v) = self.move_variance {
            config.move_variance = v;
        }
        if let Some(v) = self.max_attempts {
            config.max_attempts = v;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("worldmerge-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("kernel: {}", worldmerge_kernel::crate_info());
            println!("placement: {}", worldmerge_placement::crate_info());
            println!("persist: {}", worldmerge_persist::crate_info());
            println!(
                "block size of one region: {}",
                worldmerge_common::BLOCKS_PER_REGION
            );
        }
        Commands::Plan {
            placement,
            plan_out,
        } => {
            let plan = plan_merge(&placement)?;
            if let Some(path) = plan_out {
                plan.save(&path)
                    .with_context(|| format!("writing plan to {}", path.display()))?;
                println!("Plan written to {}", path.display());
            }
        }
        Commands::Merge { placement, yes } => {
            let plan = plan_merge(&placement)?;
            if yes || confirm("Are you happy with this map? Type 'yes' to apply: ")? {
                apply(&plan)?;
            } else {
                println!("Nothing was copied.");
            }
        }
        Commands::Apply { plan, yes } => {
            let plan = MergePlan::load(&plan)
                .with_context(|| format!("reading plan {}", plan.display()))?;
            println!(
                "Plan copies {} regions from {} worlds into {}",
                plan.region_count(),
                plan.moves.len(),
                plan.destination.display()
            );
            if yes || confirm("Type 'yes' to apply: ")? {
                apply(&plan)?;
            } else {
                println!("Nothing was copied.");
            }
        }
    }

    Ok(())
}

/// Scan every save, place the worlds, print the maps, and return the plan.
fn plan_merge(args: &PlacementArgs) -> Result<MergePlan> {
    let config = args.placement_config()?;
    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, "placement seed");

    // Every save is read and validated before anything is placed.
    let mut listings: Vec<WorldListing> = Vec::with_capacity(args.worlds.len());
    let mut worlds = Vec::with_capacity(args.worlds.len());
    for (i, path) in args.worlds.iter().enumerate() {
        let listing =
            scan_world(path).with_context(|| format!("scanning save {}", path.display()))?;
        if !listing.skipped.is_empty() {
            tracing::warn!(
                save = %path.display(),
                skipped = ?listing.skipped,
                "region files with unreadable coordinates were skipped"
            );
        }
        let world = listing
            .to_world(WorldId(i))
            .with_context(|| format!("save {} has no region files", path.display()))?;

        println!(
            "\nWorld {i}: {} ({} regions)",
            path.display(),
            world.region_count()
        );
        match world.render() {
            Ok(map) => print!("{map}"),
            Err(e) => tracing::warn!(error = %e, world = %world.id(), "preview skipped"),
        }

        listings.push(listing);
        worlds.push(world);
    }

    let mut engine = PlacementEngine::seeded(config, seed)?;
    let mut registry = WorldRegistry::new();
    for world in worlds {
        let placement = engine.place(world, &mut registry)?;
        if !placement.world.is_destination() {
            let (bx, bz) = placement.offset.to_blocks();
            println!(
                "The new centre for world {} will be region {}, which is around block ({bx}, {bz})",
                placement.world, placement.offset
            );
        }
    }

    println!("\n===============\n   Final Map\n===============\n");
    match registry.render() {
        Ok(map) => print!("{map}"),
        Err(e) => tracing::warn!(error = %e, "final map skipped"),
    }

    let plan = MergePlan::build(&registry, &listings, Some(seed))?;
    println!(
        "\n{} regions from {} worlds will be copied into {}",
        plan.region_count(),
        plan.moves.len(),
        plan.destination.display()
    );
    Ok(plan)
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("\n{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().eq_ignore_ascii_case("yes"))
}

fn apply(plan: &MergePlan) -> Result<()> {
    let report: CopyReport = execute_plan(plan)?;
    println!(
        "Copied {} regions and {} poi/entities files ({} skipped)",
        report.regions_copied, report.siblings_copied, report.siblings_skipped
    );
    if !report.is_complete() {
        for failure in &report.failures {
            eprintln!(
                "  failed: {} -> {}: {}",
                failure.source.display(),
                failure.target.display(),
                failure.reason
            );
        }
        anyhow::bail!("{} region files failed to copy", report.failures.len());
    }
    Ok(())
}
