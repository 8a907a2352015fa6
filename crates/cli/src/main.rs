//! Headless grid generator.
//!
//! Builds one seeded grid and optionally dumps it as ASCII, writes a binary
//! snapshot, or exports a generation metrics report.

use std::env;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use gridforge_core::WorldSeed;
use gridforge_testkit::{GenerationMetrics, MetricsReport};
use gridforge_world::{glyph_rows, save_grid, Grid, GridConfig, TerraformParams};
use tracing::Level;
use tracing_subscriber::fmt;

fn main() -> Result<()> {
    let _ = fmt().with_max_level(Level::INFO).try_init();
    let config = config_from_args()?;

    tracing::info!(
        seed = config.grid.seed.0,
        width = config.grid.dimensions.0,
        height = config.grid.dimensions.1,
        "generating grid"
    );
    let started = Instant::now();
    let grid = Grid::build(config.grid)?;
    let elapsed = started.elapsed();
    tracing::info!(
        cells = grid.cells().len(),
        landmasses = grid.landmasses().len(),
        rivers = grid.rivers().len(),
        ms = elapsed.as_millis() as u64,
        "grid ready"
    );

    if config.ascii {
        for line in glyph_rows(&grid) {
            println!("{line}");
        }
    }
    if let Some(path) = &config.snapshot {
        save_grid(path, &grid)
            .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
        tracing::info!(path = %path.display(), "snapshot written");
    }
    if let Some(path) = &config.metrics {
        let mut report = MetricsReport::new("gridforge-cli");
        report.duration_ms = elapsed.as_millis() as u64;
        report.generation = Some(GenerationMetrics {
            cells: grid.cells().len(),
            passable_cells: grid.cells().iter().filter(|c| c.passable()).count(),
            landmasses: grid.landmasses().len(),
            bodies_of_water: grid.bodies_of_water().len(),
            rivers: grid.rivers().len(),
        });
        report
            .write_to(path)
            .with_context(|| format!("Failed to write metrics {}", path.display()))?;
        tracing::info!(path = %path.display(), "metrics written");
    }
    Ok(())
}

struct CliConfig {
    grid: GridConfig,
    ascii: bool,
    snapshot: Option<PathBuf>,
    metrics: Option<PathBuf>,
}

fn config_from_args() -> Result<CliConfig> {
    config_from_iter(env::args().skip(1))
}

fn config_from_iter<I>(mut args: I) -> Result<CliConfig>
where
    I: Iterator<Item = String>,
{
    let mut grid = GridConfig::default();
    let mut terraform = TerraformParams::default();
    let mut ascii = false;
    let mut snapshot = None;
    let mut metrics = None;

    fn value<I: Iterator<Item = String>>(args: &mut I, flag: &str) -> Result<String> {
        args.next()
            .with_context(|| format!("{flag} requires a value"))
    }

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => {
                grid.seed = WorldSeed(value(&mut args, "--seed")?.parse()?);
            }
            "--width" => {
                grid.dimensions.0 = value(&mut args, "--width")?.parse()?;
            }
            "--height" => {
                grid.dimensions.1 = value(&mut args, "--height")?.parse()?;
            }
            "--cell-size" => {
                grid.cell_size = value(&mut args, "--cell-size")?.parse()?;
            }
            "--rivers" => {
                terraform.rivers = value(&mut args, "--rivers")?.parse()?;
            }
            "--forests" => {
                terraform.forests = value(&mut args, "--forests")?.parse()?;
            }
            "--no-terrain" => grid.with_terrain = false,
            "--allow-large" => grid.allow_large = true,
            "--ascii" => ascii = true,
            "--out" => snapshot = Some(PathBuf::from(value(&mut args, "--out")?)),
            "--metrics" => metrics = Some(PathBuf::from(value(&mut args, "--metrics")?)),
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }

    grid.terraform = terraform;
    Ok(CliConfig {
        grid,
        ascii,
        snapshot,
        metrics,
    })
}
