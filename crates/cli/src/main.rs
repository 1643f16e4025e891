use std::error::Error;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::{Args, Parser, Subcommand};
use hatetris_core::{Board, Piece, WellConfig};
use hatetris_engine::{describe, render, GraphTable, PlacementGraphs};
use hatetris_search::{solve_parallel, Forcing, Solver, SolverConfig, Verdict};
use tracing::{info, Level};
use tracing_subscriber::prelude::*;

#[derive(Debug, Args)]
struct WellArgs {
    #[arg(long, default_value_t = 10, help = "Well width in columns")]
    width: usize,

    #[arg(long, default_value_t = 20, help = "Visible well height in rows")]
    height: usize,

    #[arg(
        long,
        default_value_t = WellConfig::DEFAULT_SPARE_ROWS,
        help = "Hidden rows above the visible well"
    )]
    spare_rows: usize,
}

impl WellArgs {
    fn config(&self) -> Result<WellConfig, hatetris_core::ConfigError> {
        WellConfig::with_spare_rows(self.width, self.height, self.spare_rows)
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Decide whether the placer can force a line on an empty well.
    Solve {
        #[command(flatten)]
        well: WellArgs,

        #[arg(long, help = "Disable the solution cache")]
        no_cache: bool,

        #[arg(long, help = "Search the root piece kinds on separate threads")]
        parallel: bool,

        #[arg(
            long,
            help = "Load placement graphs from a JSON table instead of building them (overrides the well size)"
        )]
        table: Option<PathBuf>,

        #[arg(long, help = "Log a completion estimate every N seconds (raises logging to at least INFO)")]
        progress_secs: Option<u64>,
    },
    /// Emit the placement graphs of a well as a JSON table.
    Table {
        #[command(flatten)]
        well: WellArgs,

        #[arg(short, long, help = "Output path, stdout if omitted")]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Parser)]
#[command(name = "hatetris", about = "Exhaustive adversarial search for the HATETRIS well")]
struct Cli {
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count, help = "Increase verbosity level (-v = INFO, -vv = DEBUG, -vvv = TRACE)")]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

fn level(verbose: u8, progress: bool) -> Level {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    // progress lines are logged at INFO
    if progress {
        level.max(Level::INFO)
    } else {
        level
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let progress = matches!(
        cli.command,
        Commands::Solve {
            progress_secs: Some(_),
            ..
        }
    );
    let level = level(cli.verbose, progress);
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(io::stderr))
        .with(tracing_subscriber::filter::LevelFilter::from_level(level))
        .init();
    info!("Logging initialized at level: {}", level);

    match cli.command {
        Commands::Solve {
            well,
            no_cache,
            parallel,
            table,
            progress_secs,
        } => {
            let graphs = match table {
                Some(path) => load_table(&path)?,
                None => PlacementGraphs::build(&well.config()?),
            };
            let config = SolverConfig {
                use_cache: !no_cache,
                progress_interval: progress_secs.map(Duration::from_secs),
            };
            run_solve(&graphs, &config, parallel)
        }
        Commands::Table { well, output } => {
            let graphs = PlacementGraphs::build(&well.config()?);
            let table = GraphTable::from_graphs(&graphs);
            match output {
                Some(path) => {
                    let mut out = BufWriter::new(File::create(&path)?);
                    serde_json::to_writer_pretty(&mut out, &table)?;
                    out.flush()?;
                    info!(path = %path.display(), "table written");
                }
                None => {
                    let mut out = io::stdout().lock();
                    serde_json::to_writer_pretty(&mut out, &table)?;
                    writeln!(out)?;
                }
            }
            Ok(())
        }
    }
}

fn load_table(path: &Path) -> Result<PlacementGraphs, Box<dyn Error>> {
    let reader = BufReader::new(File::open(path)?);
    let table: GraphTable = serde_json::from_reader(reader)?;
    info!(path = %path.display(), "loaded graph table");
    Ok(PlacementGraphs::from_table(&table)?)
}

fn run_solve(
    graphs: &PlacementGraphs,
    config: &SolverConfig,
    parallel: bool,
) -> Result<(), Box<dyn Error>> {
    let well = *graphs.config();
    let board = Board::empty(&well);
    println!(
        "well {}x{} (spare rows {}, max depth {}, largest graph {} nodes)",
        well.width(),
        well.height(),
        well.spare_rows(),
        well.max_depth(),
        graphs.max_nodes()
    );

    let started = Instant::now();
    let (verdict, stats) = if parallel {
        solve_parallel(graphs, &board, config)
    } else {
        let mut solver = Solver::new(graphs, config);
        let verdict = solver.solve(&mut board.clone());
        (verdict, solver.stats())
    };
    let elapsed = started.elapsed();

    let mut out = io::stdout().lock();
    writeln!(out, "winner: {}", verdict.winner())?;
    match verdict {
        Verdict::Adversary(piece) => writeln!(out, "forcing piece: {}", piece)?,
        Verdict::Placer(_) => {
            for piece in Piece::ALL {
                let Some(forcing) = verdict.forcing(piece) else {
                    continue;
                };
                let node = graphs.graph(piece).node(forcing.node());
                let kind = match forcing {
                    Forcing::Line(_) => "line",
                    Forcing::Survive(_) => "survive",
                };
                writeln!(out, "{} ({}): {}", piece, kind, describe(node))?;
                write!(out, "{}", render(&well, &board, Some(node)))?;
            }
        }
    }
    writeln!(
        out,
        "searched {} wells ({} cache hits, depth {}) in {:.3}s",
        stats.wells,
        stats.cache_hits,
        stats.max_depth,
        elapsed.as_secs_f64()
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(level(0, false), Level::WARN);
        assert_eq!(level(1, false), Level::INFO);
        assert_eq!(level(2, false), Level::DEBUG);
        assert_eq!(level(7, false), Level::TRACE);
    }

    #[test]
    fn test_progress_raises_level_to_info() {
        assert_eq!(level(0, true), Level::INFO);
        assert_eq!(level(2, true), Level::DEBUG);
    }

    #[test]
    fn test_progress_flag_parses() {
        let cli = Cli::try_parse_from(["hatetris", "solve", "--width", "4", "--progress-secs", "5"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Solve {
                progress_secs: Some(5),
                ..
            }
        ));
    }
}
