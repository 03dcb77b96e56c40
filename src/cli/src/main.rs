#![warn(clippy::pedantic)]

use std::{borrow::Cow, fs, path::PathBuf};

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{OptionExt, WrapErr};
use env_logger::TimestampPrecision;
use itertools::Itertools;
use log::{LevelFilter, info, warn};
use owo_colors::OwoColorize;
use twisty_core::{
    Algorithm, CUBE3, CayleyExplorer, Exploration, MoveSide, MoveTable, Order, Permutation,
    PuzzleDefinition, SKEWB, StabilizerChain,
    facelets::{CUBE3_NET, Net, SKEWB_NET},
};

/// Twists puzzles and counts their states
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Increase logging verbosity (can be repeated)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Perform an algorithm on a solved puzzle and draw the result
    Apply {
        #[command(flatten)]
        puzzle: PuzzleArgs,
        /// The move sequence to perform, e.g. "R U' F2"
        algorithm: String,
    },
    /// Print how many times an algorithm has to be repeated to solve the puzzle
    Order {
        #[command(flatten)]
        puzzle: PuzzleArgs,
        /// The move sequence to measure
        algorithm: String,
    },
    /// Visit every state reachable with the puzzle's moves and their inverses
    Explore {
        #[command(flatten)]
        puzzle: PuzzleArgs,
        /// Stop after visiting this many states
        #[arg(long)]
        limit: Option<usize>,
        /// Report progress every this many states
        #[arg(long, default_value_t = CayleyExplorer::DEFAULT_REPORT_INTERVAL)]
        interval: usize,
        /// Apply each move before the current state instead of after it
        #[arg(long)]
        before: bool,
    },
    /// Compute the number of reachable states without visiting them
    GroupOrder {
        #[command(flatten)]
        puzzle: PuzzleArgs,
    },
}

#[derive(Args)]
struct PuzzleArgs {
    /// Which puzzle to use
    puzzle: PuzzleKind,
    /// The TOML definition of a custom puzzle
    #[arg(long, short = 'd', value_name = "FILE")]
    definition: Option<PathBuf>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum PuzzleKind {
    Skewb,
    Cube3,
    Custom,
}

struct Puzzle {
    table: Cow<'static, MoveTable>,
    net: Option<Net>,
}

impl PuzzleArgs {
    fn load(&self) -> color_eyre::Result<Puzzle> {
        if self.puzzle != PuzzleKind::Custom && self.definition.is_some() {
            warn!("Ignoring the definition file since {:?} is built in", self.puzzle);
        }

        Ok(match self.puzzle {
            PuzzleKind::Skewb => Puzzle {
                table: Cow::Borrowed(&*SKEWB),
                net: Some(SKEWB_NET),
            },
            PuzzleKind::Cube3 => Puzzle {
                table: Cow::Borrowed(&*CUBE3),
                net: Some(CUBE3_NET),
            },
            PuzzleKind::Custom => {
                let path = self
                    .definition
                    .as_ref()
                    .ok_or_eyre("Custom puzzles need a definition file; pass one with `--definition`")?;

                let text = fs::read_to_string(path)
                    .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
                let table = PuzzleDefinition::from_toml_str(&text)?.into_move_table()?;

                info!(
                    "Loaded {} with {} moves on {} facelets",
                    table.name(),
                    table.moves().len(),
                    table.facelet_count()
                );

                Puzzle {
                    table: Cow::Owned(table),
                    net: None,
                }
            }
        })
    }
}

impl Puzzle {
    fn group_order(&self) -> Order {
        self.table.expected_order().unwrap_or_else(|| {
            info!("Computing the order of {}", self.table.name());
            StabilizerChain::new(self.table.generators()).cardinality()
        })
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .format_timestamp(Some(TimestampPrecision::Millis))
        .init();

    match cli.command {
        Commands::Apply { puzzle, algorithm } => {
            let puzzle = puzzle.load()?;
            let algorithm = Algorithm::parse(&puzzle.table, &algorithm)?;
            let state = algorithm.permutation();

            println!("{algorithm}");
            println!("{state}");
            println!("Order: {}", state.order());

            if let Some(net) = puzzle.net {
                println!();
                draw_net(&net, state);
            }
        }
        Commands::Order { puzzle, algorithm } => {
            let puzzle = puzzle.load()?;
            let algorithm = Algorithm::parse(&puzzle.table, &algorithm)?;
            let state = algorithm.permutation();

            println!("Order: {}", state.order());
            println!("Cycle type: [{}]", state.cycle_type().iter().join(", "));
            println!(
                "Parity: {}",
                if state.is_even() { "even" } else { "odd" }
            );
        }
        Commands::Explore {
            puzzle,
            limit,
            interval,
            before,
        } => {
            let puzzle = puzzle.load()?;
            let expected = puzzle.group_order();

            let mut explorer = CayleyExplorer::new(puzzle.table.generators_with_inverses())
                .with_expected_total(expected)
                .with_report_interval(interval)
                .with_move_side(if before {
                    MoveSide::Before
                } else {
                    MoveSide::After
                });

            let exploration = explorer.run_with(
                |progress| eprintln!("{progress}"),
                |progress| limit.is_none_or(|limit| progress.visited < limit),
            );

            match exploration {
                Exploration::Exhausted { states } => {
                    println!("Visited all {states} states of {}", puzzle.table.name());

                    if Order::from_digit(states as u64) != expected {
                        warn!("Expected {expected} states but found {states}");
                    }
                }
                Exploration::Interrupted { states } => {
                    println!(
                        "Stopped after {states} states, {}",
                        explorer.progress()
                    );
                }
            }
        }
        Commands::GroupOrder { puzzle } => {
            let puzzle = puzzle.load()?;
            let chain = StabilizerChain::new(puzzle.table.generators());

            println!("{}", chain.cardinality());

            if let Some(expected) = puzzle.table.expected_order()
                && expected != chain.cardinality()
            {
                warn!(
                    "{} claims {expected} states but its moves generate {}",
                    puzzle.table.name(),
                    chain.cardinality()
                );
            }
        }
    }

    Ok(())
}

/// Print a net with two terminal cells per facelet
fn draw_net(net: &Net, state: &Permutation) {
    for row in net.grid(state) {
        let line = row
            .iter()
            .map(|cell| match cell {
                Some(color) => {
                    let (r, g, b) = color.rgb();
                    "  ".on_truecolor(r, g, b).to_string()
                }
                None => "  ".to_owned(),
            })
            .join("");

        println!("{}", line.trim_end());
    }
}
