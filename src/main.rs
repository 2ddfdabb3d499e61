use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use log::{error, info, LevelFilter};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use sat_sweeper::{Game, PlayOutcome, SatAgent, SinglePointAgent, World};

#[derive(Debug, Parser)]
#[command(author, version, about = "Minesweeper agent that only moves on proof")]
struct Args {
    /// Layout file: 'm' mine, 'b' blocked, '.' safe, digits safe with a
    /// declared hint value. A random board is generated when omitted.
    world: Option<PathBuf>,

    /// Deduction strategy to play with.
    #[arg(short = 's', long, value_enum, default_value_t = Strategy::Cnf)]
    strategy: Strategy,

    /// Side length of the generated board.
    #[arg(long, default_value_t = 8)]
    size: usize,

    /// Mine count of the generated board.
    #[arg(long, default_value_t = 10)]
    mines: usize,

    /// Seed for the generated board. Random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Print the agent's view after every step.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Strategy {
    /// Single-neighborhood deduction, no SAT back end.
    SinglePoint,
    /// SAT engine with the enumerative DNF encoding.
    Dnf,
    /// SAT engine with the at-most/at-least CNF decomposition.
    Cnf,
}

fn main() {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(if args.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .format_timestamp(None)
        .target(env_logger::Target::Stdout)
        .init();

    if let Err(e) = run(args) {
        error!("execution failed: {e:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let world = match &args.world {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading layout {}", path.display()))?;
            World::from_layout(&text).context("parsing layout")?
        }
        None => {
            let seed = args.seed.unwrap_or_else(|| rand::rng().random());
            info!("generating {0}x{0} board with {1} mines (seed {seed})", args.size, args.mines);
            let mut rng = SmallRng::seed_from_u64(seed);
            World::random(args.size, args.size, args.mines, &mut rng)
                .context("generating board")?
        }
    };

    let game = Game::new(world);
    let outcome = play(args.strategy, game, args.verbose)?;
    println!("Result: {outcome}");
    Ok(())
}

fn play(strategy: Strategy, game: Game, verbose: bool) -> anyhow::Result<PlayOutcome> {
    match strategy {
        Strategy::SinglePoint => {
            let mut agent = SinglePointAgent::new(game, verbose);
            let outcome = agent.play();
            print!("Final map\n{}", agent.view());
            Ok(outcome)
        }
        Strategy::Dnf => {
            let mut agent = SatAgent::enumerative(game, verbose);
            let outcome = agent.play()?;
            info!("knowledge base holds {} hint formulas", agent.knowledge_len());
            print!("Final map\n{}", agent.view());
            Ok(outcome)
        }
        Strategy::Cnf => {
            let mut agent = SatAgent::decomposition(game, verbose);
            let outcome = agent.play()?;
            info!("knowledge base holds {} hint formulas", agent.knowledge_len());
            print!("Final map\n{}", agent.view());
            Ok(outcome)
        }
    }
}
