use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use adventure_world::config::{self, GameConfig, StoreConfig, WorldSource};
use adventure_world::engine::{Output, OutputBlock};
use adventure_world::store::{self, WorldStore};
use adventure_world::world::{BuiltinWorld, validate_world};
use adventure_world::{GameState, prepare_world};

#[derive(Parser, Debug)]
#[command(name = "adventure")]
#[command(about = "Walk a room graph from the terminal")]
struct Args {
    /// TOML config file (store backend, world source, start room)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Use a SQLite database at this path
    #[arg(long, value_name = "PATH", conflicts_with = "memory")]
    db: Option<PathBuf>,

    /// Keep the world in memory only
    #[arg(long)]
    memory: bool,

    /// Generate a N x N grid world (replaces stored rooms)
    #[arg(long, value_name = "N", conflicts_with_all = ["world", "builtin", "existing"])]
    grid: Option<usize>,

    /// Load a hand-authored TOML world file (replaces stored rooms)
    #[arg(long, value_name = "FILE", conflicts_with_all = ["builtin", "existing"])]
    world: Option<PathBuf>,

    /// Load a built-in world: manor or cave
    #[arg(long, value_name = "NAME", conflicts_with = "existing")]
    builtin: Option<BuiltinWorld>,

    /// Play the rooms already in the database
    #[arg(long)]
    existing: bool,

    /// Start in this room instead of the world's default
    #[arg(long, value_name = "ROOM")]
    start: Option<String>,

    /// Report world problems (dangling exits, missing start room) and exit
    #[arg(long)]
    check: bool,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Config file first, then command-line overrides.
fn resolve_config(args: &Args) -> io::Result<GameConfig> {
    let mut cfg = match &args.config {
        Some(path) => config::load_config(path)?,
        None => GameConfig::default(),
    };

    if let Some(path) = &args.db {
        cfg.store = StoreConfig::Sqlite { path: path.clone() };
    } else if args.memory {
        cfg.store = StoreConfig::Memory;
    }

    if let Some(size) = args.grid {
        cfg.world = WorldSource::Grid { size };
    } else if let Some(path) = &args.world {
        cfg.world = WorldSource::File { path: path.clone() };
    } else if let Some(name) = args.builtin {
        cfg.world = WorldSource::Builtin { name };
    } else if args.existing {
        cfg.world = WorldSource::Existing;
    }

    if args.start.is_some() {
        cfg.start_room = args.start.clone();
    }
    Ok(cfg)
}

fn flush_output(out: Output) {
    let mut printed_anything = false;
    let mut started_events = false;

    for block in out.blocks {
        match &block {
            OutputBlock::Title(_) | OutputBlock::Exits(_) => println!("\n{block}"),
            OutputBlock::Event(_) => {
                if !started_events && printed_anything {
                    println!(); // visual separation before first event
                }
                started_events = true;
                println!("{block}");
            }
            OutputBlock::Text(_) | OutputBlock::Items(_) => println!("{block}"),
        }
        printed_anything = true;
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(args.verbose);

    let cfg = resolve_config(&args)?;
    let mut store = store::open_store(&cfg.store)?;
    let start_room = prepare_world(&mut store, &cfg)?;

    if args.check {
        let findings = validate_world(&store, &start_room)?;
        if findings.is_empty() {
            println!("World OK: {} rooms.", store.rooms()?.len());
            return Ok(());
        }
        for f in &findings {
            println!("- {f}");
        }
        return Err(format!("{} problem(s) found", findings.len()).into());
    }

    let mut game = GameState::new(store, start_room);

    println!("Type 'look' to look around, 'quit' to exit.");
    flush_output(game.initialize()?);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("\n> ");
        io::stdout().flush()?;

        let input = match lines.next() {
            Some(line) => line?,
            None => {
                println!("\nGoodbye.");
                break;
            }
        };

        let (out, quit) = game.step(&input)?;
        flush_output(out);

        if quit {
            break;
        }
    }

    Ok(())
}
