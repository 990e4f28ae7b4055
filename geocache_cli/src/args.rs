// CLI argument definitions (clap derive).

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use geocache_core::player::Direction;
use std::path::PathBuf;

/// Play the geocache game from a terminal.
///
/// Each invocation performs one action against the saved game in the data
/// directory and prints the result.
#[derive(Parser, Debug)]
#[command(name = "geocache")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Directory holding the saved game
    #[arg(long, global = true, env = "GEOCACHE_DATA_DIR", default_value = "geocache-data")]
    pub data_dir: PathBuf,

    /// Game config JSON file (defaults apply to anything it omits)
    #[arg(short, long, global = true, env = "GEOCACHE_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show position, score and inventory
    Status,

    /// List caches around the player and what they hold
    Scan,

    /// Step one cell
    Move {
        #[arg(value_enum)]
        direction: DirectionArg,
    },

    /// Jump to a position, as a geolocation fix would
    #[command(allow_negative_numbers = true)]
    Goto { lat: f64, lng: f64 },

    /// Take the top token from the cache at cell (I, J)
    #[command(allow_negative_numbers = true)]
    Collect { i: i32, j: i32 },

    /// Put the top inventory token into the cache at cell (I, J)
    #[command(allow_negative_numbers = true)]
    Deposit { i: i32, j: i32 },

    /// Erase the saved game
    Reset {
        /// Confirm the wipe
        #[arg(long)]
        yes: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum DirectionArg {
    North,
    South,
    East,
    West,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::North => Direction::North,
            DirectionArg::South => Direction::South,
            DirectionArg::East => Direction::East,
            DirectionArg::West => Direction::West,
        }
    }
}
