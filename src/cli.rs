//! Command-line interface for ultimate_ttt.

use clap::{Parser, Subcommand, ValueEnum};
use ultimate_ttt::Strategy;

/// Ultimate tic-tac-toe - rule engine and computer opponent
#[derive(Parser, Debug)]
#[command(name = "ultimate_ttt")]
#[command(about = "Ultimate tic-tac-toe engine with a heuristic computer opponent", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Cell-selection strategy for a computer seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// First empty cell.
    First,
    /// Uniform random empty cell.
    Random,
    /// Win/block/safe-destination rule chain.
    Greedy,
    /// Weighted priority scorer.
    Weighted,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::First => Strategy::First,
            StrategyArg::Random => Strategy::Random,
            StrategyArg::Greedy => Strategy::Greedy,
            StrategyArg::Weighted => Strategy::Weighted,
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Watch two computer seats play one paced game
    SelfPlay {
        /// Pause between moves, in milliseconds
        #[arg(long, default_value = "500")]
        delay_ms: u64,

        /// Strategy for the X seat
        #[arg(long, value_enum, default_value = "weighted")]
        x_strategy: StrategyArg,

        /// Strategy for the O seat
        #[arg(long, value_enum, default_value = "greedy")]
        o_strategy: StrategyArg,
    },

    /// Play a headless batch of games and tally the results
    Simulate {
        /// Number of games to play
        #[arg(long, default_value = "100")]
        games: u32,

        /// Strategy for the X seat
        #[arg(long, value_enum, default_value = "weighted")]
        x_strategy: StrategyArg,

        /// Strategy for the O seat
        #[arg(long, value_enum, default_value = "random")]
        o_strategy: StrategyArg,
    },
}
