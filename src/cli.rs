use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "arena-ladder backend")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Start the backend server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Apply a single match result to a division ladder
    Report {
        /// Division key, e.g. d1
        #[arg(long)]
        ladder: String,
        /// Winning player id
        #[arg(long)]
        winner: String,
        /// Losing player id
        #[arg(long)]
        loser: String,
    },
    /// Rebuild the aggregated member view
    Rebuild,
}
