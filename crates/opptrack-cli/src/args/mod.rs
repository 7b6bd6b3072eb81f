// Namespaced subcommands: one namespace per entity (company, opp, link,
// attach) plus the local view state (filter, layout).

mod commands;
mod enums;

pub use commands::*;
pub use enums::*;

use clap::Parser;

#[derive(Parser)]
#[command(name = "opptrack")]
#[command(about = "Track AI opportunities: table, timeline, inline edits and attachments", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Data directory (defaults to $OPPTRACK_PATH, then the XDG data dir)
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    #[arg(long, default_value = "plain", global = true)]
    pub format: OutputFormat,

    #[arg(long, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
