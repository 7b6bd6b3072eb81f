use anyhow::{Result, bail};
use opptrack_runtime::{DB_FILE, Tracker, resolve_data_dir};
use std::path::Path;

use super::args::{Cli, Commands};
use super::handlers::{self, HandlerContext};
use super::logging;

pub fn run(cli: Cli) -> Result<()> {
    logging::init(cli.log_level);

    let data_dir = resolve_data_dir(cli.data_dir.as_deref())?;

    let Some(command) = cli.command else {
        show_guidance(&data_dir);
        return Ok(());
    };

    if let Commands::Init = command {
        return handlers::init::handle(&data_dir, cli.format);
    }

    if !data_dir.join(DB_FILE).exists() {
        bail!(
            "No tracker at {}. Run `opptrack init` first.",
            data_dir.display()
        );
    }

    let ctx = HandlerContext::new(cli.format, Tracker::open(data_dir)?);

    match command {
        // Handled before the tracker is opened
        Commands::Init => Ok(()),
        Commands::Company { command } => handlers::company::handle(&ctx, command),
        Commands::Opp { command } => handlers::opportunity::handle(&ctx, command),
        Commands::Link { command } => handlers::link::handle(&ctx, command),
        Commands::Attach { command } => handlers::attachment::handle(&ctx, command),
        Commands::Filter { command } => handlers::filter::handle(&ctx, command),
        Commands::Layout { command } => handlers::layout::handle(&ctx, command),
        Commands::Watch { interval_ms } => handlers::watch::handle(&ctx, interval_ms),
    }
}

fn show_guidance(data_dir: &Path) {
    println!("opptrack - AI opportunity tracker\n");

    if !data_dir.join(DB_FILE).exists() {
        println!("Get started:");
        println!("  opptrack init\n");
        println!("Data directory: {}\n", data_dir.display());
    } else {
        println!("Quick commands:");
        println!("  opptrack opp list                 # Table of opportunities");
        println!("  opptrack opp add <NAME>           # Create an opportunity");
        println!("  opptrack opp set <ID> status done # Edit one field");
        println!("  opptrack opp timeline             # Group by target month\n");
    }

    println!("For more commands:");
    println!("  opptrack --help");
}
