mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{init, inspect, new_site, serve, InitArgs, InspectArgs, NewArgs, ServeArgs};

/// Siteforge CLI - no-code website builder
#[derive(Parser, Debug)]
#[command(name = "siteforge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new Siteforge project
    Init(InitArgs),

    /// Start the editor API server
    Serve(ServeArgs),

    /// Create a site with the default home page
    New(NewArgs),

    /// Show a stored site's pages
    Inspect(InspectArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| {
            let cwd = cwd.display().to_string();
            match cli.command {
                Command::Init(args) => init(args, &cwd),
                Command::Serve(args) => serve(args, &cwd),
                Command::New(args) => new_site(args, &cwd),
                Command::Inspect(args) => inspect(args, &cwd),
            }
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
