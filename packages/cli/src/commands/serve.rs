use super::runtime;
use crate::config::{Config, HOSTING_TOKEN_ENV};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Port to listen on (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,
}

pub fn serve(args: ServeArgs, cwd: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = Config::load(cwd)?;
    if let Some(port) = args.port {
        config.port = port;
    }

    let hosting_token = std::env::var(HOSTING_TOKEN_ENV).ok().filter(|t| !t.is_empty());
    if hosting_token.is_none() {
        println!(
            "{} {} is not set, publishing will fail",
            "⚠️".yellow(),
            HOSTING_TOKEN_ENV.bright_white()
        );
    }

    println!("{}", "🚀 Starting Siteforge server...".bright_blue().bold());
    println!("   Data:   {}", config.get_data_dir(cwd).display());
    println!(
        "   Listen: {}",
        format!("http://{}:{}", config.host, config.port).cyan()
    );
    println!();

    let server_config = config.server_config(cwd, hosting_token);
    runtime()?.block_on(siteforge_workspace::serve(server_config))
}
