use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Directory for site documents
    #[arg(short, long, default_value = "data")]
    pub data_dir: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Siteforge project...".bright_blue().bold());

    let data_dir = PathBuf::from(cwd).join(&args.data_dir);
    if !data_dir.exists() {
        fs::create_dir_all(&data_dir)?;
        println!("  {} Created {}/", "✓".green(), args.data_dir);
    }

    let config = Config {
        data_dir: args.data_dir.clone(),
        ..Config::default()
    };

    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Add a token to \"authTokens\" in {}", DEFAULT_CONFIG_NAME);
    println!("  2. Run: siteforge new my-site --user <userId>");
    println!("  3. Run: siteforge serve");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(dir: &std::path::Path, force: bool) -> Result<()> {
        init(
            InitArgs {
                data_dir: "sites".to_string(),
                force,
            },
            &dir.display().to_string(),
        )
    }

    #[test]
    fn test_init_writes_config_and_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path(), false).unwrap();

        assert!(dir.path().join("sites").is_dir());
        let config = Config::load(&dir.path().display().to_string()).unwrap();
        assert_eq!(config.data_dir, "sites");
    }

    #[test]
    fn test_init_keeps_existing_config_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_NAME);
        fs::write(&path, r#"{"port": 9000}"#).unwrap();

        run(dir.path(), false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"port": 9000}"#);

        run(dir.path(), true).unwrap();
        let config = Config::load(&dir.path().display().to_string()).unwrap();
        assert_eq!(config.port, 3030);
    }
}
