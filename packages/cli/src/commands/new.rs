use super::{open_documents, runtime};
use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use siteforge_common::{DocumentKey, DocumentStore};
use siteforge_editor::Site;

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Id of the site to create
    pub site_id: String,

    /// Owner of the site
    #[arg(short, long)]
    pub user: String,

    /// Display name
    #[arg(short, long)]
    pub name: Option<String>,
}

pub fn new_site(args: NewArgs, cwd: &str) -> Result<()> {
    let documents = open_documents(cwd)?;
    let key = DocumentKey::new(args.user, args.site_id);
    key.validate()?;

    let mut site = Site::new(key.site_id.clone());
    if let Some(name) = args.name {
        site.name = name;
    }

    runtime()?.block_on(async {
        if documents.get(&key).await?.is_some() {
            bail!("site {} already exists for user {}", key.site_id, key.user_id);
        }
        documents.set(&key, site.to_json()?).await?;
        Ok::<_, anyhow::Error>(())
    })?;

    println!(
        "{} Created site {} ({}) for {}",
        "✓".green(),
        key.site_id.bright_white(),
        site.name,
        key.user_id
    );
    Ok(())
}
