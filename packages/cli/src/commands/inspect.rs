use super::{open_documents, runtime};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use siteforge_common::DocumentKey;
use siteforge_editor::{load_site, Site, HOME_PAGE_ID};

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Id of the site to show
    pub site_id: String,

    /// Owner of the site
    #[arg(short, long)]
    pub user: String,
}

pub fn inspect(args: InspectArgs, cwd: &str) -> Result<()> {
    let documents = open_documents(cwd)?;
    let key = DocumentKey::new(args.user, args.site_id);
    key.validate()?;

    let site = runtime()?.block_on(load_site(&documents, &key))?;
    print!("{}", summarize(&site));
    Ok(())
}

/// Pages and element counts, home page first
fn summarize(site: &Site) -> String {
    let mut out = format!("{} {}\n", site.name.bright_white().bold(), format!("({})", site.id).dimmed());

    if let Some(url) = &site.published_url {
        out.push_str(&format!("  Published: {}\n", url.cyan()));
    }
    if let Some(at) = &site.last_published_at {
        out.push_str(&format!("  Last published: {}\n", at));
    }

    let home = site.pages.get(HOME_PAGE_ID).map(|page| (HOME_PAGE_ID, page));
    let others = site.pages.iter().filter(|(id, _)| id.as_str() != HOME_PAGE_ID);

    out.push_str(&format!("  Pages: {}\n", site.pages.len()));
    for (id, page) in home.into_iter().chain(others.map(|(id, page)| (id.as_str(), page))) {
        out.push_str(&format!(
            "    {} {} - {} elements\n",
            "•".green(),
            id,
            page.elements.len()
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use siteforge_editor::{Element, Page};

    #[test]
    fn test_summary_lists_home_first() {
        colored::control::set_override(false);

        let mut site = Site::new("shop");
        site.pages.insert("about".to_string(), Page::new("about", "About"));
        site.pages
            .get_mut(HOME_PAGE_ID)
            .unwrap()
            .elements
            .push(Element::new("text-1", "text"));

        let summary = summarize(&site);
        let lines: Vec<_> = summary.lines().collect();

        assert_eq!(lines[0], "New Site (shop)");
        assert_eq!(lines[1], "  Pages: 2");
        assert_eq!(lines[2], "    • home - 1 elements");
        assert_eq!(lines[3], "    • about - 0 elements");
    }
}
