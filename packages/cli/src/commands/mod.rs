pub mod init;
pub mod inspect;
pub mod new;
pub mod serve;

pub use init::{init, InitArgs};
pub use inspect::{inspect, InspectArgs};
pub use new::{new_site, NewArgs};
pub use serve::{serve, ServeArgs};

use crate::config::Config;
use siteforge_common::FileDocumentStore;

/// Document store rooted at the configured data directory
fn open_documents(cwd: &str) -> anyhow::Result<FileDocumentStore> {
    let config = Config::load(cwd)?;
    Ok(FileDocumentStore::new(config.get_data_dir(cwd)))
}

fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?)
}
