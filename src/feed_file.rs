use std::{fs, io};
use std::path::Path;

use spdlog::info;

use crate::config::Config;
use crate::content::content_store::ContentStore;
use crate::content::dir_store::DirContentStore;
use crate::feed::render_feed_xml;

/// Static build of the feed. Returns the number of bytes written.
pub async fn write_feed_file(config: &Config, out_file: &Path) -> io::Result<usize> {
    let store = DirContentStore::new(config.paths.content_dir.clone());
    write_feed_from_store(config, &store, out_file).await
}

pub async fn write_feed_from_store(config: &Config, store: &dyn ContentStore, out_file: &Path) -> io::Result<usize> {
    let xml = render_feed_xml(config, store).await?;

    if let Some(parent) = out_file.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    if let Err(e) = fs::write(out_file, &xml) {
        return Err(io::Error::new(e.kind(), format!("Error writing feed to {}: {}", out_file.display(), e)));
    }

    info!("Feed written to {} ({} bytes)", out_file.display(), xml.len());
    Ok(xml.len())
}
