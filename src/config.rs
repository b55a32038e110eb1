use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::Deserialize;

use crate::content::content_store::BLOG_COLLECTION;
use crate::feed::DEFAULT_FEED_LIMIT;

/// Channel metadata of the feed
#[derive(Deserialize)]
pub struct Site {
    pub title: String,
    pub description: String,
    pub url: String,
}

#[derive(Deserialize)]
pub struct Paths {
    /// Holds one directory per collection
    pub content_dir: PathBuf,
}

#[derive(Deserialize)]
pub struct FeedSettings {
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_item_limit")]
    pub item_limit: usize,
}

impl Default for FeedSettings {
    fn default() -> Self {
        FeedSettings {
            collection: default_collection(),
            item_limit: default_item_limit(),
        }
    }
}

fn default_collection() -> String {
    BLOG_COLLECTION.to_string()
}

fn default_item_limit() -> usize {
    DEFAULT_FEED_LIMIT
}

#[derive(Deserialize)]
pub struct Server {
    pub address: String,
    pub port: u16,
}

#[derive(Deserialize)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Copy, Clone, Debug, PartialEq)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize)]
pub struct Config {
    pub site: Site,
    pub paths: Paths,
    #[serde(default)]
    pub feed: FeedSettings,
    pub server: Server,
    pub log: Option<Log>,
}

fn parse_path(path: PathBuf) -> io::Result<PathBuf> {
    match path.to_str() {
        Some(str_path) if str_path.starts_with("${exe_dir}") => {
            let cur_exe = env::current_exe()?;
            let Some(exe_dir) = cur_exe.parent().and_then(|dir| dir.to_str()) else {
                return Err(io::Error::new(ErrorKind::NotFound, "Could not resolve the executable directory"));
            };
            Ok(PathBuf::from(str_path.replace("${exe_dir}", exe_dir)))
        }
        _ => Ok(path.clone()),
    }
}

pub fn parse_config(cfg_content: &str) -> io::Result<Config> {
    let mut cfg: Config = match toml::from_str::<Config>(cfg_content) {
        Ok(cfg) => cfg,
        Err(e) => return Err(io::Error::new(
            ErrorKind::InvalidData, format!("Error parsing configuration file: {}", e))),
    };

    cfg.paths = Paths {
        content_dir: parse_path(cfg.paths.content_dir)?,
    };

    Ok(cfg)
}

pub fn read_config(cfg_path: &Path) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error opening configuration file {}: {}", cfg_path.display(), e))),
    };

    parse_config(&cfg_content)
}
