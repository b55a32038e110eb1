use std::fs;
use std::io;
use std::path::Path;

const CONFIG_SAMPLE: &str = r#"[site]
title = "My blog"
description = "Posts about the things I build"
url = "https://www.example.com"

# For the file locations, If you want it to be relative to the executable directory
# use ${exe_dir}/location
[paths]
content_dir = "content"

# Posts are read from content_dir/collection
[feed]
collection = "blog"
item_limit = 10

[server]
address = "0.0.0.0"
port = 4321

[log]
level = "Info"
log_to_console = true
"#;

pub(crate) fn write_sample_cfg(file_path: &Path) -> io::Result<()> {
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(file_path, CONFIG_SAMPLE)
}
