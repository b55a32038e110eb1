pub mod config;
pub mod content;
pub mod excerpt;
pub mod feed;
pub mod feed_file;
pub mod logger;
pub mod server;
pub mod slug;
mod test_data;
mod text_utils;
pub mod view;
