use std::io;
use std::sync::Arc;

use ntex::web;
use spdlog::{error, info};

use crate::config::Config;
use crate::content::content_store::{ContentStore, StaticContentStore};
use crate::content::dir_store::DirContentStore;
use crate::feed::render_feed_xml;

pub struct AppState {
    pub config: Config,
    pub store: Box<dyn ContentStore>,
}

#[web::get("/feed.xml")]
async fn feed(state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    match render_feed_xml(&state.config, &*state.store).await {
        Ok(xml) => web::HttpResponse::Ok()
            .content_type("application/xml")
            .body(xml),
        Err(e) => {
            error!("Error generating feed: {}", e);
            web::HttpResponse::InternalServerError()
                .content_type("text/plain; charset=utf-8")
                .body(format!("Error generating feed: {}", e))
        }
    }
}

/// Reads the collection from disk once. Changed posts are picked up on restart.
pub fn load_store(config: &Config) -> io::Result<StaticContentStore> {
    let dir_store = DirContentStore::new(config.paths.content_dir.clone());
    let store = StaticContentStore::snapshot(&dir_store, &config.feed.collection)?;
    info!("Loaded {} posts of {} from {}", store.len(), config.feed.collection, dir_store.root_dir.display());
    Ok(store)
}

pub async fn server_run(config: Config) -> io::Result<()> {
    let store = load_store(&config)?;

    let bind_addr = config.server.address.clone();
    let bind_port = config.server.port;
    let app_state = Arc::new(AppState {
        config,
        store: Box::new(store),
    });

    web::HttpServer::new(move || {
        web::App::new()
            .state(app_state.clone())
            .service(feed)
    })
        .bind((bind_addr, bind_port))?
        .run()
        .await
}
