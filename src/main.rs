use anyhow::{Context, Result};
use flickr_uploadr::application::services::scheduler::Scheduler;
use flickr_uploadr::application::services::upload_service::UploadEngine;
use flickr_uploadr::config::Config;
use flickr_uploadr::session::browser::BrowserAuthorizer;
use flickr_uploadr::transport::http_client::FlickrHttpClient;
use flickr_uploadr::utils::logger::setup_logger;
use std::sync::Arc;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<()> {
    setup_logger();

    let config = Arc::new(Config::new());
    debug!("Loaded config: {}", config);

    let transport = Arc::new(FlickrHttpClient::new(&config).context("building http client")?);
    info!("Using {}", transport);

    let engine = UploadEngine::new(config.clone(), transport, BrowserAuthorizer::new());
    let mut scheduler = Scheduler::new(engine);

    let outcome = if config.schedule.daemon {
        scheduler.forever().await
    } else {
        scheduler.once().await
    };
    let totals = outcome.context("uploadr stopped")?;

    info!("Done: {}", totals);
    Ok(())
}
