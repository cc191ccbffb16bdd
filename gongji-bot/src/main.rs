//! One-shot Discord bot that checks CAU bulletin notices and reports the
//! fresh ones. Meant to run from a daily scheduler around 08:00 KST.

mod config;
mod discord;

use std::sync::Arc;

use anyhow::Result;
use gongji_core::{service::NoticeService, window::KstClock};
use gongji_source_cau::CauSource;
use gongji_source_library::LibrarySource;
use reqwest::Client;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // .env for local development; absent in CI.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_unset| EnvFilter::new("info")))
        .init();

    let config = config::load_config()?;

    // No client-wide timeout: the CAU request is deliberately unbounded, and
    // the library port applies its own per-request limit.
    let client = Client::builder().user_agent("gongji/0.1").build()?;

    let primary = Arc::new(CauSource::new(
        client.clone(),
        config.cau_website_url.clone(),
        config.cau_api_url.clone(),
    ));
    let secondary = Arc::new(LibrarySource::new(
        client.clone(),
        config.library_website_url.clone(),
        config.library_api_url.clone(),
    ));
    let service = NoticeService::new(Arc::new(KstClock), primary, secondary);

    let (cau_notices, library_notices) = service.check_notices().await?;
    tracing::info!(
        cau = cau_notices.len(),
        library = library_notices.len(),
        "collected fresh notices"
    );

    let all_notices: Vec<_> = cau_notices.into_iter().chain(library_notices).collect();

    discord::send_notices(&client, &config, &all_notices).await
}
