use std::env;

use anyhow::{Context, Result};

/// Everything the bot reads from its environment.
#[derive(Debug, Clone)]
pub(crate) struct BotConfig {
    pub bot_token: String,
    pub discord_channel_id: String,
    pub cau_website_url: String,
    pub cau_api_url: String,
    pub library_website_url: String,
    pub library_api_url: String,
}

/// Load configuration from environment variables, failing fast on the first
/// missing one.
pub(crate) fn load_config() -> Result<BotConfig> {
    Ok(BotConfig {
        bot_token: require("DISCORD_BOT_TOKEN")?,
        discord_channel_id: require("DISCORD_CHANNEL_ID")?,
        cau_website_url: require("CAU_WEBSITE_URL")?,
        cau_api_url: require("CAU_API_URL")?,
        library_website_url: require("CAU_LIBRARY_WEBSITE_URL")?,
        library_api_url: require("CAU_LIBRARY_API_URL")?,
    })
}

fn require(name: &str) -> Result<String> {
    env::var(name).with_context(|| format!("missing required environment variable {name}"))
}
