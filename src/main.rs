use teloxide::Bot;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use ytgram::bot;
use ytgram::config::Config;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("startup failed: {e}");
            std::process::exit(1);
        }
    };

    info!(api_id = config.api_id, "configuration loaded");
    let bot = Bot::new(config.bot_token.clone());
    bot::run(bot, config).await;
}
