use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vocab_trainer::bot::{schema, Command};
use vocab_trainer::config::{BotConfig, LogFormat, StorageBackend};
use vocab_trainer::db::PgSessionStore;
use vocab_trainer::localization::init_localization;
use vocab_trainer::session_store::{JsonFileSessionStore, SessionStore};
use vocab_trainer::trainer::Trainer;
use vocab_trainer::translation::ReversoGateway;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config = BotConfig::from_env()?;
    init_tracing(config.log_format);

    info!("Starting Vocabulary Trainer Telegram Bot");

    init_localization()?;

    let store: Arc<dyn SessionStore> = match &config.storage {
        StorageBackend::File(path) => {
            info!(path = %path.display(), "Using JSON file session store");
            Arc::new(JsonFileSessionStore::new(path.clone()))
        }
        StorageBackend::Postgres(url) => {
            info!("Using PostgreSQL session store");
            Arc::new(PgSessionStore::connect(url).await?)
        }
    };

    let gateway = Arc::new(ReversoGateway::new(&config.trainer.gateway)?);
    let trainer = Arc::new(Trainer::new(store, gateway, config.trainer.clone()));

    let bot = Bot::new(config.bot_token);
    bot.set_my_commands(Command::bot_commands()).await?;

    info!("Bot initialized, starting dispatcher");

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![trainer])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
