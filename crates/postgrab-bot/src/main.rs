//! Bot process entrypoint.

use database::Database;
use extractor::{ImageExtractor, WebDriverConfig, WebDriverFetcher};
use postgrab_bot::config::BotConfig;
use postgrab_bot::delivery::DeliveryConfig;
use postgrab_bot::dispatch::Dispatcher;
use postgrab_bot::handler::UrlHandler;
use postgrab_bot::router::Router;
use postgrab_bot::sender::TelegramSender;
use telegram_api::{ApiConfig, TelegramClient};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    let client = TelegramClient::connect(ApiConfig::new(config.telegram_token.clone())).await?;

    let fetcher = WebDriverFetcher::new(WebDriverConfig::new(config.webdriver_url.clone()))?;
    let extractor = ImageExtractor::new(fetcher);

    let sender = TelegramSender::new(client.clone());
    let delivery = DeliveryConfig {
        send_delay: config.send_delay,
        ..Default::default()
    };
    let handler = UrlHandler::new(
        db.clone(),
        extractor,
        sender,
        config.daily_limit,
        delivery,
    );
    let router = Router::new(client.clone(), db, handler, config.daily_limit);

    info!("Starting LinkedIn image downloader bot");
    Dispatcher::new(client, router).run().await?;

    Ok(())
}
