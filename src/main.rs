use std::env;

use ugc_studio::logger::{self, LogLevel, LoggerConfig};
use ugc_studio::{server, Config};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env before reading any configuration.
    let dotenv_result = dotenv::dotenv();

    logger::init_with_config(LoggerConfig::development().with_level(LogLevel::Debug))
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    match dotenv_result {
        Ok(_) => log::info!("✅ .env file loaded successfully"),
        Err(_) => log::warn!("⚠️  No .env file found, using system environment variables"),
    }

    log::info!("🔍 Checking environment...");

    if env::var("GOOGLE_API_KEY").is_ok() {
        log::info!("✅ Google API key found");
    } else {
        log::error!("❌ GOOGLE_API_KEY is not set, image generation cannot start");
    }

    match (env::var("KLING_ACCESS_KEY"), env::var("KLING_SECRET_KEY")) {
        (Ok(_), Ok(_)) => log::info!("✅ Kling credentials found"),
        _ => log::warn!("⚠️  Kling credentials missing, video generation will be disabled"),
    }

    let config = Config::from_env();

    log::info!(
        "⚙️  Assets directory: {}",
        config.server.assets_dir_or_default()
    );
    logger::log_startup_info(
        "ugc-studio",
        env!("CARGO_PKG_VERSION"),
        config.server.port_or_default(),
    );

    server::run(config).await
}
