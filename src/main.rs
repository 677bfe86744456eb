use std::path::Path;

use web_logger::{Config, Logger};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.yaml".to_string());

    let config = if Path::new(&path).exists() {
        Config::load_from_file(&path)?
    } else {
        Config::default()
    };

    let mut logger = Logger::from_config(&config);
    logger.init().await?;

    logger.log(&[&"Logging to ", &config.directory]);

    Ok(())
}
