//! Initialize command.

use console::style;

use crate::config::{Config, Settings};

/// Initialize the data directory and write a starter config file.
pub async fn cmd_init(settings: &Settings) -> anyhow::Result<()> {
    settings.ensure_directories()?;

    let config_path = settings.data_dir.join("textlens.toml");
    if config_path.exists() {
        println!(
            "{} Config already exists: {}",
            style("!").yellow(),
            config_path.display()
        );
    } else {
        let starter = Config {
            ocr: crate::config::OcrConfig {
                endpoint: None,
                api_key: Some("your-ocr-api-key".to_string()),
                language: None,
            },
            store: crate::config::StoreConfig {
                url: Some("https://your-project.example.com".to_string()),
                api_key: Some("your-store-api-key".to_string()),
            },
            ..Config::default()
        };
        let toml = toml::to_string_pretty(&starter)?;
        tokio::fs::write(&config_path, toml).await?;
        println!(
            "  {} Wrote starter config: {}",
            style("✓").green(),
            config_path.display()
        );
    }

    println!(
        "{} Initialized textlens in {}",
        style("✓").green(),
        settings.data_dir.display()
    );

    Ok(())
}
