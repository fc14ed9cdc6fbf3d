//! Validate configuration command.

use anyhow::Result;
use quantfolio_config::load_config;
use std::path::Path;

pub async fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    };

    if let Err(e) = config.validate() {
        println!("Configuration error: {}", e);
        return Err(e.into());
    }

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!("Symbols: {}", config.universe().symbols().join(", "));
    match &config.data.base_url {
        Some(url) => println!("Static source: {}", url),
        None => println!("Static source: {}/", config.data.static_dir),
    }
    println!("Rows per file: {}", config.data.max_rows);
    println!("Window: {}", config.data.window);
    println!("Source timeout: {}s", config.data.source_timeout_secs);
    println!(
        "Fallback: {} rows from {}{}",
        config.fallback.rows,
        config.fallback.start_date,
        config
            .fallback
            .seed
            .map(|s| format!(", seed {}", s))
            .unwrap_or_default()
    );

    Ok(())
}
