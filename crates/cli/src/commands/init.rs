//! Initialize quizgate.toml configuration

use anyhow::Result;
use quizgate_core::config::CONFIG_FILENAME;
use quizgate_core::QuizgateConfig;
use std::path::Path;

pub fn run(path: Option<&Path>) -> Result<()> {
    let target_path = path.unwrap_or_else(|| Path::new("."));
    let config_path = target_path.join(CONFIG_FILENAME);

    if config_path.exists() {
        println!("⚠️  {} already exists at {:?}", CONFIG_FILENAME, config_path);
        return Ok(());
    }

    let config = QuizgateConfig::default();
    config.save(&config_path)?;

    println!("✅ Created {} at {:?}", CONFIG_FILENAME, config_path);
    println!("\nSet [backend] url and anon_key, then run:");
    println!("  quizgate status");

    Ok(())
}
