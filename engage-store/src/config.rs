use config::{Config, ConfigError, File};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
pub struct Database {
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct Reports {
    pub top_limit: usize,
}

#[derive(Debug, Default, Deserialize)]
pub struct Seed {
    /// JSON file of activity records; the bundled sample is used when unset
    pub path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub database: Database,
    pub reports: Reports,
    #[serde(default)]
    pub seed: Seed,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        // 1. Optional settings.toml
        let config_file_name = "settings.toml";

        // Check in current directory
        let current_dir_path = PathBuf::from(config_file_name);
        if current_dir_path.exists() {
            builder = builder.add_source(File::from(current_dir_path).required(false));
        }

        // Check in engage-seed directory (for development)
        let dev_path = PathBuf::from("engage-seed").join(config_file_name);
        if dev_path.exists() {
            builder = builder.add_source(File::from(dev_path).required(false));
        }

        builder = builder
            .set_default("database.path", "engage.db")?
            .set_default("reports.top_limit", 10)?;

        // 2. Environment variables (highest priority)
        if let Ok(db_path) = std::env::var("DATABASE_PATH") {
            builder = builder.set_override("database.path", db_path)?;
        }
        if let Ok(limit) = std::env::var("TOP_LIMIT") {
            builder = builder.set_override("reports.top_limit", limit)?;
        }
        if let Ok(seed_path) = std::env::var("SEED_PATH") {
            builder = builder.set_override("seed.path", seed_path)?;
        }

        let s = builder.build()?;
        s.try_deserialize()
    }
}
