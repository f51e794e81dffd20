//! Configuration file parsing for quizgate.toml

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::quiz::DEFAULT_IMAGE_BASE_URL;

pub const CONFIG_FILENAME: &str = "quizgate.toml";

/// Main configuration structure for quizgate.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizgateConfig {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub checkout: CheckoutConfig,

    #[serde(default)]
    pub quiz: QuizConfig,

    #[serde(default)]
    pub admin: AdminConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Project URL, e.g. `https://<ref>.supabase.co`; QUIZGATE_BACKEND_URL overrides it
    #[serde(default)]
    pub url: String,

    /// Public anon key; QUIZGATE_ANON_KEY overrides it
    #[serde(default)]
    pub anon_key: String,

    /// HTTP timeout per request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// Provider public key id
    #[serde(default = "default_key_id")]
    pub key_id: String,

    #[serde(default = "default_script_url")]
    pub script_url: String,

    /// Amount in minor currency units (paise)
    #[serde(default = "default_amount")]
    pub amount: u64,

    #[serde(default = "default_currency")]
    pub currency: String,

    /// Merchant display name
    #[serde(default = "default_merchant_name")]
    pub name: String,

    #[serde(default = "default_description")]
    pub description: String,

    #[serde(default = "default_theme_color")]
    pub theme_color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizConfig {
    /// Question images live at `<image_base_url>/<id>.png`
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Hex SHA-256 of the admin password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_sha256: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Overrides the local storage file (default: ~/.config/quizgate/local.json)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

// Default functions
fn default_timeout_secs() -> u64 {
    10
}

fn default_key_id() -> String {
    "rzp_test_9999999999".to_string()
}

fn default_script_url() -> String {
    "https://checkout.razorpay.com/v1/checkout.js".to_string()
}

fn default_amount() -> u64 {
    29900
}

fn default_currency() -> String {
    "INR".to_string()
}

fn default_merchant_name() -> String {
    "Test Sagar".to_string()
}

fn default_description() -> String {
    "Premium Access - 30 Days".to_string()
}

fn default_theme_color() -> String {
    "#3B82F6".to_string()
}

fn default_image_base_url() -> String {
    DEFAULT_IMAGE_BASE_URL.to_string()
}

impl Default for QuizgateConfig {
    fn default() -> Self {
        toml::from_str("").expect("empty TOML should parse to defaults")
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            key_id: default_key_id(),
            script_url: default_script_url(),
            amount: default_amount(),
            currency: default_currency(),
            name: default_merchant_name(),
            description: default_description(),
            theme_color: default_theme_color(),
        }
    }
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            image_base_url: default_image_base_url(),
        }
    }
}

impl QuizgateConfig {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: QuizgateConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Find and load quizgate.toml from the given directory or ancestors
    pub fn find_and_load(start_dir: &Path) -> Result<Self> {
        let mut current = start_dir;

        loop {
            let config_path = current.join(CONFIG_FILENAME);
            if config_path.exists() {
                return Self::from_file(&config_path);
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }

        // No config found, use defaults
        Ok(Self::default())
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Apply `QUIZGATE_BACKEND_URL` / `QUIZGATE_ANON_KEY` over file values
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var("QUIZGATE_BACKEND_URL").ok(),
            std::env::var("QUIZGATE_ANON_KEY").ok(),
        );
    }

    pub fn apply_overrides(&mut self, url: Option<String>, anon_key: Option<String>) {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.backend.url = url;
        }
        if let Some(key) = anon_key.filter(|k| !k.trim().is_empty()) {
            self.backend.anon_key = key;
        }
    }
}
