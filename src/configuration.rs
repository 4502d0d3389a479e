use std::{path::Path, time::Duration};

use serde::Deserialize;
use serde_aux::field_attributes::{
    deserialize_bool_from_anything, deserialize_number_from_string,
};

use crate::domain::selector::SelectorConfig;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub webdriver: WebDriverSettings,
    pub scrape: ScrapeSettings,
    pub output: OutputSettings,
    pub selectors: SelectorConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebDriverSettings {
    pub url: String,
    #[serde(deserialize_with = "deserialize_bool_from_anything")]
    pub headless: bool,
    pub user_agent: Option<String>,
    #[serde(deserialize_with = "deserialize_bool_from_anything")]
    pub random_user_agent: bool,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub window_width: u32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub window_height: u32,
    pub extra_args: Vec<String>,
    pub proxy: Option<String>,
}

impl Default for WebDriverSettings {
    fn default() -> Self {
        WebDriverSettings {
            url: "http://localhost:4444".to_string(),
            headless: false,
            user_agent: Some(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                    .to_string(),
            ),
            random_user_agent: false,
            window_width: 1366,
            window_height: 768,
            extra_args: [
                "--no-sandbox",
                "--disable-blink-features=AutomationControlled",
                "--disable-web-security",
                "--disable-features=VizDisplayCompositor",
                "--disable-infobars",
                "--ignore-certificate-errors",
            ]
            .iter()
            .map(|a| a.to_string())
            .collect(),
            proxy: None,
        }
    }
}

/// Timing and bounds for one scrape run. All durations are milliseconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScrapeSettings {
    pub base_url: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub navigation_timeout_ms: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub initial_settle_ms: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub results_timeout_ms: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_scroll_attempts: usize,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub stall_limit: usize,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub scroll_settle_ms: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub scroll_delta: i64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub detail_settle_ms: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub title_timeout_ms: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub image_settle_ms: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_reviews: usize,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub review_scroll_attempts: usize,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub review_scroll_settle_ms: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub review_scroll_delta: i64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub review_tab_settle_ms: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub review_focus_settle_ms: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub jitter_min_ms: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub jitter_max_ms: u64,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        ScrapeSettings {
            base_url: "https://www.google.com/maps".to_string(),
            navigation_timeout_ms: 60_000,
            initial_settle_ms: 3_000,
            results_timeout_ms: 15_000,
            max_scroll_attempts: 20,
            stall_limit: 3,
            scroll_settle_ms: 1_000,
            scroll_delta: 10_000,
            detail_settle_ms: 3_000,
            title_timeout_ms: 5_000,
            image_settle_ms: 1_000,
            max_reviews: 20,
            review_scroll_attempts: 5,
            review_scroll_settle_ms: 1_500,
            review_scroll_delta: 1_000,
            review_tab_settle_ms: 2_000,
            review_focus_settle_ms: 1_000,
            jitter_min_ms: 0,
            jitter_max_ms: 0,
        }
    }
}

pub fn millis(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub reviews_dir: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        OutputSettings {
            reviews_dir: "scraped_data".to_string(),
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path =
        std::env::current_dir().map_err(|e| config::ConfigError::Foreign(Box::new(e)))?;

    configuration_from(&base_path.join("configuration"))
}

/// Reads `base.yaml` from `configuration_directory` if present, then `APP_*`
/// environment overrides.
pub fn configuration_from(configuration_directory: &Path) -> Result<Settings, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")).required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
