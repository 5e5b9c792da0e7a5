use anyhow::{anyhow, Context, Result};
use config::Config;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "LISTING_SEARCH";

const EMPTY_CONFIG: &str = r#"### listing-search configuration file

### base URL of the listings REST API
# api_base_url = "http://localhost:8000/api"

### results per page and debounce window for filter changes
# page_limit = 20
# debounce_ms = 500

### HTTP settings
# request_timeout_secs = 30
# user_agent = "listing-search/0.1"

### file holding persisted filters and contact settings
# state_file = "~/.listing-search/state.json"
"#;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Base URL of the listings API
    pub api_base_url: String,

    /// Results requested per page
    pub page_limit: u32,

    /// Quiet period after the last filter change before a search is sent
    pub debounce_ms: u64,

    pub request_timeout_secs: u64,

    pub user_agent: String,

    /// Where the file state store lives
    pub state_file: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api".to_string(),
            page_limit: 20,
            debounce_ms: 500,
            request_timeout_secs: 30,
            user_agent: format!("listing-search/{}", env!("CARGO_PKG_VERSION")),
            state_file: format!("{}/state.json", default_config_dir().display()),
        }
    }
}

fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".listing-search")
}

impl SearchConfig {
    /// Load configuration from a TOML file and `LISTING_SEARCH_*` variables.
    ///
    /// Without an explicit path, `~/.listing-search/config.toml` is used and
    /// created with commented defaults when missing.
    pub fn new(path: Option<&Path>) -> Result<SearchConfig> {
        let mut builder = Config::builder();

        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let dir = default_config_dir();
                std::fs::create_dir_all(&dir)
                    .with_context(|| format!("Unable to create {}", dir.display()))?;
                dir.join("config.toml")
            }
        };

        if path.exists() {
            builder = builder.add_source(config::File::from(path.as_path()));
        } else {
            std::fs::write(&path, EMPTY_CONFIG)
                .with_context(|| format!("Unable to create config file {}", path.display()))?;
        }

        // E.g. `LISTING_SEARCH_API_BASE_URL=https://api.example.com ./listing-search`
        builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX));

        let settings = builder
            .build()
            .map_err(|e| anyhow!("Failed to build configuration: {}", e))?;

        let mut config = settings
            .try_deserialize::<SearchConfig>()
            .map_err(|e| anyhow!("Failed to deserialize configuration: {}", e))?;

        config.state_file = expand_home(&config.state_file);
        if config.page_limit == 0 {
            return Err(anyhow!("page_limit must be at least 1"));
        }

        Ok(config)
    }

    pub fn state_path(&self) -> PathBuf {
        PathBuf::from(&self.state_file)
    }
}

fn expand_home(path: &str) -> String {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest).display().to_string(),
        _ => path.to_string(),
    }
}
