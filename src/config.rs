// ⚙️ Configuration + Run Context
//
// Config is JSON on disk, every field optional. The RunContext is built once
// per run and passed down; nothing reads ambient globals.

use crate::rows::ProductType;
use anyhow::{Context as AnyhowContext, Result};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info_span, Span};
use tracing_subscriber::EnvFilter;

pub const DEFAULT_CONFIG_FILE: &str = "price-performance.json";

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

// ============================================================================
// CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where data files and the latest_<type>.js pointers are written
    pub web_dir: PathBuf,

    /// Where downloaded pages are cached between download and munge
    pub cache_dir: PathBuf,

    /// Price-site result pages to download (24 products per page)
    pub cpu_price_pages: usize,
    pub hdd_price_pages: usize,

    /// Benchmark-site result pages to download (50 CPUs per page)
    pub cpu_benchmark_pages: usize,

    /// Storage benchmark rows below this average are dropped (mostly 5400 rpm drives)
    pub hdd_min_avg: f64,

    /// Storage benchmark rows with fewer samples are dropped
    pub hdd_min_samples: u64,

    pub request_timeout_secs: u64,
    pub user_agent: String,

    /// tracing filter directive, overridden by RUST_LOG
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            web_dir: PathBuf::from("web"),
            cache_dir: PathBuf::from("pages"),
            cpu_price_pages: 2,
            hdd_price_pages: 3,
            cpu_benchmark_pages: 1,
            hdd_min_avg: 42.0,
            hdd_min_samples: 12,
            request_timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load config from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config JSON: {:?}", path.as_ref()))
    }

    /// Load config if the file exists, otherwise fall back to defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            Ok(Config::default())
        }
    }

    pub fn price_pages(&self, product: ProductType) -> usize {
        match product {
            ProductType::Cpu => self.cpu_price_pages,
            ProductType::Hdd => self.hdd_price_pages,
        }
    }
}

// ============================================================================
// RUN CONTEXT
// ============================================================================

/// Config, product and run date for one download/munge run, plus the span
/// its logging happens under
#[derive(Debug, Clone)]
pub struct RunContext {
    pub config: Config,
    pub product: ProductType,
    pub date: NaiveDate,
    pub span: Span,
}

impl RunContext {
    pub fn new(config: Config, product: ProductType) -> Self {
        Self::for_date(config, product, Local::now().date_naive())
    }

    pub fn for_date(config: Config, product: ProductType, date: NaiveDate) -> Self {
        let span = info_span!("run", product = product.code(), date = %date.format("%Y%m%d"));
        RunContext {
            config,
            product,
            date,
            span,
        }
    }

    /// Date stamp used in file names, e.g. "20200314"
    pub fn date_stamp(&self) -> String {
        self.date.format("%Y%m%d").to_string()
    }
}

/// Install the global tracing subscriber. RUST_LOG wins over the configured level.
pub fn init_logging(level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .with_context(|| format!("Invalid log level: {}", level))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install logger: {}", e))
}

// ============================================================================
// TESTS
// ============================================================================
