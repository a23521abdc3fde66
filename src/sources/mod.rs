// 🏗️ Data Sources - fetch raw pages and extract flat rows from them
//
// Two seams:
//   Fetcher    - url -> raw markup (HTTP, or files on disk for offline runs)
//   DataSource - which urls to fetch, and how to turn one page into rows
//
// Downloaded pages are cached on disk as <prefix>_<n><suffix> so a munge
// can be re-run without hitting the sites again.

pub mod pricespy;
pub mod userbenchmark;

pub use pricespy::PriceSpy;
pub use userbenchmark::{UserBenchmarkCpu, UserBenchmarkHdd};

use crate::config::Config;
use anyhow::{Context, Result};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

// ============================================================================
// FETCHERS
// ============================================================================

pub trait Fetcher {
    /// Return the raw markup (HTML or CSV) served at `url`
    fn fetch(&self, url: &str) -> Result<String>;
}

/// Plain blocking HTTP client
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(HttpFetcher { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        debug!(url, "fetching");
        let response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("Request failed: {}", url))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Could not download {} (HTTP {})", url, status);
        }

        response
            .text()
            .with_context(|| format!("Failed to read response body: {}", url))
    }
}

/// Reads "urls" as local paths (a leading file:// is ignored)
pub struct FileFetcher;

impl Fetcher for FileFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        let path = url.strip_prefix("file://").unwrap_or(url);
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
    }
}

// ============================================================================
// DATA SOURCE TRAIT
// ============================================================================

pub trait DataSource {
    type Row;

    /// Human-readable name for logs and errors
    fn name(&self) -> &str;

    /// Stem used in cached page file names ("pricespy", "userbenchmark")
    fn file_stem(&self) -> &str;

    /// Suffix of cached pages
    fn file_suffix(&self) -> &str {
        ".htm"
    }

    /// Urls for the first `pages` result pages
    fn page_urls(&self, pages: usize) -> Vec<String>;

    /// Download raw markup, one entry per page
    fn fetch(&self, fetcher: &dyn Fetcher, pages: usize) -> Result<Vec<String>> {
        let urls = self.page_urls(pages);
        let mut markup = Vec::with_capacity(urls.len());
        for url in &urls {
            let page = fetcher
                .fetch(url)
                .with_context(|| format!("{}: failed to fetch {}", self.name(), url))?;
            markup.push(page);
        }
        info!("{}: fetched {} page(s)", self.name(), markup.len());
        Ok(markup)
    }

    /// Turn one page of markup into rows
    fn extract_rows(&self, markup: &str) -> Result<Vec<Self::Row>>;

    /// Extract every page, in page order
    fn extract_all(&self, pages: &[String]) -> Result<Vec<Self::Row>> {
        let mut rows = Vec::new();
        for (i, page) in pages.iter().enumerate() {
            let page_rows = self
                .extract_rows(page)
                .with_context(|| format!("{}: failed to extract page {}", self.name(), i + 1))?;
            rows.extend(page_rows);
        }
        Ok(rows)
    }
}

// ============================================================================
// PAGE CACHE
// ============================================================================

/// e.g. pages/pricespy_cpu_20200314
pub fn page_prefix(cache_dir: &Path, stem: &str, product_code: &str, date_stamp: &str) -> PathBuf {
    cache_dir.join(format!("{}_{}_{}", stem, product_code, date_stamp))
}

/// <prefix>_<n><suffix>, n is 1-based
pub fn page_path(prefix: &Path, n: usize, suffix: &str) -> PathBuf {
    let mut name: OsString = prefix.as_os_str().to_owned();
    name.push(format!("_{}{}", n, suffix));
    PathBuf::from(name)
}

pub fn save_pages(prefix: &Path, suffix: &str, pages: &[String]) -> Result<Vec<PathBuf>> {
    if let Some(parent) = prefix.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let mut written = Vec::with_capacity(pages.len());
    for (i, page) in pages.iter().enumerate() {
        let path = page_path(prefix, i + 1, suffix);
        fs::write(&path, page).with_context(|| format!("Failed to write page: {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}

/// Read _1, _2, ... until the first missing page
pub fn load_pages(prefix: &Path, suffix: &str) -> Result<Vec<String>> {
    let mut pages = Vec::new();
    loop {
        let path = page_path(prefix, pages.len() + 1, suffix);
        if !path.exists() {
            break;
        }
        let page = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cached page: {}", path.display()))?;
        pages.push(page);
    }
    debug!(prefix = %prefix.display(), pages = pages.len(), "loaded cached pages");
    Ok(pages)
}

// ============================================================================
// TESTS
// ============================================================================
