// 💾 Output - persist enriched rows for the chart site
//
// Layout under the web directory:
//   price_performance_<type>_<YYYYMMDD>.json   the data
//   latest_<type>.js                          pointer the page loads first

use crate::rows::ProductType;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub fn data_file_name(product: ProductType, date_stamp: &str) -> String {
    format!("price_performance_{}_{}.json", product.code(), date_stamp)
}

pub fn latest_pointer_name(product: ProductType) -> String {
    format!("latest_{}.js", product.code())
}

fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create directory: {}", dir.display()))
}

/// Write rows as a JSON array, returning the path written
pub fn write_data_file<T: Serialize>(
    web_dir: &Path,
    product: ProductType,
    date_stamp: &str,
    rows: &[T],
) -> Result<PathBuf> {
    ensure_dir(web_dir)?;
    let path = web_dir.join(data_file_name(product, date_stamp));
    let json = serde_json::to_string(rows).context("Failed to serialize rows")?;
    fs::write(&path, json).with_context(|| format!("Failed to write data file: {}", path.display()))?;

    info!(path = %path.display(), rows = rows.len(), "wrote data file");
    Ok(path)
}

/// Point latest_<type>.js at the given data file
pub fn write_latest_pointer(web_dir: &Path, product: ProductType, data_file_name: &str) -> Result<PathBuf> {
    ensure_dir(web_dir)?;
    let path = web_dir.join(latest_pointer_name(product));
    let script = format!(
        "var LATEST_{}_DATA_FILE=\"{}\";",
        product.code().to_uppercase(),
        data_file_name
    );
    fs::write(&path, script).with_context(|| format!("Failed to write pointer file: {}", path.display()))?;
    Ok(path)
}

/// Newest data file for a product type. Date stamps sort lexicographically.
pub fn latest_data_file(web_dir: &Path, product: ProductType) -> Result<Option<PathBuf>> {
    if !web_dir.exists() {
        return Ok(None);
    }
    let prefix = format!("price_performance_{}_", product.code());

    let mut newest: Option<String> = None;
    for entry in fs::read_dir(web_dir).with_context(|| format!("Failed to list {}", web_dir.display()))? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.starts_with(&prefix) || !name.ends_with(".json") {
            continue;
        }
        if newest.as_ref().map_or(true, |current| name > *current) {
            newest = Some(name);
        }
    }

    Ok(newest.map(|name| web_dir.join(name)))
}

// ============================================================================
// TESTS
// ============================================================================
