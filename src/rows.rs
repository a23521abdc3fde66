// 📦 Row Model - price rows, benchmark rows, and the merged rows we publish
//
// Each domain gets its own record type. Serialized key names match the
// published JSON format ("1-core/$", "$/capacity", ...).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// PRODUCT TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    Cpu,
    Hdd,
}

impl ProductType {
    /// Short code used in file names ("cpu", "hdd")
    pub fn code(&self) -> &'static str {
        match self {
            ProductType::Cpu => "cpu",
            ProductType::Hdd => "hdd",
        }
    }

    /// Human-readable name for display
    pub fn name(&self) -> &'static str {
        match self {
            ProductType::Cpu => "CPU",
            ProductType::Hdd => "HDD",
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ProductType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cpu" => Ok(ProductType::Cpu),
            "hdd" => Ok(ProductType::Hdd),
            other => Err(anyhow::anyhow!("Unknown product type: {}", other)),
        }
    }
}

// ============================================================================
// SOURCE ROWS
// ============================================================================

/// A product listing from the price-comparison site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    pub name: String,
    /// Currency formatted, e.g. "$1,234.56"
    pub price: String,
}

impl PriceRow {
    pub fn new(name: &str, price: &str) -> Self {
        PriceRow {
            name: name.to_string(),
            price: price.to_string(),
        }
    }
}

/// A CPU benchmark row. Any score may be missing from the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpuPerfRow {
    pub name: String,
    #[serde(rename = "1-core")]
    pub one_core: Option<f64>,
    #[serde(rename = "2-core")]
    pub two_core: Option<f64>,
    #[serde(rename = "8-core")]
    pub eight_core: Option<f64>,
    pub avg: Option<f64>,
    #[serde(rename = "user-rating")]
    pub user_rating: Option<f64>,
}

impl CpuPerfRow {
    /// Row with no scores yet
    pub fn named(name: &str) -> Self {
        CpuPerfRow {
            name: name.to_string(),
            one_core: None,
            two_core: None,
            eight_core: None,
            avg: None,
            user_rating: None,
        }
    }
}

/// A storage benchmark row from the benchmark CSV
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HddPerfRow {
    pub brand: String,
    /// Part number; empty when the CSV didn't carry one
    pub mfg_code: String,
    pub model: String,
    pub samples: u64,
    pub avg: f64,
}

impl HddPerfRow {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.brand, self.model).trim().to_string()
    }
}

// ============================================================================
// PARSED NAME PARTS
// ============================================================================

/// Structured guess at what a storage product name contains
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelCodeParts {
    /// Original, unmodified name
    pub name: String,
    pub brand: Option<String>,
    /// Cache size in MB
    pub cache: Option<u32>,
    /// Capacity in TB
    pub capacity: Option<f64>,
    /// Best guess at the manufacturer code; empty when nothing qualified
    pub mfg_code: String,
}

// ============================================================================
// MERGED ROWS
// ============================================================================

/// A price row joined with its CPU benchmark, plus value-for-money metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpuRow {
    pub name: String,
    pub price: String,
    #[serde(rename = "1-core")]
    pub one_core: Option<f64>,
    #[serde(rename = "2-core")]
    pub two_core: Option<f64>,
    #[serde(rename = "8-core")]
    pub eight_core: Option<f64>,
    pub avg: Option<f64>,
    #[serde(rename = "user-rating")]
    pub user_rating: Option<f64>,

    #[serde(rename = "1-core/$", default)]
    pub one_core_per_dollar: Option<f64>,
    #[serde(rename = "2-core/$", default)]
    pub two_core_per_dollar: Option<f64>,
    #[serde(rename = "8-core/$", default)]
    pub eight_core_per_dollar: Option<f64>,
    #[serde(rename = "avg/$", default)]
    pub avg_per_dollar: Option<f64>,
    #[serde(rename = "user-rating/$", default)]
    pub user_rating_per_dollar: Option<f64>,
}

impl CpuRow {
    /// Merge a benchmark row with a price row. The price row's name and price win.
    pub fn merge(perf: &CpuPerfRow, price: &PriceRow) -> Self {
        CpuRow {
            name: price.name.clone(),
            price: price.price.clone(),
            one_core: perf.one_core,
            two_core: perf.two_core,
            eight_core: perf.eight_core,
            avg: perf.avg,
            user_rating: perf.user_rating,
            one_core_per_dollar: None,
            two_core_per_dollar: None,
            eight_core_per_dollar: None,
            avg_per_dollar: None,
            user_rating_per_dollar: None,
        }
    }
}

/// A storage price row joined with its benchmark through the manufacturer code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HddRow {
    pub name: String,
    pub brand: Option<String>,
    pub cache: Option<u32>,
    pub capacity: Option<f64>,
    pub mfg_code: String,
    pub model: String,
    pub avg: f64,
    pub price: String,

    #[serde(rename = "avg/$", default)]
    pub avg_per_dollar: Option<f64>,
    #[serde(rename = "capacity/$", default)]
    pub capacity_per_dollar: Option<f64>,
    #[serde(rename = "$/capacity", default, skip_serializing_if = "Option::is_none")]
    pub dollars_per_capacity: Option<f64>,
}

impl HddRow {
    pub fn merge(parts: ModelCodeParts, perf: &HddPerfRow, price: &PriceRow) -> Self {
        HddRow {
            name: parts.name,
            brand: parts.brand,
            cache: parts.cache,
            capacity: parts.capacity,
            mfg_code: parts.mfg_code,
            model: perf.model.clone(),
            avg: perf.avg,
            price: price.price.clone(),
            avg_per_dollar: None,
            capacity_per_dollar: None,
            dollars_per_capacity: None,
        }
    }
}

// ============================================================================
// REPORT LABELS
// ============================================================================

/// Something the reporter can list by name
pub trait Named {
    fn label(&self) -> String;
}

impl Named for PriceRow {
    fn label(&self) -> String {
        self.name.clone()
    }
}

impl Named for CpuPerfRow {
    fn label(&self) -> String {
        self.name.clone()
    }
}

impl Named for HddPerfRow {
    fn label(&self) -> String {
        self.display_name()
    }
}

// ============================================================================
// TESTS
// ============================================================================
