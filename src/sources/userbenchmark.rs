// 📊 UserBenchmark - CPU scores from the HTML table, HDD scores from the CSV export

use super::DataSource;
use crate::config::Config;
use crate::error::MungeError;
use crate::rows::{CpuPerfRow, HddPerfRow};
use anyhow::Result;
use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashMap;
use tracing::{debug, warn};

const CPU_URL: &str = "https://cpu.userbenchmark.com/";
const HDD_CSV_URL: &str = "https://www.userbenchmark.com/resources/download/csv/HDD_UserBenchmarks.csv";

pub const CPUS_PER_PAGE: usize = 50;
pub const HDD_EXPECTED_HEADER: &str = "Type,Part Number,Brand,Model,Rank,Benchmark,Samples,URL";

lazy_static! {
    static ref PRODUCT_ROW: Selector = Selector::parse("tr.hovertarget").unwrap();
    static ref HEADER_CELL: Selector = Selector::parse("th").unwrap();
    static ref CELL: Selector = Selector::parse("td").unwrap();
    static ref LINK: Selector = Selector::parse("a").unwrap();
    static ref DIV: Selector = Selector::parse("div").unwrap();
}

// ============================================================================
// CPU (HTML)
// ============================================================================

/// Table columns we care about, keyed by the header's data-mhth attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CpuColumn {
    UserRating,
    Avg,
    OneCore,
    TwoCore,
    EightCore,
}

impl CpuColumn {
    fn from_header(concept: &str) -> Option<Self> {
        match concept {
            "MC_POPULARITY" => Some(CpuColumn::UserRating),
            "MC_BENCH" => Some(CpuColumn::Avg),
            "MCCPU_1CA" => Some(CpuColumn::OneCore),
            "MCCPU_2CA" => Some(CpuColumn::TwoCore),
            "MCCPU_8CA" => Some(CpuColumn::EightCore),
            _ => None,
        }
    }

    fn slot<'a>(&self, row: &'a mut CpuPerfRow) -> &'a mut Option<f64> {
        match self {
            CpuColumn::UserRating => &mut row.user_rating,
            CpuColumn::Avg => &mut row.avg,
            CpuColumn::OneCore => &mut row.one_core,
            CpuColumn::TwoCore => &mut row.two_core,
            CpuColumn::EightCore => &mut row.eight_core,
        }
    }
}

/// CPUs sorted by average effective speed
pub struct UserBenchmarkCpu;

impl UserBenchmarkCpu {
    pub fn new() -> Self {
        UserBenchmarkCpu
    }

    /// Map <th> positions to columns using the table that holds `first_row`
    fn column_indexes(first_row: ElementRef<'_>) -> HashMap<usize, CpuColumn> {
        let table = first_row
            .parent()
            .and_then(|body| body.parent())
            .and_then(ElementRef::wrap);
        let Some(table) = table else {
            return HashMap::new();
        };

        table
            .select(&HEADER_CELL)
            .enumerate()
            .filter_map(|(i, th)| {
                th.value()
                    .attr("data-mhth")
                    .and_then(CpuColumn::from_header)
                    .map(|column| (i, column))
            })
            .collect()
    }

    /// "<brand text> <a>model</a>": text before the second link, then the link text
    fn product_name(row: ElementRef<'_>) -> Option<String> {
        let link = row.select(&LINK).nth(1)?;
        let model: String = link.text().collect();

        let brand = match link.prev_sibling() {
            Some(node) => match node.value() {
                Node::Text(text) => text.trim().to_string(),
                Node::Element(_) => ElementRef::wrap(node)
                    .map(|el| el.text().collect::<String>().trim().to_string())
                    .unwrap_or_default(),
                _ => String::new(),
            },
            None => String::new(),
        };

        Some(format!("{} {}", brand, model.trim()).trim().to_string())
    }

    /// Score shown in a cell. Cells wrap the number in a div, sometimes with
    /// trend arrows around it or a percentile badge inside it.
    fn cell_value(cell: ElementRef<'_>) -> Option<f64> {
        let div = cell.select(&DIV).next()?;

        let direct_text = div.children().find_map(|child| match child.value() {
            Node::Text(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
            _ => None,
        });
        let text = direct_text.or_else(|| {
            div.children()
                .find_map(ElementRef::wrap)
                .map(|el| el.text().collect::<String>().trim().to_string())
        })?;

        match text.parse::<f64>() {
            Ok(value) => Some(value),
            Err(_) => {
                debug!(text = %text, "unparseable benchmark cell");
                None
            }
        }
    }
}

impl Default for UserBenchmarkCpu {
    fn default() -> Self {
        Self::new()
    }
}

impl DataSource for UserBenchmarkCpu {
    type Row = CpuPerfRow;

    fn name(&self) -> &str {
        "UserBenchmark CPU"
    }

    fn file_stem(&self) -> &str {
        "userbenchmark"
    }

    /// Later pages are loaded client-side, so only the first page has a url
    fn page_urls(&self, pages: usize) -> Vec<String> {
        if pages > 1 {
            warn!("{}: only the first page can be fetched over plain HTTP", self.name());
        }
        if pages == 0 {
            Vec::new()
        } else {
            vec![CPU_URL.to_string()]
        }
    }

    fn extract_rows(&self, markup: &str) -> Result<Vec<CpuPerfRow>> {
        let document = Html::parse_document(markup);
        let product_rows: Vec<ElementRef<'_>> = document.select(&PRODUCT_ROW).take(CPUS_PER_PAGE).collect();
        let Some(first) = product_rows.first() else {
            return Ok(Vec::new());
        };

        let columns = Self::column_indexes(*first);
        if columns.is_empty() {
            return Err(MungeError::malformed(self.name(), "no recognised score columns in table header").into());
        }

        let mut rows = Vec::with_capacity(product_rows.len());
        for product in &product_rows {
            let Some(name) = Self::product_name(*product) else {
                warn!("{}: skipping row without a product link", self.name());
                continue;
            };

            let mut row = CpuPerfRow::named(&name);
            for (i, cell) in product.select(&CELL).enumerate() {
                if let Some(column) = columns.get(&i) {
                    *column.slot(&mut row) = Self::cell_value(cell);
                }
            }
            rows.push(row);
        }

        Ok(rows)
    }
}

// ============================================================================
// HDD (CSV)
// ============================================================================

/// The HDD CSV export. Slow and under-sampled drives are filtered out here.
pub struct UserBenchmarkHdd {
    min_avg: f64,
    min_samples: u64,
}

impl UserBenchmarkHdd {
    pub fn new(min_avg: f64, min_samples: u64) -> Self {
        UserBenchmarkHdd { min_avg, min_samples }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.hdd_min_avg, config.hdd_min_samples)
    }

    fn malformed(&self, reason: String) -> anyhow::Error {
        MungeError::malformed(self.name(), reason).into()
    }
}

impl DataSource for UserBenchmarkHdd {
    type Row = HddPerfRow;

    fn name(&self) -> &str {
        "UserBenchmark HDD"
    }

    fn file_stem(&self) -> &str {
        "userbenchmark"
    }

    fn file_suffix(&self) -> &str {
        ".csv"
    }

    /// The whole catalog is one CSV download
    fn page_urls(&self, pages: usize) -> Vec<String> {
        if pages == 0 {
            Vec::new()
        } else {
            vec![HDD_CSV_URL.to_string()]
        }
    }

    fn extract_rows(&self, markup: &str) -> Result<Vec<HddPerfRow>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(markup.as_bytes());
        let mut records = reader.records();

        let header = match records.next() {
            Some(record) => record.map_err(|e| self.malformed(format!("unreadable header: {}", e)))?,
            None => return Err(self.malformed("empty CSV".to_string())),
        };
        let header_text = header.iter().collect::<Vec<_>>().join(",");
        if header.len() != 8 || header_text != HDD_EXPECTED_HEADER {
            return Err(self.malformed(format!(
                "expected header \"{}\" but got \"{}\"",
                HDD_EXPECTED_HEADER, header_text
            )));
        }

        let mut rows = Vec::new();
        let mut skipped = 0;
        for (line, record) in records.enumerate() {
            let line = line + 2;
            let record = record.map_err(|e| self.malformed(format!("line {}: {}", line, e)))?;
            let field = |i: usize| record.get(i).unwrap_or("").trim();

            let avg: f64 = field(5)
                .parse()
                .map_err(|_| self.malformed(format!("line {}: bad benchmark '{}'", line, field(5))))?;
            if avg < self.min_avg {
                skipped += 1;
                continue;
            }

            let samples: u64 = field(6)
                .parse()
                .map_err(|_| self.malformed(format!("line {}: bad sample count '{}'", line, field(6))))?;
            if samples < self.min_samples {
                skipped += 1;
                continue;
            }

            rows.push(HddPerfRow {
                brand: field(2).to_string(),
                mfg_code: field(1).to_string(),
                model: field(3).to_string(),
                samples,
                avg,
            });
        }

        debug!(kept = rows.len(), skipped, "{}: parsed CSV", self.name());
        Ok(rows)
    }
}

// ============================================================================
// TESTS
// ============================================================================
