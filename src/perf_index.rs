// 🗂️ Performance Index - benchmark rows keyed by lower-cased manufacturer code
//
// The benchmark CSV leaves the part number blank for a good share of rows,
// so we try to recover it from the model text. Explicit codes always win.

use crate::model_code::longest_word;
use crate::rows::HddPerfRow;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

lazy_static! {
    static ref MODEL_CAPACITY: Regex = Regex::new(r" ([0-9.]+)TB$").unwrap();
}

/// Model text that needs a literal fix before we can read a code out of it
enum ModelCorrection {
    Replace(&'static str),
    Exclude,
}

fn correction_for(model: &str) -> Option<ModelCorrection> {
    match model {
        // Part number has a stray space in the CSV
        "ST310005 28AS" => Some(ModelCorrection::Replace("ST31000528AS")),
        // SSD listed with the hard drives
        "OCZ-AGILITY3" => Some(ModelCorrection::Exclude),
        _ => None,
    }
}

#[derive(Debug, Clone, Default)]
pub struct PerformanceIndex {
    by_code: HashMap<String, HddPerfRow>,
    brands: Vec<String>,
}

impl PerformanceIndex {
    pub fn build(rows: &[HddPerfRow]) -> Self {
        let mut by_code: HashMap<String, HddPerfRow> = HashMap::new();
        let mut brands = BTreeSet::new();
        let mut missing_code = Vec::new();

        for row in rows {
            if !row.brand.is_empty() {
                brands.insert(row.brand.to_lowercase());
            }
            if row.mfg_code.is_empty() {
                missing_code.push(row);
            } else {
                by_code.insert(row.mfg_code.to_lowercase(), row.clone());
            }
        }

        let mut inferred = 0;
        for row in missing_code {
            let Some(code) = infer_code(&row.model) else {
                continue;
            };
            if code.is_empty() || by_code.contains_key(&code) {
                continue;
            }
            let mut indexed = row.clone();
            indexed.mfg_code = code.clone();
            by_code.insert(code, indexed);
            inferred += 1;
        }

        debug!(
            rows = rows.len(),
            codes = by_code.len(),
            inferred,
            "built performance index"
        );

        PerformanceIndex {
            by_code,
            brands: brands.into_iter().collect(),
        }
    }

    /// Case-insensitive lookup by manufacturer code
    pub fn lookup(&self, code: &str) -> Option<&HddPerfRow> {
        self.by_code.get(&code.to_lowercase())
    }

    /// Sorted, de-duplicated, lower-cased brand names seen while building
    pub fn brands(&self) -> &[String] {
        &self.brands
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

/// Guess a lower-cased code from a model string. None means "never index this row".
fn infer_code(model: &str) -> Option<String> {
    if model.is_empty() {
        return None;
    }
    let stripped = MODEL_CAPACITY.replacen(model, 1, "");
    let model = match correction_for(&stripped) {
        Some(ModelCorrection::Exclude) => return None,
        Some(ModelCorrection::Replace(fixed)) => fixed.to_string(),
        None => stripped.into_owned(),
    };
    Some(longest_word(&model).to_lowercase())
}

// ============================================================================
// TESTS
// ============================================================================
