// ⚖️ Reconciliation Engine - join price listings with benchmark listings
//
// Two strategies:
//   CpuReconciler - exact name match after canonicalization
//   HddReconciler - manufacturer code guessed from the name, looked up in an index
//
// Both produce matched rows plus an accounting of what didn't match.
// Output is always built fresh; the inputs are never mutated.

use crate::canonical::NameCanonicalizer;
use crate::model_code::ModelCodeExtractor;
use crate::perf_index::PerformanceIndex;
use crate::rows::{CpuPerfRow, CpuRow, HddPerfRow, HddRow, PriceRow};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use tracing::info;

// ============================================================================
// RECONCILIATION RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationResult<M, P> {
    /// Joined rows, ascending by price-row name
    pub matched: Vec<M>,

    /// Price rows with no benchmark counterpart, ascending by name
    pub orphan_price: Vec<PriceRow>,

    /// Benchmark rows nobody matched, ascending by name.
    /// Always empty for the storage strategy (the catalog is too large to be useful).
    pub orphan_perf: Vec<P>,
}

impl<M, P> ReconciliationResult<M, P> {
    pub fn is_complete(&self) -> bool {
        self.orphan_price.is_empty() && self.orphan_perf.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} matched, {} orphan price rows, {} orphan performance rows",
            self.matched.len(),
            self.orphan_price.len(),
            self.orphan_perf.len()
        )
    }
}

/// Common shape of both strategies
pub trait Reconciler {
    type Perf;
    type Merged;

    fn reconcile(
        &self,
        price_rows: &[PriceRow],
        perf_rows: &[Self::Perf],
    ) -> ReconciliationResult<Self::Merged, Self::Perf>;
}

fn sorted_by_name<T: Clone>(rows: &[T], name: impl Fn(&T) -> &str) -> Vec<T> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| name(a).cmp(name(b)));
    sorted
}

// ============================================================================
// EXACT MATCH (CPU)
// ============================================================================

pub struct CpuReconciler {
    canonicalizer: NameCanonicalizer,
}

impl CpuReconciler {
    pub fn new() -> Self {
        CpuReconciler {
            canonicalizer: NameCanonicalizer::new(),
        }
    }
}

impl Default for CpuReconciler {
    fn default() -> Self {
        Self::new()
    }
}

impl Reconciler for CpuReconciler {
    type Perf = CpuPerfRow;
    type Merged = CpuRow;

    /// Match each price row to the first unused benchmark row with the same canonical name
    ///
    /// Price rows are visited in reverse name order, so when two price rows
    /// canonicalize to the same key the later-sorting one gets the benchmark.
    fn reconcile(
        &self,
        price_rows: &[PriceRow],
        perf_rows: &[CpuPerfRow],
    ) -> ReconciliationResult<CpuRow, CpuPerfRow> {
        let prices = sorted_by_name(price_rows, |r| r.name.as_str());
        let perfs = sorted_by_name(perf_rows, |r| r.name.as_str());

        // name -> unused benchmark positions, ascending (first found wins)
        let mut available: HashMap<&str, VecDeque<usize>> = HashMap::new();
        for (i, perf) in perfs.iter().enumerate() {
            available.entry(perf.name.as_str()).or_default().push_back(i);
        }

        let mut price_used = vec![false; prices.len()];
        let mut perf_used = vec![false; perfs.len()];
        let mut matched = Vec::new();

        for (i, price) in prices.iter().enumerate().rev() {
            let key = self.canonicalizer.canonicalize(&price.name);
            let hit = available.get_mut(key.as_str()).and_then(|q| q.pop_front());
            if let Some(j) = hit {
                matched.push(CpuRow::merge(&perfs[j], price));
                price_used[i] = true;
                perf_used[j] = true;
            }
        }
        matched.reverse();

        let orphan_price = unused(prices, &price_used);
        let orphan_perf = unused(perfs, &perf_used);

        let result = ReconciliationResult {
            matched,
            orphan_price,
            orphan_perf,
        };
        info!("CPU reconciliation: {}", result.summary());
        result
    }
}

fn unused<T>(rows: Vec<T>, used: &[bool]) -> Vec<T> {
    rows.into_iter()
        .zip(used)
        .filter(|(_, used)| !**used)
        .map(|(row, _)| row)
        .collect()
}

// ============================================================================
// FUZZY MATCH (HDD)
// ============================================================================

pub struct HddReconciler {
    extractor: ModelCodeExtractor,
}

impl HddReconciler {
    pub fn new() -> Self {
        HddReconciler {
            extractor: ModelCodeExtractor::new(),
        }
    }
}

impl Default for HddReconciler {
    fn default() -> Self {
        Self::new()
    }
}

impl Reconciler for HddReconciler {
    type Perf = HddPerfRow;
    type Merged = HddRow;

    /// Match each price row through its guessed manufacturer code.
    /// One benchmark row may back several price rows.
    fn reconcile(
        &self,
        price_rows: &[PriceRow],
        perf_rows: &[HddPerfRow],
    ) -> ReconciliationResult<HddRow, HddPerfRow> {
        let prices = sorted_by_name(price_rows, |r| r.name.as_str());
        let index = PerformanceIndex::build(perf_rows);

        let mut price_used = vec![false; prices.len()];
        let mut matched = Vec::new();

        for (i, price) in prices.iter().enumerate().rev() {
            let parts = self.extractor.extract_parts(&price.name);
            if parts.mfg_code.is_empty() {
                continue;
            }
            if let Some(perf) = index.lookup(&parts.mfg_code) {
                matched.push(HddRow::merge(parts, perf, price));
                price_used[i] = true;
            }
        }
        matched.reverse();

        let result = ReconciliationResult {
            matched,
            orphan_price: unused(prices, &price_used),
            orphan_perf: Vec::new(),
        };
        info!("HDD reconciliation: {}", result.summary());
        result
    }
}

// ============================================================================
// TESTS
// ============================================================================
