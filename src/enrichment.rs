// 💲 Metrics Enricher - performance per dollar (and dollars per unit) on merged rows
//
// Each merged row type declares which attributes get a "<attr>/$" metric and
// which also get the inverse "$/<attr>". Rounding:
//   <attr>/$  -> 3 decimal places
//   $/<attr>  -> 2 decimal places
//   avg       -> 1 decimal place, in place
//
// A zero price is not guarded: the metric comes out infinite or NaN.

use crate::error::MungeError;
use crate::rows::{CpuRow, HddRow};
use tracing::debug;

/// A declared metric: the attribute value, where its per-dollar value goes,
/// and (optionally) where its dollars-per-unit value goes.
pub struct Metric<'a> {
    pub attribute: &'static str,
    pub value: Option<f64>,
    pub per_dollar: &'a mut Option<f64>,
    pub inverse: Option<&'a mut Option<f64>>,
}

/// Merged rows that can carry value-for-money metrics
pub trait PricePerformance {
    fn name(&self) -> &str;
    fn price(&self) -> &str;

    /// Attributes to enrich, in output order
    fn metrics(&mut self) -> Vec<Metric<'_>>;

    fn round_avg(&mut self);
}

/// Round to the given number of decimal places, ties to even
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round_ties_even() / factor
}

/// "$1,099.00" -> 1099.0
pub fn parse_price(name: &str, price: &str) -> Result<f64, MungeError> {
    let cleaned: String = price.chars().filter(|c| *c != '$' && *c != ',').collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Err(MungeError::MissingPrice {
            name: name.to_string(),
        });
    }
    cleaned.parse::<f64>().map_err(|_| MungeError::InvalidPrice {
        name: name.to_string(),
        price: price.to_string(),
    })
}

/// Enrich every row in order, stopping at the first row without a usable price.
/// Rows before the failing one keep their metrics.
pub fn enrich<R: PricePerformance>(rows: &mut [R]) -> Result<(), MungeError> {
    for row in rows.iter_mut() {
        enrich_row(row)?;
    }
    Ok(())
}

pub fn enrich_row<R: PricePerformance>(row: &mut R) -> Result<(), MungeError> {
    let price = parse_price(row.name(), row.price())?;
    let row_name = row.name().to_string();

    for metric in row.metrics() {
        match metric.value {
            Some(value) => {
                *metric.per_dollar = Some(round_to(value / price, 3));
                if let Some(inverse) = metric.inverse {
                    *inverse = Some(round_to(price / value, 2));
                }
            }
            None => {
                debug!(name = %row_name, attribute = metric.attribute, "no score, skipping metric");
                *metric.per_dollar = None;
            }
        }
    }

    row.round_avg();
    Ok(())
}

// ============================================================================
// DOMAIN IMPLEMENTATIONS
// ============================================================================

impl PricePerformance for CpuRow {
    fn name(&self) -> &str {
        &self.name
    }

    fn price(&self) -> &str {
        &self.price
    }

    fn metrics(&mut self) -> Vec<Metric<'_>> {
        vec![
            Metric {
                attribute: "1-core",
                value: self.one_core,
                per_dollar: &mut self.one_core_per_dollar,
                inverse: None,
            },
            Metric {
                attribute: "2-core",
                value: self.two_core,
                per_dollar: &mut self.two_core_per_dollar,
                inverse: None,
            },
            Metric {
                attribute: "8-core",
                value: self.eight_core,
                per_dollar: &mut self.eight_core_per_dollar,
                inverse: None,
            },
            Metric {
                attribute: "avg",
                value: self.avg,
                per_dollar: &mut self.avg_per_dollar,
                inverse: None,
            },
            Metric {
                attribute: "user-rating",
                value: self.user_rating,
                per_dollar: &mut self.user_rating_per_dollar,
                inverse: None,
            },
        ]
    }

    fn round_avg(&mut self) {
        self.avg = self.avg.map(|avg| round_to(avg, 1));
    }
}

impl PricePerformance for HddRow {
    fn name(&self) -> &str {
        &self.name
    }

    fn price(&self) -> &str {
        &self.price
    }

    fn metrics(&mut self) -> Vec<Metric<'_>> {
        vec![
            Metric {
                attribute: "avg",
                value: Some(self.avg),
                per_dollar: &mut self.avg_per_dollar,
                inverse: None,
            },
            Metric {
                attribute: "capacity",
                value: self.capacity,
                per_dollar: &mut self.capacity_per_dollar,
                inverse: Some(&mut self.dollars_per_capacity),
            },
        ]
    }

    fn round_avg(&mut self) {
        self.avg = round_to(self.avg, 1);
    }
}

// ============================================================================
// TESTS
// ============================================================================
