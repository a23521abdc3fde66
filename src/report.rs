// 📋 Reporter - human-readable view of a reconciliation run
//
// Output order follows the input sequences; nothing is re-sorted here.

use crate::enrichment::PricePerformance;
use crate::reconciliation::ReconciliationResult;
use crate::rows::{CpuRow, HddRow, Named};
use std::fmt::Write;

/// A matched row as shown in the "Combined Data" section
pub trait ReportLine: PricePerformance {
    fn avg_score(&self) -> Option<f64>;
}

impl ReportLine for CpuRow {
    fn avg_score(&self) -> Option<f64> {
        self.avg
    }
}

impl ReportLine for HddRow {
    fn avg_score(&self) -> Option<f64> {
        Some(self.avg)
    }
}

pub fn format_report<M: ReportLine, P: Named>(result: &ReconciliationResult<M, P>) -> String {
    let mut out = String::from("Combined Data:\n");
    for row in &result.matched {
        let avg = row.avg_score().map_or_else(|| "-".to_string(), |avg| format!("{:?}", avg));
        let _ = writeln!(out, " {} ({}): avg={}", row.name(), row.price(), avg);
    }

    out.push_str("Orphan Price Data:\n");
    for row in &result.orphan_price {
        let _ = writeln!(out, " {}", row.label());
    }

    out.push_str("Orphan Performance Data:\n");
    for row in &result.orphan_perf {
        let _ = writeln!(out, " {}", row.label());
    }
    out
}

pub fn summary_line<M, P>(result: &ReconciliationResult<M, P>) -> String {
    format!(
        "Munge complete. #Combined={}, #OrphanPrice={}, #OrphanPerformance={}",
        result.matched.len(),
        result.orphan_price.len(),
        result.orphan_perf.len()
    )
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rows::{CpuPerfRow, HddPerfRow, PriceRow};

    #[test]
    fn test_format_cpu_report() {
        let perf = CpuPerfRow {
            avg: Some(88.3),
            ..CpuPerfRow::named("AMD Ryzen 5 3600")
        };
        let result = ReconciliationResult {
            matched: vec![
                CpuRow::merge(&perf, &PriceRow::new("AMD Ryzen 5 3600 3.6GHz Socket AM4 Box", "$226.50")),
                CpuRow::merge(
                    &CpuPerfRow::named("AMD Ryzen 5 3500"),
                    &PriceRow::new("AMD Ryzen 5 3500 3.6GHz Socket AM4 Box", "$180.00"),
                ),
            ],
            orphan_price: vec![PriceRow::new("AMD Athlon 3000G 3.5GHz Socket AM4 Box", "$90")],
            orphan_perf: vec![CpuPerfRow::named("AMD Ryzen TR 2920X")],
        };

        let expected = "Combined Data:\n \
            AMD Ryzen 5 3600 3.6GHz Socket AM4 Box ($226.50): avg=88.3\n \
            AMD Ryzen 5 3500 3.6GHz Socket AM4 Box ($180.00): avg=-\n\
            Orphan Price Data:\n \
            AMD Athlon 3000G 3.5GHz Socket AM4 Box\n\
            Orphan Performance Data:\n \
            AMD Ryzen TR 2920X\n";
        assert_eq!(format_report(&result), expected);
        assert_eq!(
            summary_line(&result),
            "Munge complete. #Combined=2, #OrphanPrice=1, #OrphanPerformance=1"
        );
    }

    #[test]
    fn test_whole_number_avg_keeps_decimal() {
        let perf = CpuPerfRow {
            avg: Some(88.0),
            ..CpuPerfRow::named("Intel Core i5-9400F")
        };
        let result: ReconciliationResult<CpuRow, CpuPerfRow> = ReconciliationResult {
            matched: vec![CpuRow::merge(
                &perf,
                &PriceRow::new("Intel Core i5 9400F 2.9GHz Socket 1151-2 Box", "$239.00"),
            )],
            orphan_price: vec![],
            orphan_perf: vec![],
        };

        assert!(format_report(&result).contains("($239.00): avg=88.0\n"));
    }

    #[test]
    fn test_format_empty_hdd_report() {
        let result: ReconciliationResult<HddRow, HddPerfRow> = ReconciliationResult {
            matched: vec![],
            orphan_price: vec![PriceRow::new("HGST Ultrastar 7K6000 HUS726T4TALE6L4 256MB 4TB", "$326.63")],
            orphan_perf: vec![],
        };

        let report = format_report(&result);
        assert_eq!(
            report,
            "Combined Data:\nOrphan Price Data:\n HGST Ultrastar 7K6000 HUS726T4TALE6L4 256MB 4TB\nOrphan Performance Data:\n"
        );
    }
}
