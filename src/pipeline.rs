// 🔄 Pipeline - download pages, then munge them into the published data file
//
//   download: fetch -> page cache
//   munge:    page cache -> extract -> reconcile -> enrich -> write + report

use crate::config::RunContext;
use crate::enrichment::{self, parse_price, PricePerformance};
use crate::error::MungeError;
use crate::output::{data_file_name, write_data_file, write_latest_pointer};
use crate::reconciliation::{CpuReconciler, HddReconciler, ReconciliationResult, Reconciler};
use crate::report::{format_report, summary_line, ReportLine};
use crate::rows::{Named, PriceRow, ProductType};
use crate::sources::{
    load_pages, page_prefix, save_pages, DataSource, Fetcher, PriceSpy, UserBenchmarkCpu, UserBenchmarkHdd,
};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct MungeOutput {
    pub data_file: PathBuf,
    pub pointer_file: PathBuf,
    pub report: String,
    pub summary: String,
}

// ============================================================================
// CORE
// ============================================================================

/// Reconcile then enrich. Fails on the first matched row without a usable price.
pub fn munge_rows<R>(
    reconciler: &R,
    price_rows: &[PriceRow],
    perf_rows: &[R::Perf],
) -> Result<ReconciliationResult<R::Merged, R::Perf>, MungeError>
where
    R: Reconciler,
    R::Merged: PricePerformance,
{
    let mut result = reconciler.reconcile(price_rows, perf_rows);

    for row in &result.matched {
        if let Ok(price) = parse_price(row.name(), row.price()) {
            if price == 0.0 {
                warn!(name = row.name(), "zero price, per-dollar metrics will be infinite");
            }
        }
    }

    enrichment::enrich(&mut result.matched)?;
    Ok(result)
}

// ============================================================================
// DOWNLOAD
// ============================================================================

fn download_source<S: DataSource>(
    ctx: &RunContext,
    fetcher: &dyn Fetcher,
    source: &S,
    pages: usize,
) -> Result<Vec<PathBuf>> {
    let markup = source.fetch(fetcher, pages)?;
    let prefix = page_prefix(
        &ctx.config.cache_dir,
        source.file_stem(),
        ctx.product.code(),
        &ctx.date_stamp(),
    );
    save_pages(&prefix, source.file_suffix(), &markup)
}

/// Fetch price and benchmark pages into the page cache
pub fn download(ctx: &RunContext, fetcher: &dyn Fetcher) -> Result<Vec<PathBuf>> {
    let _run = ctx.span.enter();
    let price_pages = ctx.config.price_pages(ctx.product);

    let mut files = download_source(ctx, fetcher, &PriceSpy::new(ctx.product), price_pages)?;
    let benchmark_files = match ctx.product {
        ProductType::Cpu => download_source(
            ctx,
            fetcher,
            &UserBenchmarkCpu::new(),
            ctx.config.cpu_benchmark_pages,
        )?,
        ProductType::Hdd => download_source(ctx, fetcher, &UserBenchmarkHdd::from_config(&ctx.config), 1)?,
    };
    files.extend(benchmark_files);

    info!(files = files.len(), "download complete");
    Ok(files)
}

// ============================================================================
// MUNGE
// ============================================================================

fn load_rows<S: DataSource>(ctx: &RunContext, source: &S) -> Result<Vec<S::Row>> {
    let prefix = page_prefix(
        &ctx.config.cache_dir,
        source.file_stem(),
        ctx.product.code(),
        &ctx.date_stamp(),
    );
    let pages = load_pages(&prefix, source.file_suffix())?;
    if pages.is_empty() {
        anyhow::bail!(
            "No cached pages for {} (expected {}_1{})",
            source.name(),
            prefix.display(),
            source.file_suffix()
        );
    }

    let rows = source.extract_all(&pages)?;
    info!("{}: {} row(s) from {} page(s)", source.name(), rows.len(), pages.len());
    Ok(rows)
}

fn publish<M, P>(ctx: &RunContext, result: &ReconciliationResult<M, P>) -> Result<MungeOutput>
where
    M: Serialize + ReportLine,
    P: Named,
{
    let web_dir = &ctx.config.web_dir;
    let data_file = write_data_file(web_dir, ctx.product, &ctx.date_stamp(), &result.matched)?;
    let pointer_file = write_latest_pointer(
        web_dir,
        ctx.product,
        &data_file_name(ctx.product, &ctx.date_stamp()),
    )?;

    let report = format_report(result);
    info!("\n{}", report);

    Ok(MungeOutput {
        data_file,
        pointer_file,
        report,
        summary: summary_line(result),
    })
}

/// Parse the cached pages for the run date and publish the merged data
pub fn munge(ctx: &RunContext) -> Result<MungeOutput> {
    let _run = ctx.span.enter();
    let price_rows = load_rows(ctx, &PriceSpy::new(ctx.product))?;

    match ctx.product {
        ProductType::Cpu => {
            let perf_rows = load_rows(ctx, &UserBenchmarkCpu::new())?;
            let result = munge_rows(&CpuReconciler::new(), &price_rows, &perf_rows)
                .context("Failed to munge CPU data")?;
            publish(ctx, &result)
        }
        ProductType::Hdd => {
            let perf_rows = load_rows(ctx, &UserBenchmarkHdd::from_config(&ctx.config))?;
            let result = munge_rows(&HddReconciler::new(), &price_rows, &perf_rows)
                .context("Failed to munge HDD data")?;
            publish(ctx, &result)
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rows::CpuPerfRow;

    #[test]
    fn test_munge_rows_cpu() {
        let price_rows = vec![
            PriceRow::new("AMD Athlon 3000G 3.5GHz Socket AM4 Box", "$1"),
            PriceRow::new("AMD Ryzen 5 3600 3.6GHz Socket AM4 Box", "$2"),
        ];
        let perf_rows = vec![CpuPerfRow {
            one_core: Some(1.0),
            two_core: Some(2.0),
            eight_core: Some(3.0),
            avg: Some(2.5),
            user_rating: None,
            ..CpuPerfRow::named("AMD Ryzen 5 3600")
        }];

        let result = munge_rows(&CpuReconciler::new(), &price_rows, &perf_rows).unwrap();

        assert_eq!(result.matched.len(), 1);
        let row = &result.matched[0];
        assert_eq!(row.one_core_per_dollar, Some(0.5));
        assert_eq!(row.two_core_per_dollar, Some(1.0));
        assert_eq!(row.eight_core_per_dollar, Some(1.5));
        assert_eq!(row.avg_per_dollar, Some(1.25));
        assert_eq!(row.user_rating_per_dollar, None);
        assert_eq!(result.orphan_price.len(), 1);
    }

    #[test]
    fn test_munge_rows_surfaces_bad_price() {
        let price_rows = vec![PriceRow::new("AMD Ryzen 5 3600 3.6GHz Socket AM4 Box", "POA")];
        let perf_rows = vec![CpuPerfRow::named("AMD Ryzen 5 3600")];

        let err = munge_rows(&CpuReconciler::new(), &price_rows, &perf_rows).unwrap_err();
        assert!(matches!(err, MungeError::InvalidPrice { .. }));
    }
}
