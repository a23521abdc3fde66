// Price Performance Chart - Core Library
// Exposes all modules for use in the CLI, the publish server, and tests

pub mod rows;
pub mod error;
pub mod config;
pub mod canonical;      // CPU name canonicalization rules
pub mod model_code;     // Drive name -> brand/cache/capacity/part number
pub mod perf_index;     // Benchmark rows keyed by part number
pub mod reconciliation; // Exact + fuzzy join of price and benchmark rows
pub mod enrichment;     // Per-dollar metrics
pub mod report;
pub mod sources;
pub mod output;
pub mod pipeline;

// Re-export commonly used types
pub use rows::{
    PriceRow, CpuPerfRow, HddPerfRow, ModelCodeParts,
    CpuRow, HddRow, ProductType, Named,
};
pub use error::MungeError;
pub use config::{Config, RunContext, init_logging, DEFAULT_CONFIG_FILE};
pub use canonical::NameCanonicalizer;
pub use model_code::ModelCodeExtractor;
pub use perf_index::PerformanceIndex;
pub use reconciliation::{
    Reconciler, ReconciliationResult, CpuReconciler, HddReconciler,
};
pub use enrichment::{enrich, PricePerformance};
pub use report::{format_report, summary_line};
pub use sources::{
    DataSource, Fetcher, HttpFetcher, FileFetcher,
    PriceSpy, UserBenchmarkCpu, UserBenchmarkHdd,
};
pub use output::{write_data_file, write_latest_pointer, latest_data_file};
pub use pipeline::{download, munge, munge_rows, MungeOutput};
