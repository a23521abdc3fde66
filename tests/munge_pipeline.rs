// End-to-end munge over a page cache on disk

use chrono::NaiveDate;
use price_performance::sources::{page_path, page_prefix};
use price_performance::{download, latest_data_file, munge, Config, Fetcher, ProductType, RunContext};
use serde_json::Value;
use std::fs;
use std::path::Path;

const DATE_STAMP: &str = "20200314";

fn card(name: &str, price: &str) -> String {
    format!(
        r#"<div data-test="ProductCard">
             <a href="/product.php?p=1" aria-label="{}"><img src="x.png"></a>
             <span data-test="PriceLabel">{}</span>
           </div>"#,
        name, price
    )
}

fn price_page(cards: &[(&str, &str)]) -> String {
    let body: String = cards.iter().map(|(name, price)| card(name, price)).collect();
    format!("<html><body>{}</body></html>", body)
}

const CPU_BENCHMARK_PAGE: &str = r#"<html><body>
  <table>
    <thead><tr>
      <th>#</th>
      <th>Model</th>
      <th data-mhth="MC_POPULARITY">User rating</th>
      <th data-mhth="MC_BENCH">Avg bench</th>
      <th data-mhth="MCCPU_1CA">1-Core</th>
      <th data-mhth="MCCPU_8CA">8-Core</th>
    </tr></thead>
    <tbody>
      <tr class="hovertarget ">
        <td>1</td>
        <td><a href="/img"><img src="x.png"></a> AMD <a href="/SpeedTest/1">Ryzen 5 3600</a></td>
        <td><div>92</div></td>
        <td><div>88.3</div></td>
        <td><div>130</div></td>
        <td><div>-</div></td>
      </tr>
      <tr class="hovertarget ">
        <td>2</td>
        <td><a href="/img"><img src="x.png"></a> Intel <a href="/SpeedTest/2">Core i9-9900K</a></td>
        <td><div>85</div></td>
        <td><div>98.7</div></td>
        <td><div>152</div></td>
        <td><div>1210</div></td>
      </tr>
    </tbody>
  </table>
</body></html>"#;

const HDD_BENCHMARK_CSV: &str = "Type,Part Number,Brand,Model,Rank,Benchmark,Samples,URL\n\
    HDD,WD10EZEX,WD,Blue 1TB (2012),12,82.3,1471343,https://hdd.userbenchmark.com/1\n\
    HDD,,WD,WD20EURX 2TB,40,68.3,4325,https://hdd.userbenchmark.com/2\n\
    HDD,WD10EADS,WD,Green 1TB,300,38.5,90000,https://hdd.userbenchmark.com/3\n";

fn write_page(cache_dir: &Path, stem: &str, product: ProductType, suffix: &str, content: &str) {
    let prefix = page_prefix(cache_dir, stem, product.code(), DATE_STAMP);
    let path = page_path(&prefix, 1, suffix);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn context(root: &Path, product: ProductType) -> RunContext {
    let config = Config {
        web_dir: root.join("web"),
        cache_dir: root.join("pages"),
        ..Config::default()
    };
    let date = NaiveDate::parse_from_str(DATE_STAMP, "%Y%m%d").unwrap();
    RunContext::for_date(config, product, date)
}

fn read_rows(path: &Path) -> Vec<Value> {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_munge_cpu_from_cached_pages() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(dir.path(), ProductType::Cpu);

    write_page(
        &ctx.config.cache_dir,
        "pricespy",
        ProductType::Cpu,
        ".htm",
        &price_page(&[
            ("Intel Core i9-9900K 3.6GHz Socket 1151-2 Box without Cooler", "$799.00"),
            ("AMD Ryzen 5 3600 3.6GHz Socket AM4 Box", "$226.50"),
            ("AMD Athlon 3000G 3.5GHz Socket AM4 Box", "$89.00"),
        ]),
    );
    write_page(&ctx.config.cache_dir, "userbenchmark", ProductType::Cpu, ".htm", CPU_BENCHMARK_PAGE);

    let output = munge(&ctx).unwrap();

    assert_eq!(output.data_file, dir.path().join("web/price_performance_cpu_20200314.json"));
    assert_eq!(
        output.summary,
        "Munge complete. #Combined=2, #OrphanPrice=1, #OrphanPerformance=0"
    );
    assert!(output.report.contains("AMD Athlon 3000G 3.5GHz Socket AM4 Box"));

    let rows = read_rows(&output.data_file);
    assert_eq!(rows.len(), 2);

    let ryzen = &rows[0];
    assert_eq!(ryzen["name"], "AMD Ryzen 5 3600 3.6GHz Socket AM4 Box");
    assert_eq!(ryzen["price"], "$226.50");
    assert_eq!(ryzen["avg"], 88.3);
    assert_eq!(ryzen["avg/$"], 0.39);
    assert_eq!(ryzen["1-core/$"], 0.574);
    assert_eq!(ryzen["user-rating/$"], 0.406);
    assert_eq!(ryzen["8-core/$"], Value::Null);

    let intel = &rows[1];
    assert_eq!(intel["name"], "Intel Core i9-9900K 3.6GHz Socket 1151-2 Box without Cooler");
    assert_eq!(intel["avg/$"], 0.124);
    assert_eq!(intel["8-core/$"], 1.514);

    assert_eq!(
        fs::read_to_string(&output.pointer_file).unwrap(),
        "var LATEST_CPU_DATA_FILE=\"price_performance_cpu_20200314.json\";"
    );
    assert_eq!(
        latest_data_file(&ctx.config.web_dir, ProductType::Cpu).unwrap(),
        Some(output.data_file.clone())
    );
}

#[test]
fn test_munge_hdd_from_cached_pages() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(dir.path(), ProductType::Hdd);

    write_page(
        &ctx.config.cache_dir,
        "pricespy",
        ProductType::Hdd,
        ".htm",
        &price_page(&[
            ("WD Blue WD10EZEX 64MB 1TB", "$74.00"),
            ("WD Purple WD20EURX 64MB 2TB", "$120.00"),
            ("Seagate Barracuda ST1000DM003 64MB 1TB", "$85.10"),
        ]),
    );
    write_page(&ctx.config.cache_dir, "userbenchmark", ProductType::Hdd, ".csv", HDD_BENCHMARK_CSV);

    let output = munge(&ctx).unwrap();

    assert_eq!(
        output.summary,
        "Munge complete. #Combined=2, #OrphanPrice=1, #OrphanPerformance=0"
    );

    let rows = read_rows(&output.data_file);
    assert_eq!(rows.len(), 2);

    let blue = &rows[0];
    assert_eq!(blue["name"], "WD Blue WD10EZEX 64MB 1TB");
    assert_eq!(blue["brand"], "WD");
    assert_eq!(blue["cache"], 64);
    assert_eq!(blue["capacity"], 1.0);
    assert_eq!(blue["mfg_code"], "WD10EZEX");
    assert_eq!(blue["model"], "Blue 1TB (2012)");
    assert_eq!(blue["avg/$"], 1.112);
    assert_eq!(blue["capacity/$"], 0.014);
    assert_eq!(blue["$/capacity"], 74.0);

    // No part number in the benchmark row, inferred from the model
    let purple = &rows[1];
    assert_eq!(purple["mfg_code"], "WD20EURX");
    assert_eq!(purple["avg"], 68.3);
    assert_eq!(purple["avg/$"], 0.569);
    assert_eq!(purple["capacity/$"], 0.017);
    assert_eq!(purple["$/capacity"], 60.0);

    assert!(output.report.contains("Seagate Barracuda ST1000DM003 64MB 1TB"));
}

#[test]
fn test_munge_without_cached_pages_fails() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(dir.path(), ProductType::Cpu);

    let err = munge(&ctx).unwrap_err();
    assert!(err.to_string().contains("No cached pages for PriceSpy CPU"));
}

#[test]
fn test_munge_stops_at_missing_price() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(dir.path(), ProductType::Cpu);

    write_page(
        &ctx.config.cache_dir,
        "pricespy",
        ProductType::Cpu,
        ".htm",
        &price_page(&[("AMD Ryzen 5 3600 3.6GHz Socket AM4 Box", "$")]),
    );
    write_page(&ctx.config.cache_dir, "userbenchmark", ProductType::Cpu, ".htm", CPU_BENCHMARK_PAGE);

    assert!(munge(&ctx).is_err());
    assert_eq!(latest_data_file(&ctx.config.web_dir, ProductType::Cpu).unwrap(), None);
}

/// Serves canned markup instead of hitting the network
struct CannedFetcher {
    price_page: String,
    benchmark: &'static str,
}

impl Fetcher for CannedFetcher {
    fn fetch(&self, url: &str) -> anyhow::Result<String> {
        if url.contains("pricespy") {
            Ok(self.price_page.clone())
        } else if url.contains("userbenchmark") {
            Ok(self.benchmark.to_string())
        } else {
            anyhow::bail!("unexpected url {}", url)
        }
    }
}

#[test]
fn test_download_then_munge_hdd() {
    let dir = tempfile::tempdir().unwrap();
    let mut ctx = context(dir.path(), ProductType::Hdd);
    ctx.config.hdd_price_pages = 1;

    let fetcher = CannedFetcher {
        price_page: price_page(&[("WD Blue WD10EZEX 64MB 1TB", "$74.00")]),
        benchmark: HDD_BENCHMARK_CSV,
    };

    let files = download(&ctx, &fetcher).unwrap();
    assert_eq!(
        files,
        vec![
            dir.path().join("pages/pricespy_hdd_20200314_1.htm"),
            dir.path().join("pages/userbenchmark_hdd_20200314_1.csv"),
        ]
    );

    let output = munge(&ctx).unwrap();
    assert_eq!(
        output.summary,
        "Munge complete. #Combined=1, #OrphanPrice=0, #OrphanPerformance=0"
    );
}
