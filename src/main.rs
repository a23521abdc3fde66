use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

// Use library instead of local modules
use price_performance::{
    download, init_logging, latest_data_file, munge, Config, HttpFetcher, ProductType, RunContext,
    DEFAULT_CONFIG_FILE,
};

#[derive(Parser)]
#[command(name = "price-performance", version, about = "Welcome to the Price Performance Chart!")]
struct Cli {
    /// JSON config file (defaults are used when it doesn't exist)
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    product: ProductCommand,
}

#[derive(Subcommand)]
enum ProductCommand {
    /// Operate on CPU information
    Cpu(ActionArgs),
    /// Operate on HDD information
    Hdd(ActionArgs),
}

#[derive(clap::Args)]
struct ActionArgs {
    action: Action,

    /// Munge pages cached on this date (YYYYMMDD) instead of today
    #[arg(long)]
    date: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Action {
    /// Download pages, then munge and write to the web directory
    Download,
    /// Munge already-downloaded pages and write to the web directory
    Munge,
    /// Print the newest data file in the web directory
    Latest,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load_or_default(&cli.config)?;
    let level = if cli.verbose { "debug" } else { config.log_level.as_str() };
    init_logging(level)?;

    let (product, args) = match cli.product {
        ProductCommand::Cpu(args) => (ProductType::Cpu, args),
        ProductCommand::Hdd(args) => (ProductType::Hdd, args),
    };

    let ctx = match &args.date {
        Some(date) => {
            let date = NaiveDate::parse_from_str(date, "%Y%m%d")
                .with_context(|| format!("Invalid --date '{}', expected YYYYMMDD", date))?;
            RunContext::for_date(config, product, date)
        }
        None => RunContext::new(config, product),
    };

    match args.action {
        Action::Download => {
            run_download(&ctx)?;
            run_munge(&ctx)?;
        }
        Action::Munge => run_munge(&ctx)?,
        Action::Latest => run_latest(&ctx)?,
    }

    Ok(())
}

fn run_download(ctx: &RunContext) -> Result<()> {
    println!("🌐 Downloading {} pages...", ctx.product.name());

    let fetcher = HttpFetcher::new(&ctx.config)?;
    let files = download(ctx, &fetcher)?;

    println!("✓ Downloaded {} file(s)", files.len());
    for file in &files {
        println!("   {}", file.display());
    }
    Ok(())
}

fn run_munge(ctx: &RunContext) -> Result<()> {
    println!("🔄 Munging {} data for {}...", ctx.product.name(), ctx.date_stamp());

    let output = munge(ctx)?;

    println!("{}", output.report);
    println!("✓ Data file: {}", output.data_file.display());
    println!("✓ Pointer:   {}", output.pointer_file.display());
    println!("{}", output.summary);
    Ok(())
}

fn run_latest(ctx: &RunContext) -> Result<()> {
    match latest_data_file(&ctx.config.web_dir, ctx.product)? {
        Some(path) => println!("{}", path.display()),
        None => {
            eprintln!("❌ No {} data files in {}", ctx.product.name(), ctx.config.web_dir.display());
            eprintln!("   Run: price-performance {} munge", ctx.product.code());
            std::process::exit(1);
        }
    }
    Ok(())
}
