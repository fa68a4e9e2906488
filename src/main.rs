//! Docsweep main entry point
//!
//! This is the command-line interface for the Docsweep broken-link sweeper.

use clap::Parser;
use docsweep::config::{load_config_with_hash, validate, Config, Target};
use docsweep::crawler::run_crawl;
use docsweep::output::print_statistics;
use docsweep::ConfigError;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Docsweep: a broken-link sweeper for documentation sites
///
/// Docsweep crawls a documentation tree from its root page, checks every
/// link it finds (including external ones), and writes the broken links to
/// a CSV report per target.
#[derive(Parser, Debug)]
#[command(name = "docsweep")]
#[command(version = "1.0.0")]
#[command(about = "A broken-link sweeper for documentation sites", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Sweep this root URL instead of the configured targets
    #[arg(long, value_name = "URL")]
    root: Option<String>,

    /// Report label for --root
    #[arg(long, default_value = "Report", requires = "root")]
    label: String,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be swept without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(root) = cli.root {
        config.targets = vec![Target {
            root_url: root,
            label: cli.label,
        }];
        validate(&config)?;
    }

    if config.targets.is_empty() {
        tracing::error!("Nothing to sweep: pass --root or add a [[target]] to the config");
        return Err(ConfigError::NoTargets.into());
    }

    if cli.dry_run {
        handle_dry_run(&config);
    } else {
        handle_sweep(&config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("docsweep=info,warn"),
            1 => EnvFilter::new("docsweep=debug,info"),
            2 => EnvFilter::new("docsweep=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective settings and targets
fn handle_dry_run(config: &Config) {
    println!("=== Docsweep Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Concurrency: {}", config.crawler.effective_concurrency());
    println!("  Discovery timeout: {}s", config.crawler.discovery_timeout);
    println!("  Validation timeout: {}s", config.crawler.validation_timeout);

    println!("\nRetry:");
    println!("  Max attempts: {}", config.retry.max_attempts);
    println!(
        "  Backoff: x{} between {} and {} units of {}ms",
        config.retry.multiplier,
        config.retry.min_wait,
        config.retry.max_wait,
        config.retry.time_unit_ms
    );

    println!("\nPolicy:");
    println!(
        "  Defensive domains ({}): {}",
        config.policy.defensive_domains.len(),
        config.policy.defensive_domains.join(", ")
    );
    println!("  Ignored substrings: {}", config.policy.ignored_substrings.join(", "));
    println!("  Ignored extensions: {}", config.policy.ignored_extensions.join(", "));

    println!("\nTargets ({}):", config.targets.len());
    for target in &config.targets {
        println!("  - {} ({})", target.label, target.root_url);
        println!(
            "    report: {}",
            config.output.report_path(&target.label).display()
        );
    }

    println!("\n✓ Configuration is valid");
}

/// Sweeps every target in order and prints its statistics
async fn handle_sweep(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    for target in &config.targets {
        tracing::info!("Sweeping {} ({})", target.label, target.root_url);

        match run_crawl(config, target).await {
            Ok(report) => {
                print_statistics(&report.statistics);
                println!(
                    "\n✓ Report written to: {}\n",
                    config.output.report_path(&target.label).display()
                );
            }
            Err(e) => {
                tracing::error!("Sweep of {} failed: {}", target.label, e);
                return Err(e.into());
            }
        }
    }

    Ok(())
}
