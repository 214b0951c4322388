use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use pkgshield::config::Config;
use pkgshield::error::ScanError;
use pkgshield::ledger::ScanLedger;
use pkgshield::output::OutputFormat;
use pkgshield::rules::PatternCatalog;
use pkgshield::ScanOptions;

#[derive(Parser)]
#[command(
    name = "pkgshield",
    about = "Security scanner for Lua script packages",
    version,
    author
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a package, script, or directory of packages
    Scan {
        /// Package file or directory of packages
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Config file path
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Output format (console, json, html, csv, sarif)
        #[arg(long, short = 'f', default_value = "console")]
        format: String,

        /// Write output to file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Skip live DNS lookups
        #[arg(long)]
        offline: bool,

        /// Record scanned packages in this ledger file
        #[arg(long)]
        ledger: Option<PathBuf>,

        /// Only scan packages the ledger hasn't seen with their current content
        #[arg(long, requires = "ledger")]
        only_new: bool,
    },

    /// List all pattern categories and detectors
    ListRules {
        /// Output format (table, json)
        #[arg(long, short = 'f', default_value = "table")]
        format: String,

        /// Include categories from this config file
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },

    /// Generate a starter .pkgshield.toml config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// List packages not yet scanned, or changed since the last scan
    Pending {
        /// Directory of packages
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Ledger file written by `scan --ledger`
        #[arg(long)]
        ledger: PathBuf,

        /// Config file path (for ignored packages)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Scan {
            path,
            config,
            format,
            output,
            offline,
            ledger,
            only_new,
        } => cmd_scan(path, config, format, output, offline, ledger, only_new),
        Commands::ListRules { format, config } => cmd_list_rules(format, config),
        Commands::Init { force } => cmd_init(force),
        Commands::Pending {
            path,
            ledger,
            config,
        } => cmd_pending(path, ledger, config),
    };

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    }
}

/// Logs go to stderr so reports on stdout stay clean. `RUST_LOG` wins over
/// `-v` when set.
fn init_tracing(verbose: u8) {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn cmd_scan(
    path: PathBuf,
    config: Option<PathBuf>,
    format_str: String,
    output_path: Option<PathBuf>,
    offline: bool,
    ledger: Option<PathBuf>,
    only_new: bool,
) -> Result<i32, ScanError> {
    let format = OutputFormat::from_str_lenient(&format_str).unwrap_or_else(|| {
        eprintln!("Warning: unknown format '{}', using console", format_str);
        OutputFormat::Console
    });

    let options = ScanOptions {
        config_path: config,
        format,
        offline,
        ledger_path: ledger,
        only_new,
    };

    let report = pkgshield::scan(&path, &options)?;
    let rendered = pkgshield::render_report(&report, format)?;

    match output_path {
        Some(out) => std::fs::write(&out, &rendered)?,
        None => print!("{}", rendered),
    }

    // Exit code: 0 = pass, 1 = results left after policy
    Ok(if report.verdict.pass { 0 } else { 1 })
}

fn cmd_list_rules(format_str: String, config: Option<PathBuf>) -> Result<i32, ScanError> {
    let config = match config {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };
    let catalog = PatternCatalog::with_extra(&config.rules.categories)?;
    let categories = catalog.describe();

    match format_str.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&categories)?;
            println!("{}", json);
        }
        _ => {
            println!("{:<22} {:<18} PATTERN", "CATEGORY", "SUPPRESSION");
            println!("{}", "-".repeat(80));
            for category in &categories {
                for detector in &category.detectors {
                    let token = if detector.token.is_empty() {
                        "-"
                    } else {
                        detector.token.as_str()
                    };
                    println!("{:<22} {:<18} {}", category.name, token, detector.pattern);
                }
            }
        }
    }

    Ok(0)
}

fn cmd_init(force: bool) -> Result<i32, ScanError> {
    let path = PathBuf::from(".pkgshield.toml");

    if path.exists() && !force {
        eprintln!(".pkgshield.toml already exists. Use --force to overwrite.");
        return Ok(1);
    }

    std::fs::write(&path, Config::starter_toml())?;
    println!("Created .pkgshield.toml");

    Ok(0)
}

fn cmd_pending(path: PathBuf, ledger: PathBuf, config: Option<PathBuf>) -> Result<i32, ScanError> {
    let config_path = config.unwrap_or_else(|| pkgshield::default_config_path(&path));
    let config = Config::load(&config_path)?;
    let packages = pkgshield::adapter::discover_packages(&path, &config.scan.ignored_packages)?;
    let ledger = ScanLedger::load(&ledger)?;

    for package in ledger.pending(&packages) {
        println!("{}", package.display());
    }

    Ok(0)
}
