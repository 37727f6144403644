use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use modcatalog::{
    config::Config,
    error::ScanError,
    extract::Extractor,
    output::{print_result, write_catalog, OutputFormat},
    scanner::{DirectoryScanner, ScanObserver},
};
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const ERROR: u8 = 1;
}

#[derive(Parser)]
#[command(name = "modcatalog")]
#[command(
    author,
    version,
    about = "Build a catalog of installed game mods from their archives"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log extraction details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a mods directory and write the catalog
    Scan {
        /// Directory to scan (prompted for when omitted)
        path: Option<PathBuf>,

        /// Catalog file to write
        #[arg(short, long)]
        output: Option<String>,

        /// Console format (summary, table)
        #[arg(short, long)]
        format: Option<String>,

        /// Process archives one at a time
        #[arg(long)]
        no_parallel: bool,

        /// Number of worker threads (0 = one per CPU)
        #[arg(short, long)]
        jobs: Option<usize>,
    },

    /// Print the records extracted from a single archive
    Inspect {
        /// Archive to inspect
        file: PathBuf,
    },

    /// Show or create config file
    Config {
        /// Generate default config file
        #[arg(long)]
        init: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_codes::ERROR)
        }
    }
}

async fn run() -> Result<u8> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Ignoring unreadable config file");
        Config::default()
    });

    match cli.command {
        Some(Commands::Scan {
            path,
            output,
            format,
            no_parallel,
            jobs,
        }) => {
            let mut config = config;
            if let Some(output) = output {
                config.output_file = output;
            }
            if let Some(jobs) = jobs {
                config.jobs = jobs;
            }
            if no_parallel {
                config.parallel = false;
            }
            let format = format.unwrap_or_else(|| config.default_format.clone());

            run_scan(path, &format, &config).await
        }
        None => run_scan(None, &config.default_format.clone(), &config).await,
        Some(Commands::Inspect { file }) => inspect(file),
        Some(Commands::Config { init, path }) => {
            handle_config(init, path)?;
            Ok(exit_codes::SUCCESS)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "modcatalog=debug"
    } else {
        "modcatalog=warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(io::stderr)
        .init();
}

async fn run_scan(path: Option<PathBuf>, format: &str, config: &Config) -> Result<u8> {
    let format = OutputFormat::from_str(format).map_err(|e| anyhow::anyhow!(e))?;

    let root = match path {
        Some(path) => path,
        None => prompt_for_directory()?,
    };

    if !root.is_dir() {
        eprintln!("Error: {} is not a valid directory", root.display());
        return Ok(exit_codes::ERROR);
    }

    println!();
    println!("Scanning directory: {}", root.display());

    let scanner = DirectoryScanner::new(config);
    let progress = Arc::new(ConsoleProgress::new(io::stdout().is_terminal()));

    let scanned = if config.parallel {
        scanner
            .scan_concurrent(&root, config.jobs, progress.clone())
            .await
    } else {
        scanner.scan(&root, progress.as_ref())
    };
    progress.finish();

    let result = match scanned {
        Ok(result) => result,
        Err(ScanError::InvalidRootPath(path)) => {
            eprintln!("Error: {} is not a valid directory", path.display());
            return Ok(exit_codes::ERROR);
        }
    };

    print_result(&result, format, config.max_skipped_shown);

    let cwd = std::env::current_dir().context("Failed to resolve working directory")?;
    let output_path = config.output_path(&cwd);
    write_catalog(&output_path, &result.records)
        .with_context(|| format!("Failed to write catalog to {}", output_path.display()))?;

    println!();
    println!("Found {} mods", result.records.len());
    println!("Results written to: {}", output_path.display());

    Ok(exit_codes::SUCCESS)
}

fn prompt_for_directory() -> Result<PathBuf> {
    print!("Enter the mods directory path: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("Failed to read directory path")?;
    Ok(PathBuf::from(line.trim()))
}

fn inspect(file: PathBuf) -> Result<u8> {
    match Extractor::new().inspect(&file) {
        Some(extraction) => {
            println!("{}", serde_json::to_string_pretty(&extraction)?);
            Ok(exit_codes::SUCCESS)
        }
        None => {
            eprintln!("Error: could not open archive {}", file.display());
            Ok(exit_codes::ERROR)
        }
    }
}

/// Prints one line per archive, with a progress bar underneath on a terminal.
struct ConsoleProgress {
    bar: Option<ProgressBar>,
}

impl ConsoleProgress {
    fn new(interactive: bool) -> Self {
        let bar = interactive.then(|| {
            let pb = ProgressBar::new(0);
            let style = ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .map(|s| s.progress_chars("#>-"))
                .unwrap_or_else(|_| ProgressStyle::default_bar());
            pb.set_style(style);
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });
        Self { bar }
    }

    fn finish(&self) {
        if let Some(pb) = &self.bar {
            pb.finish_and_clear();
        }
    }
}

impl ScanObserver for ConsoleProgress {
    fn started(&self, total: usize) {
        if let Some(pb) = &self.bar {
            pb.set_length(total as u64);
        }
    }

    fn processing(&self, file_name: &str) {
        let line = format!("Processing: {}", file_name);
        match &self.bar {
            Some(pb) => {
                pb.println(line);
                pb.set_message(file_name.to_string());
            }
            None => println!("{}", line),
        }
    }

    fn finished(&self, _file_name: &str, _records: Option<usize>) {
        if let Some(pb) = &self.bar {
            pb.inc(1);
        }
    }
}

fn handle_config(init: bool, show_path: bool) -> Result<()> {
    let config_path = Config::config_path();

    if show_path {
        println!("{}", config_path.display());
        return Ok(());
    }

    match (init, config_path.exists()) {
        (true, true) => {
            println!(
                "Keeping existing configuration at {}",
                config_path.display()
            );
        }
        (true, false) => {
            Config::default().save()?;
            println!("Wrote default configuration to {}", config_path.display());
            println!();
            println!("{}", Config::generate_default_config());
        }
        (false, true) => {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            println!("# {}", config_path.display());
            println!("{}", content);
        }
        (false, false) => {
            println!(
                "Using built-in defaults; {} does not exist yet.",
                config_path.display()
            );
            println!("Create it with 'modcatalog config --init'.");
        }
    }

    Ok(())
}
