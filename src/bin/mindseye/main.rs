//! mindseye CLI tool
//!
//! Command-line interface for compiling evidence directories into bubble records.
//!
//! ## Commands
//!
//! - `compile`: One-shot compilation of new evidence files, then a stats summary
//! - `stats`: Show compilation statistics without compiling
//! - `init`: Create the conventional evidence structure with sample files
//!
//! Every command accepts `--evidence-root` and `--output-dir`; `--config` reads defaults from a
//! `mindseye.toml` file first, and explicit flags override it.

use clap::{Args, Parser, Subcommand};
use mindseye_core::{
    codec::EvidenceCompiler,
    config::{CompilerConfig, SnapshotMode, CONFIG_FILE_NAME},
    scaffold::init_evidence_root,
    stats::StatsReporter,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mindseye")]
#[command(author, version, about = "Compile evidence files into bubble visualizations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct PathArgs {
    /// Root directory to scan for evidence files
    #[arg(long)]
    evidence_root: Option<PathBuf>,

    /// Output directory for compiled files
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Configuration file path (default: ./mindseye.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl PathArgs {
    fn resolve(&self) -> Result<CompilerConfig, Box<dyn std::error::Error>> {
        let config_path = self
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
        let mut config = CompilerConfig::from_toml_file(config_path)?;
        if let Some(root) = &self.evidence_root {
            config.evidence_root = root.clone();
        }
        if let Some(out) = &self.output_dir {
            config.output_dir = out.clone();
        }
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compile new evidence files into the bubble collection
    Compile {
        #[command(flatten)]
        paths: PathArgs,

        /// Merge new bubbles into the existing collection instead of replacing it
        #[arg(long)]
        accumulate: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show compilation statistics
    Stats {
        #[command(flatten)]
        paths: PathArgs,
    },

    /// Initialize evidence directory structure with sample files
    Init {
        /// Evidence root directory to create
        #[arg(long)]
        evidence_root: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compile {
            paths,
            accumulate,
            verbose,
        } => {
            let mut config = paths.resolve()?;
            if accumulate {
                config.snapshot_mode = SnapshotMode::Accumulate;
            }

            println!("Mindseye Evidence Compiler");
            println!("{}", "=".repeat(50));

            if !config.evidence_root.exists() {
                println!("Creating evidence directory: {:?}", config.evidence_root);
                std::fs::create_dir_all(&config.evidence_root)?;
            }
            std::fs::create_dir_all(&config.output_dir)?;

            println!("Evidence root: {:?}", config.evidence_root);
            println!("Output directory: {:?}", config.output_dir);
            println!();

            let mut compiler = EvidenceCompiler::new(config)?.with_process_log(verbose)?;
            match compiler.compile() {
                Ok(report) => {
                    println!("Compilation completed successfully!");
                    println!("New bubbles: {}", report.compiled());
                    println!("Skipped (already processed): {}", report.skipped.len());
                    if let Some(summary) = report.error_summary() {
                        println!("Warning: {summary}");
                    }
                    let stats = compiler.stats();
                    println!("Total bubbles: {}", stats.total_bubbles);
                    println!("Processed files: {}", stats.total_processed_files);
                    println!("Log file: {:?}", compiler.ledger().path());
                    println!("Bubbles file: {:?}", compiler.artifact().path());
                }
                Err(e) => {
                    eprintln!("Compilation failed: {e}");
                    std::process::exit(1);
                }
            }
        }

        Commands::Stats { paths } => {
            let config = paths.resolve()?;
            let reporter = StatsReporter::new(&config);
            let stats = reporter.report();

            println!("Mindseye Compilation Statistics");
            println!("{}", "=".repeat(50));
            println!("Evidence root: {:?}", config.evidence_root);
            println!("Output directory: {:?}", config.output_dir);
            println!("{stats}");

            if stats.evidence_files > 0 {
                println!("\nEvidence files:");
                for file in reporter.sample_files(10) {
                    println!("  - {file}");
                }
                if stats.evidence_files > 10 {
                    println!("  ... and {} more", stats.evidence_files - 10);
                }
            }
        }

        Commands::Init { evidence_root } => {
            let root = evidence_root.unwrap_or_else(|| CompilerConfig::default().evidence_root);
            println!("Initializing Mindseye Evidence Structure");
            println!("{}", "=".repeat(50));

            let created = init_evidence_root(&root)?;
            for path in &created {
                println!("Created: {:?}", path);
            }
            println!("\nEvidence structure initialized at {:?}", root);
            println!("Run 'mindseye compile --evidence-root {}' to compile evidence", root.display());
        }
    }

    Ok(())
}
