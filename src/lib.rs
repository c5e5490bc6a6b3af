//! # mindseye-core
//!
//! Compiles a directory tree of plain-text evidence documents into "bubble" visualization
//! records, with an append-only audit ledger of what was compiled and when.
//!
//! ## Overview
//!
//! A run walks the evidence root for `.txt` and `.md` files, skips any whose relative path is
//! already in the ledger, and turns each new document into a [`properties::Bubble`]: title from
//! the file stem, a truncated preview, the URLs it cites, a random on-canvas layout and an
//! optional companion image. New bubbles are committed to `bubbles.json`; every compiled file
//! gets one row in `compiler_log.csv`.
//!
//! ```text
//! evidence root ──► discovery ──► dedup check ──► fingerprint ──► links + layout ──► Bubble
//!                                    ▲                                                │
//!                                    └──────────── ledger (CSV, append-only) ◄────────┤
//!                                                                                      ▼
//!                                                                        bubbles.json snapshot
//! ```
//!
//! ### Key Properties
//!
//! - **Compile once**: a relative path is compiled at most once across runs unless its ledger
//!   row is removed out of band.
//! - **Error tolerance**: unreadable files are reported and retried next run, never fatal.
//! - **Flat files only**: the artifact and ledger are plain JSON and CSV snapshots.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mindseye_core::{codec::EvidenceCompiler, config::CompilerConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CompilerConfig::new("./evidence", "./out");
//!     let mut compiler = EvidenceCompiler::new(config)?.with_process_log(true)?;
//!
//!     let report = compiler.compile()?;
//!     for failure in &report.failures {
//!         println!("{}: {}", failure.relative_path, failure.message);
//!     }
//!
//!     let stats = compiler.stats();
//!     println!("{} bubbles, {} files logged", stats.total_bubbles, stats.total_processed_files);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Guide
//!
//! Start with [`codec::EvidenceCompiler`]. [`ledger`] and [`artifact`] own the two persisted
//! files, [`stats`] reads them back, and [`config`] names where everything lives.

pub mod artifact;
pub mod codec;
pub mod config;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod paths;
pub mod properties;
pub mod scaffold;
pub mod stats;

pub use error::*;
