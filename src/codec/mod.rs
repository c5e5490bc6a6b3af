//! Per-document work of the evidence compiler.
//!
//! ## Key Components
//!
//! - [`EvidenceCompiler`] - Orchestrates discovery, dedup, extraction, layout and persistence
//! - [`discovery`] - Recursive, stable listing of evidence files under a root
//! - [`fingerprint`] - Streaming SHA-256 of file content
//! - [`links`] - URL extraction for a bubble's `urls` list
//! - [`layout`] - Initial position, velocity and pastel colour
//! - [`CompileReport`] / [`FileOutcome`] / [`CompileDiagnostic`] - What a run did, per file
//!
//! ## Example
//!
//! ```rust,no_run
//! use mindseye_core::codec::EvidenceCompiler;
//!
//! fn main() -> Result<(), mindseye_core::MindseyeError> {
//!     let mut compiler = EvidenceCompiler::simple("./evidence", "./out")?;
//!     let report = compiler.compile()?;
//!     println!("{} new bubbles, {} skipped", report.compiled(), report.skipped.len());
//!     Ok(())
//! }
//! ```

pub mod compiler;
pub mod diagnostic;
pub mod discovery;
pub mod fingerprint;
pub mod layout;
pub mod links;

pub use compiler::{truncate_description, EvidenceCompiler};
pub use diagnostic::{CompileDiagnostic, CompileReport, FileFailure, FileOutcome};
pub use layout::LayoutGenerator;
pub use links::extract_links;
