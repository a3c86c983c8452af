// src/integrity/mod.rs

//! Content hashing and record emission.
//!
//! `digest` computes SHA-256 fingerprints, `ledger` remembers the last
//! digest seen per path within this run, and `report` turns confirmed
//! changes into output lines.

pub mod digest;
pub mod ledger;
pub mod report;

pub use digest::compute_file_digest;
pub use ledger::{DigestLedger, Observation};
pub use report::{ConsoleReporter, ReportSink};
