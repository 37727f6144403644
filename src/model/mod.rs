//! Core data types for mod records and scan results.
//!
//! This module contains the fundamental types used throughout modcatalog:
//!
//! - [`ModRecord`] - A normalized, always-complete catalog entry
//! - [`RawCandidate`] - Parsed metadata that may still be missing fields
//! - [`ScanResult`] - Records and skipped files from one directory scan
//!
//! # Example
//!
//! ```
//! use modcatalog::{ModRecord, RawCandidate};
//!
//! let candidate = RawCandidate::new(Some("jei"), None, Some("15.2.0"));
//! let record = candidate.normalize().unwrap();
//!
//! assert_eq!(record, ModRecord::new("jei", "jei", "15.2.0"));
//! ```

mod record;

pub use record::*;
