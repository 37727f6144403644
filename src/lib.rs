pub mod archive;
pub mod config;
pub mod error;
pub mod extract;
pub mod model;
pub mod output;
pub mod parser;
pub mod scanner;

#[cfg(test)]
mod test_support;

pub use archive::ArchiveHandle;
pub use config::Config;
pub use extract::{Extraction, Extractor, RecordOrigin};
pub use model::{ModRecord, RawCandidate, ScanResult};
pub use scanner::{DirectoryScanner, ScanObserver};
