//! Directory scanning.
//!
//! [`DirectoryScanner`] walks a directory tree, picks out mod archives by
//! extension and runs the [`Extractor`] on each one. Results are folded into
//! a [`ScanResult`] in traversal order, which is the same for the
//! sequential and the concurrent scan.
//!
//! # Example
//!
//! ```no_run
//! use modcatalog::{Config, DirectoryScanner};
//! use modcatalog::scanner::NoopObserver;
//! use std::path::Path;
//!
//! let scanner = DirectoryScanner::new(&Config::default());
//! let result = scanner.scan(Path::new("mods"), &NoopObserver)?;
//! println!("{} records, {} skipped", result.records.len(), result.skipped.len());
//! # Ok::<(), modcatalog::error::ScanError>(())
//! ```

use crate::config::Config;
use crate::error::ScanError;
use crate::extract::Extractor;
use crate::model::{ModRecord, ScanResult};
use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{info, warn};
use walkdir::WalkDir;

/// Receives progress notifications during a scan.
///
/// With the concurrent scan, calls for different files may interleave.
pub trait ScanObserver: Send + Sync {
    /// Called once with the number of candidate archives found.
    fn started(&self, _total: usize) {}

    /// Called before an archive is opened.
    fn processing(&self, _file_name: &str) {}

    /// Called after an archive is done. `records` is `None` if it could not be opened.
    fn finished(&self, _file_name: &str, _records: Option<usize>) {}
}

/// Observer that ignores every notification.
pub struct NoopObserver;

impl ScanObserver for NoopObserver {}

/// Walks a directory tree and extracts records from every candidate archive.
pub struct DirectoryScanner {
    config: Config,
    extractor: Arc<Extractor>,
}

impl DirectoryScanner {
    pub fn new(config: &Config) -> Self {
        Self::with_extractor(config, Extractor::new())
    }

    pub fn with_extractor(config: &Config, extractor: Extractor) -> Self {
        Self {
            config: config.clone(),
            extractor: Arc::new(extractor),
        }
    }

    /// Lists candidate archives under `root`, recursively, in traversal order.
    ///
    /// Entries are visited sorted by file name so repeated scans of an
    /// unchanged tree see the same order.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::InvalidRootPath`] if `root` is not a directory.
    pub fn candidates(&self, root: &Path) -> Result<Vec<PathBuf>, ScanError> {
        if !root.is_dir() {
            return Err(ScanError::InvalidRootPath(root.to_path_buf()));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable directory entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if self.config.is_candidate(&name) && !self.config.is_excluded(&name) {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    /// Scans `root` one archive at a time.
    pub fn scan(&self, root: &Path, observer: &dyn ScanObserver) -> Result<ScanResult, ScanError> {
        let files = self.candidates(root)?;
        info!(root = %root.display(), files = files.len(), "Starting scan");
        observer.started(files.len());

        let result = files.iter().fold(ScanResult::new(), |result, path| {
            let (name, outcome) = process_file(&self.extractor, path, observer);
            result.absorb(name, outcome)
        });

        log_finished(&result);
        Ok(result)
    }

    /// Scans `root` on a pool of at most `jobs` blocking workers.
    ///
    /// `jobs == 0` uses the number of logical CPUs.
    pub async fn scan_concurrent(
        &self,
        root: &Path,
        jobs: usize,
        observer: Arc<dyn ScanObserver>,
    ) -> Result<ScanResult, ScanError> {
        let files = self.candidates(root)?;
        let jobs = effective_jobs(jobs);
        info!(root = %root.display(), files = files.len(), jobs, "Starting concurrent scan");
        observer.started(files.len());

        let semaphore = Arc::new(Semaphore::new(jobs));
        let futures: Vec<_> = files
            .into_iter()
            .map(|path| {
                let extractor = Arc::clone(&self.extractor);
                let semaphore = Arc::clone(&semaphore);
                let observer = Arc::clone(&observer);
                async move {
                    let _permit = semaphore.acquire_owned().await;
                    let fallback_name = file_name_of(&path);
                    let task = tokio::task::spawn_blocking(move || {
                        process_file(&extractor, &path, observer.as_ref())
                    });
                    match task.await {
                        Ok(outcome) => outcome,
                        Err(e) => {
                            warn!(file = %fallback_name, error = %e, "Worker failed");
                            (fallback_name, None)
                        }
                    }
                }
            })
            .collect();

        let result = join_all(futures)
            .await
            .into_iter()
            .fold(ScanResult::new(), |result, (name, outcome)| {
                result.absorb(name, outcome)
            });

        log_finished(&result);
        Ok(result)
    }
}

fn process_file(
    extractor: &Extractor,
    path: &Path,
    observer: &dyn ScanObserver,
) -> (String, Option<Vec<ModRecord>>) {
    let name = file_name_of(path);
    observer.processing(&name);
    let outcome = extractor.extract(path);
    observer.finished(&name, outcome.as_ref().map(Vec::len));
    (name, outcome)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn effective_jobs(jobs: usize) -> usize {
    if jobs > 0 {
        return jobs;
    }
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn log_finished(result: &ScanResult) {
    info!(
        records = result.records.len(),
        skipped = result.skipped.len(),
        "Scan finished"
    );
}
