//! Catalog persistence and console reporting.

mod catalog;
mod cli;

pub use catalog::{to_catalog_bytes, write_catalog};
pub use cli::{print_records_table, print_summary, render_summary};

use crate::model::ScanResult;

/// Console format for scan results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Counts and skipped files only
    Summary,
    /// Summary preceded by a table of every record
    Table,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "summary" => Ok(OutputFormat::Summary),
            "table" => Ok(OutputFormat::Table),
            _ => Err(format!("Unknown format: {}. Use 'summary' or 'table'", s)),
        }
    }
}

pub fn print_result(result: &ScanResult, format: OutputFormat, max_skipped_shown: usize) {
    if format == OutputFormat::Table {
        print_records_table(result);
    }
    print_summary(result, max_skipped_shown);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("summary".parse::<OutputFormat>(), Ok(OutputFormat::Summary));
        assert_eq!("TABLE".parse::<OutputFormat>(), Ok(OutputFormat::Table));
        assert!("sarif".parse::<OutputFormat>().is_err());
    }
}
