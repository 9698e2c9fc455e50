//! Reader for FASTA index (.fai) files using noodles.
//!
//! FAI provides name and length for each contig in FASTA order, which is all a
//! reference genome catalogue needs.
//! Format: `name\tlength\toffset\tline_bases\tline_width`

use std::io::BufReader;
use std::path::Path;

use thiserror::Error;

use crate::core::config::ContigConfig;

/// Maximum number of contigs accepted from a single index
pub const MAX_CONTIGS: usize = 100_000;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse FAI file: {0}")]
    Noodles(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Too many contigs: {0} exceeds maximum of {MAX_CONTIGS}")]
    TooManyContigs(usize),
}

/// Read contig names and lengths from a FASTA index file, in file order
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, `ParseError::Noodles`
/// if parsing fails, `ParseError::InvalidFormat` if no contigs are found, or
/// `ParseError::TooManyContigs` if the limit is exceeded.
pub fn read_fai_file(path: &Path) -> Result<Vec<ContigConfig>, ParseError> {
    use noodles::fasta;

    let reader = std::fs::File::open(path).map(BufReader::new)?;

    let index = fasta::fai::io::Reader::new(reader)
        .read_index()
        .map_err(|e| ParseError::Noodles(format!("{}: {e}", path.display())))?;

    let mut contigs = Vec::new();
    for record in index.as_ref() {
        check_limit(contigs.len())?;
        contigs.push(ContigConfig {
            name: String::from_utf8_lossy(record.name()).to_string(),
            length: record.length(),
        });
    }

    non_empty(contigs)
}

fn check_limit(count: usize) -> Result<(), ParseError> {
    if count >= MAX_CONTIGS {
        Err(ParseError::TooManyContigs(count + 1))
    } else {
        Ok(())
    }
}

fn non_empty(contigs: Vec<ContigConfig>) -> Result<Vec<ContigConfig>, ParseError> {
    if contigs.is_empty() {
        return Err(ParseError::InvalidFormat(
            "No contigs found in FAI file".to_string(),
        ));
    }
    Ok(contigs)
}
