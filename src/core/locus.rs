use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{GenomeError, Result};

/// A 1-based position on a named contig.
///
/// A locus carries no reference to its genome; contig semantics and bounds are
/// checked by [`crate::ReferenceGenome::validate_locus`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Locus {
    pub contig: String,
    pub position: u64,
}

impl Locus {
    pub fn new(contig: impl Into<String>, position: u64) -> Self {
        Self {
            contig: contig.into(),
            position,
        }
    }

    /// Parse a locus in `contig:position` form.
    ///
    /// The contig is everything before the last `:`, so contig names that
    /// themselves contain colons (e.g. HLA alleles) are supported.
    ///
    /// # Errors
    ///
    /// Returns `GenomeError::Validation` if the separator is missing, the
    /// position is not an integer, or the position is zero.
    pub fn parse(s: &str) -> Result<Self> {
        let (contig, position) = s
            .rsplit_once(':')
            .ok_or_else(|| GenomeError::Validation(format!("Expected 'contig:position', got '{s}'")))?;
        let position = parse_position(position, s)?;
        if contig.is_empty() {
            return Err(GenomeError::Validation(format!("Missing contig in locus '{s}'")));
        }
        Ok(Self::new(contig, position))
    }
}

impl fmt::Display for Locus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.contig, self.position)
    }
}

/// A half-open interval `[start, end)` between two loci.
///
/// Used for pseudoautosomal regions, where both ends share a contig.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub start: Locus,
    pub end: Locus,
}

impl Interval {
    pub fn new(start: Locus, end: Locus) -> Self {
        Self { start, end }
    }

    /// Interval on a single contig
    pub fn par(contig: impl Into<String>, start: u64, end: u64) -> Self {
        let contig = contig.into();
        Self {
            start: Locus::new(contig.clone(), start),
            end: Locus::new(contig, end),
        }
    }

    /// Contig of the interval start
    #[must_use]
    pub fn contig(&self) -> &str {
        &self.start.contig
    }

    /// True when start and end are on the same contig
    #[must_use]
    pub fn is_single_contig(&self) -> bool {
        self.start.contig == self.end.contig
    }

    /// Half-open containment: `start <= locus < end` on the interval's contig
    #[must_use]
    pub fn contains(&self, locus: &Locus) -> bool {
        self.is_single_contig()
            && locus.contig == self.start.contig
            && self.start.position <= locus.position
            && locus.position < self.end.position
    }

    /// Parse an interval in `contig:start-end` form
    ///
    /// # Errors
    ///
    /// Returns `GenomeError::Validation` if the text is not of that form.
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || GenomeError::Validation(format!("Expected 'contig:start-end', got '{s}'"));

        let (contig, range) = s.rsplit_once(':').ok_or_else(invalid)?;
        let (start, end) = range.split_once('-').ok_or_else(invalid)?;
        if contig.is_empty() {
            return Err(invalid());
        }

        Ok(Self::par(
            contig,
            parse_position(start, s)?,
            parse_position(end, s)?,
        ))
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single_contig() {
            write!(
                f,
                "{}:{}-{}",
                self.start.contig, self.start.position, self.end.position
            )
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

fn parse_position(text: &str, whole: &str) -> Result<u64> {
    let position: u64 = text
        .trim()
        .replace(',', "")
        .parse()
        .map_err(|_| GenomeError::Validation(format!("Invalid position '{text}' in '{whole}'")))?;
    if position == 0 {
        return Err(GenomeError::Validation(format!(
            "Positions are 1-based, got 0 in '{whole}'"
        )));
    }
    Ok(position)
}
