//! Incremental construction of a [`ReferenceGenome`].
//!
//! The builder accepts single contigs or whole lists for each field and
//! defers all validation to [`ReferenceGenome::new`].

use std::collections::HashMap;

use crate::core::genome::ReferenceGenome;
use crate::core::locus::Interval;
use crate::error::Result;

#[derive(Debug, Clone, Default)]
pub struct ReferenceGenomeBuilder {
    name: String,
    contigs: Vec<String>,
    lengths: HashMap<String, u64>,
    x_contigs: Vec<String>,
    y_contigs: Vec<String>,
    mt_contigs: Vec<String>,
    par: Vec<Interval>,
}

impl ReferenceGenomeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Append a contig with its length
    #[must_use]
    pub fn contig(mut self, name: impl Into<String>, length: u64) -> Self {
        let name = name.into();
        self.lengths.insert(name.clone(), length);
        self.contigs.push(name);
        self
    }

    /// Append contigs in order. Lengths are supplied separately via [`Self::lengths`].
    #[must_use]
    pub fn contigs<I, S>(mut self, contigs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.contigs.extend(contigs.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn lengths<I, S>(mut self, lengths: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        self.lengths
            .extend(lengths.into_iter().map(|(c, l)| (c.into(), l)));
        self
    }

    #[must_use]
    pub fn x_contig(mut self, contig: impl Into<String>) -> Self {
        self.x_contigs.push(contig.into());
        self
    }

    #[must_use]
    pub fn x_contigs<I, S>(mut self, contigs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.x_contigs.extend(contigs.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn y_contig(mut self, contig: impl Into<String>) -> Self {
        self.y_contigs.push(contig.into());
        self
    }

    #[must_use]
    pub fn y_contigs<I, S>(mut self, contigs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.y_contigs.extend(contigs.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn mt_contig(mut self, contig: impl Into<String>) -> Self {
        self.mt_contigs.push(contig.into());
        self
    }

    #[must_use]
    pub fn mt_contigs<I, S>(mut self, contigs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mt_contigs.extend(contigs.into_iter().map(Into::into));
        self
    }

    /// Add a pseudoautosomal region `[start, end)` on `contig`
    #[must_use]
    pub fn par(mut self, contig: impl Into<String>, start: u64, end: u64) -> Self {
        self.par.push(Interval::par(contig, start, end));
        self
    }

    #[must_use]
    pub fn par_interval(mut self, interval: Interval) -> Self {
        self.par.push(interval);
        self
    }

    /// Validate and build the genome. The result is not registered anywhere.
    ///
    /// # Errors
    ///
    /// Returns `GenomeError::Validation` for any invariant violation.
    pub fn build(self) -> Result<ReferenceGenome> {
        ReferenceGenome::new(
            self.name,
            self.contigs,
            self.lengths,
            self.x_contigs,
            self.y_contigs,
            self.mt_contigs,
            self.par,
        )
    }
}
