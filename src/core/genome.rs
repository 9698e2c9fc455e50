use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use tracing::debug;

use crate::backend::{Backend, FunctionRegistry};
use crate::core::liftover::Liftovers;
use crate::core::locus::{Interval, Locus};
use crate::error::{GenomeError, Result};

/// FASTA and FASTA index locators for a loaded reference sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceFiles {
    pub fasta_file: String,
    pub index_file: String,
}

/// Cumulative contig offsets, computed on first use
#[derive(Debug, Clone)]
struct GlobalPositions {
    by_name: HashMap<String, u64>,
    /// Offset of each contig, in catalogue order
    starts: Vec<u64>,
    total: u64,
}

/// A reference genome: an ordered contig catalogue with lengths, sex and
/// mitochondrial contig classification, and pseudoautosomal regions.
///
/// Equality compares the canonical config (see [`crate::core::config`]), so
/// two genomes with the same name but different contigs are unequal even
/// though they hash identically. The sequence attachment and liftovers are
/// runtime state and take no part in equality.
#[derive(Debug, Clone)]
pub struct ReferenceGenome {
    name: String,
    contigs: Vec<String>,
    lengths: HashMap<String, u64>,
    x_contigs: Vec<String>,
    y_contigs: Vec<String>,
    mt_contigs: Vec<String>,
    par: Vec<Interval>,
    sequence: Option<SequenceFiles>,
    liftovers: Liftovers,
    global_positions: OnceLock<GlobalPositions>,
}

impl ReferenceGenome {
    /// Create a validated reference genome.
    ///
    /// Contig classification lists may overlap (a contig may be both an X and
    /// a Y contig); only membership in `contigs` is enforced.
    ///
    /// # Errors
    ///
    /// Returns `GenomeError::Validation` if the name is empty, there are no
    /// contigs, a contig is duplicated, `lengths` does not cover exactly the
    /// contigs, a length is zero, an X/Y/MT contig is unknown, or a PAR
    /// interval is not a non-empty range within an X or Y contig.
    pub fn new(
        name: impl Into<String>,
        contigs: Vec<String>,
        lengths: HashMap<String, u64>,
        x_contigs: Vec<String>,
        y_contigs: Vec<String>,
        mt_contigs: Vec<String>,
        par: Vec<Interval>,
    ) -> Result<Self> {
        let genome = Self {
            name: name.into(),
            contigs,
            lengths,
            x_contigs,
            y_contigs,
            mt_contigs,
            par,
            sequence: None,
            liftovers: Liftovers::new(),
            global_positions: OnceLock::new(),
        };
        genome.validate()?;
        Ok(genome)
    }

    fn validate(&self) -> Result<()> {
        let name = &self.name;
        if name.is_empty() {
            return Err(GenomeError::Validation(
                "Reference genome name must not be empty".to_string(),
            ));
        }
        if self.contigs.is_empty() {
            return Err(GenomeError::Validation(format!(
                "Reference genome '{name}' must have at least one contig"
            )));
        }

        let mut seen = HashSet::with_capacity(self.contigs.len());
        let mut total = 0u64;
        for contig in &self.contigs {
            if !seen.insert(contig.as_str()) {
                return Err(GenomeError::Validation(format!(
                    "Duplicate contig '{contig}' in reference genome '{name}'"
                )));
            }
            match self.lengths.get(contig) {
                None => {
                    return Err(GenomeError::Validation(format!(
                        "Contig '{contig}' has no length in reference genome '{name}'"
                    )))
                }
                Some(0) => {
                    return Err(GenomeError::Validation(format!(
                        "Contig '{contig}' in reference genome '{name}' must have positive length"
                    )))
                }
                Some(&length) => {
                    total = total.checked_add(length).ok_or_else(|| {
                        GenomeError::Validation(format!(
                            "Total length of reference genome '{name}' exceeds {}",
                            u64::MAX
                        ))
                    })?;
                }
            }
        }
        if let Some(extra) = self.lengths.keys().find(|c| !seen.contains(c.as_str())) {
            return Err(GenomeError::Validation(format!(
                "Length given for '{extra}', which is not a contig of reference genome '{name}'"
            )));
        }

        for (kind, list) in [
            ("X", &self.x_contigs),
            ("Y", &self.y_contigs),
            ("MT", &self.mt_contigs),
        ] {
            if let Some(unknown) = list.iter().find(|c| !seen.contains(c.as_str())) {
                return Err(GenomeError::Validation(format!(
                    "{kind} contig '{unknown}' is not a contig of reference genome '{name}'"
                )));
            }
        }

        for interval in &self.par {
            self.validate_par(interval)?;
        }

        Ok(())
    }

    fn validate_par(&self, interval: &Interval) -> Result<()> {
        let name = &self.name;
        if !interval.is_single_contig() {
            return Err(GenomeError::Validation(format!(
                "PAR interval {interval} in reference genome '{name}' spans more than one contig"
            )));
        }
        let contig = interval.contig();
        if !self.is_x(contig) && !self.is_y(contig) {
            return Err(GenomeError::Validation(format!(
                "PAR interval {interval} in reference genome '{name}' is not on an X or Y contig"
            )));
        }
        let length = self.lengths[contig];
        let (start, end) = (interval.start.position, interval.end.position);
        if start < 1 || start >= end || end > length {
            return Err(GenomeError::Validation(format!(
                "PAR interval {interval} in reference genome '{name}' must satisfy 1 <= start < end <= {length}"
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Contig names in catalogue order
    #[must_use]
    pub fn contigs(&self) -> &[String] {
        &self.contigs
    }

    #[must_use]
    pub fn lengths(&self) -> &HashMap<String, u64> {
        &self.lengths
    }

    #[must_use]
    pub fn x_contigs(&self) -> &[String] {
        &self.x_contigs
    }

    #[must_use]
    pub fn y_contigs(&self) -> &[String] {
        &self.y_contigs
    }

    #[must_use]
    pub fn mt_contigs(&self) -> &[String] {
        &self.mt_contigs
    }

    /// Pseudoautosomal regions
    #[must_use]
    pub fn par(&self) -> &[Interval] {
        &self.par
    }

    #[must_use]
    pub fn has_contig(&self, contig: &str) -> bool {
        self.lengths.contains_key(contig)
    }

    #[must_use]
    pub fn is_x(&self, contig: &str) -> bool {
        self.x_contigs.iter().any(|c| c == contig)
    }

    #[must_use]
    pub fn is_y(&self, contig: &str) -> bool {
        self.y_contigs.iter().any(|c| c == contig)
    }

    #[must_use]
    pub fn is_mt(&self, contig: &str) -> bool {
        self.mt_contigs.iter().any(|c| c == contig)
    }

    /// # Errors
    ///
    /// Returns `GenomeError::UnknownContig` if the contig is not in this genome.
    pub fn contig_length(&self, contig: &str) -> Result<u64> {
        self.lengths
            .get(contig)
            .copied()
            .ok_or_else(|| self.unknown_contig(contig))
    }

    /// Sum of all contig lengths
    #[must_use]
    pub fn total_length(&self) -> u64 {
        self.positions().total
    }

    /// Zero-based offset of a contig's first base when all contigs are laid
    /// end to end in catalogue order.
    ///
    /// # Errors
    ///
    /// Returns `GenomeError::UnknownContig` if the contig is not in this genome.
    pub fn global_position(&self, contig: &str) -> Result<u64> {
        self.positions()
            .by_name
            .get(contig)
            .copied()
            .ok_or_else(|| self.unknown_contig(contig))
    }

    /// Zero-based global position of a locus.
    ///
    /// # Errors
    ///
    /// Returns the error from [`Self::validate_locus`].
    pub fn locus_global_position(&self, locus: &Locus) -> Result<u64> {
        self.validate_locus(locus)?;
        Ok(self.global_position(&locus.contig)? + locus.position - 1)
    }

    /// Inverse of [`Self::locus_global_position`].
    ///
    /// # Errors
    ///
    /// Returns `GenomeError::Validation` if the position is at or past the
    /// end of the last contig.
    pub fn locus_from_global_position(&self, global: u64) -> Result<Locus> {
        let positions = self.positions();
        if global >= positions.total {
            return Err(GenomeError::Validation(format!(
                "Global position {global} is past the end of reference genome '{}' (length {})",
                self.name, positions.total
            )));
        }
        let index = positions.starts.partition_point(|&start| start <= global) - 1;
        Ok(Locus::new(
            self.contigs[index].clone(),
            global - positions.starts[index] + 1,
        ))
    }

    /// Check that a locus names a contig of this genome and lies within it.
    ///
    /// # Errors
    ///
    /// Returns `GenomeError::UnknownContig` for an unknown contig and
    /// `GenomeError::Validation` for a position outside `[1, length]`.
    pub fn validate_locus(&self, locus: &Locus) -> Result<()> {
        let length = self.contig_length(&locus.contig)?;
        if locus.position < 1 || locus.position > length {
            return Err(GenomeError::Validation(format!(
                "Invalid locus '{locus}' for reference genome '{}': position must be within [1, {length}]",
                self.name
            )));
        }
        Ok(())
    }

    /// True if the locus is on an X contig and inside a PAR
    #[must_use]
    pub fn in_x_par(&self, locus: &Locus) -> bool {
        self.is_x(&locus.contig) && self.par.iter().any(|p| p.contains(locus))
    }

    /// True if the locus is on a Y contig and inside a PAR
    #[must_use]
    pub fn in_y_par(&self, locus: &Locus) -> bool {
        self.is_y(&locus.contig) && self.par.iter().any(|p| p.contains(locus))
    }

    #[must_use]
    pub fn in_par(&self, locus: &Locus) -> bool {
        self.in_x_par(locus) || self.in_y_par(locus)
    }

    fn positions(&self) -> &GlobalPositions {
        self.global_positions.get_or_init(|| {
            let mut by_name = HashMap::with_capacity(self.contigs.len());
            let mut starts = Vec::with_capacity(self.contigs.len());
            let mut offset = 0u64;
            for contig in &self.contigs {
                by_name.insert(contig.clone(), offset);
                starts.push(offset);
                offset += self.lengths[contig];
            }
            GlobalPositions {
                by_name,
                starts,
                total: offset,
            }
        })
    }

    fn unknown_contig(&self, contig: &str) -> GenomeError {
        GenomeError::UnknownContig {
            contig: contig.to_string(),
            genome: self.name.clone(),
        }
    }

    // === Sequence attachment ===

    /// Load the reference sequence through the backend.
    ///
    /// When `index_file` is `None` it is derived from `fasta_file` with
    /// [`default_index_path`]. The attachment is recorded only after the
    /// backend accepts it. A second call is not guarded here; the backend
    /// decides whether a genome may have its sequence replaced.
    ///
    /// # Errors
    ///
    /// Returns `GenomeError::Backend` if the backend rejects the files.
    pub fn add_sequence(
        &mut self,
        backend: &mut dyn Backend,
        fasta_file: &str,
        index_file: Option<&str>,
    ) -> Result<()> {
        let index_file = index_file.map_or_else(|| default_index_path(fasta_file), str::to_string);
        backend.add_sequence(&self.name, fasta_file, &index_file)?;
        debug!(genome = %self.name, fasta_file, index_file = %index_file, "added sequence");
        self.sequence = Some(SequenceFiles {
            fasta_file: fasta_file.to_string(),
            index_file,
        });
        Ok(())
    }

    #[must_use]
    pub fn has_sequence(&self) -> bool {
        self.sequence.is_some()
    }

    #[must_use]
    pub fn sequence_files(&self) -> Option<&SequenceFiles> {
        self.sequence.as_ref()
    }

    pub(crate) fn set_sequence_files(&mut self, files: SequenceFiles) {
        self.sequence = Some(files);
    }

    /// Drop the sequence attachment and ask the backend to release it.
    ///
    /// The backend is asked even when no sequence is attached. Local state is
    /// cleared first and is not restored if the backend call fails.
    ///
    /// # Errors
    ///
    /// Returns `GenomeError::Backend` if the backend fails to release it.
    pub fn remove_sequence(&mut self, backend: &mut dyn Backend) -> Result<()> {
        self.sequence = None;
        backend.remove_sequence(&self.name)?;
        debug!(genome = %self.name, "removed sequence");
        Ok(())
    }

    // === Liftover ===

    /// Register a chain file for lifting coordinates over to `destination`.
    ///
    /// The backend validates and loads the chain first; only then is an
    /// existing edge to `destination` detected, so a duplicate registration
    /// still costs one backend call before it fails.
    ///
    /// # Errors
    ///
    /// Returns `GenomeError::Backend` if the backend rejects the chain, or
    /// `GenomeError::DuplicateLiftover` if an edge to `destination` exists.
    pub fn add_liftover(
        &mut self,
        backend: &mut dyn Backend,
        functions: &mut dyn FunctionRegistry,
        chain_file: &str,
        destination: &str,
    ) -> Result<()> {
        backend.add_liftover(&self.name, chain_file, destination)?;
        if !self.liftovers.insert(destination, chain_file) {
            return Err(GenomeError::DuplicateLiftover {
                source_name: self.name.clone(),
                destination: destination.to_string(),
            });
        }
        functions.register_liftover_functions(&self.name, destination);
        debug!(source = %self.name, destination, chain_file, "added liftover");
        Ok(())
    }

    #[must_use]
    pub fn has_liftover(&self, destination: &str) -> bool {
        self.liftovers.contains(destination)
    }

    #[must_use]
    pub fn liftover_chain(&self, destination: &str) -> Option<&str> {
        self.liftovers.chain_file(destination)
    }

    #[must_use]
    pub fn liftovers(&self) -> &Liftovers {
        &self.liftovers
    }

    /// Remove the liftover to `destination`. No-op (and no backend call) if
    /// there is none.
    ///
    /// # Errors
    ///
    /// Returns `GenomeError::Backend` if the backend fails to forget the
    /// chain; the local edge is already gone at that point.
    pub fn remove_liftover(&mut self, backend: &mut dyn Backend, destination: &str) -> Result<()> {
        if self.liftovers.remove(destination).is_some() {
            backend.remove_liftover(&self.name, destination)?;
            debug!(source = %self.name, destination, "removed liftover");
        }
        Ok(())
    }
}

impl PartialEq for ReferenceGenome {
    fn eq(&self, other: &Self) -> bool {
        self.to_config() == other.to_config()
    }
}

impl Eq for ReferenceGenome {}

// Name only: equal hashes do not imply equal genomes.
impl Hash for ReferenceGenome {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for ReferenceGenome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Default FASTA index locator: the FASTA file name with its last extension
/// replaced by `.fai` (`ref.fasta.gz` becomes `ref.fasta.fai`). A file name
/// without an extension gets `.fai` appended.
#[must_use]
pub fn default_index_path(fasta_file: &str) -> String {
    let file_start = fasta_file.rfind('/').map_or(0, |i| i + 1);
    match fasta_file[file_start..].rfind('.') {
        Some(dot) => format!("{}.fai", &fasta_file[..file_start + dot]),
        None => format!("{fasta_file}.fai"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::builder::ReferenceGenomeBuilder;

    fn toy() -> ReferenceGenome {
        ReferenceGenomeBuilder::new("toy")
            .contig("1", 100)
            .contig("X", 50)
            .contig("Y", 20)
            .contig("MT", 5)
            .x_contig("X")
            .y_contig("Y")
            .mt_contig("MT")
            .par("X", 10, 20)
            .build()
            .unwrap()
    }

    fn lengths(pairs: &[(&str, u64)]) -> HashMap<String, u64> {
        pairs.iter().map(|(c, l)| ((*c).to_string(), *l)).collect()
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_global_positions() {
        let rg = toy();
        assert_eq!(rg.global_position("1").unwrap(), 0);
        assert_eq!(rg.global_position("X").unwrap(), 100);
        assert_eq!(rg.global_position("Y").unwrap(), 150);
        assert_eq!(rg.global_position("MT").unwrap(), 170);
        assert_eq!(rg.total_length(), 175);
        assert!(matches!(
            rg.global_position("2"),
            Err(GenomeError::UnknownContig { .. })
        ));
    }

    #[test]
    fn test_global_position_monotonic() {
        let rg = toy();
        for pair in rg.contigs().windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert_eq!(
                rg.global_position(b).unwrap(),
                rg.global_position(a).unwrap() + rg.contig_length(a).unwrap()
            );
        }
    }

    #[test]
    fn test_rejects_total_length_overflow() {
        let half = u64::MAX / 2 + 1;
        let result = ReferenceGenomeBuilder::new("huge")
            .contig("1", half)
            .contig("2", half)
            .build();
        assert!(matches!(result, Err(GenomeError::Validation(ref msg)) if msg.contains("Total length")));

        let rg = ReferenceGenomeBuilder::new("huge")
            .contig("1", half)
            .contig("2", half - 1)
            .build()
            .unwrap();
        assert_eq!(rg.total_length(), u64::MAX);
        assert_eq!(rg.global_position("2").unwrap(), half);
    }

    #[test]
    fn test_contig_length() {
        let rg = toy();
        assert_eq!(rg.contig_length("MT").unwrap(), 5);
        let err = rg.contig_length("2").unwrap_err();
        assert!(matches!(err, GenomeError::UnknownContig { ref contig, .. } if contig == "2"));
    }

    #[test]
    fn test_locus_global_position_round_trip() {
        let rg = toy();
        assert_eq!(rg.locus_global_position(&Locus::new("1", 1)).unwrap(), 0);
        assert_eq!(rg.locus_global_position(&Locus::new("X", 1)).unwrap(), 100);
        assert_eq!(rg.locus_global_position(&Locus::new("MT", 5)).unwrap(), 174);

        assert_eq!(rg.locus_from_global_position(0).unwrap(), Locus::new("1", 1));
        assert_eq!(rg.locus_from_global_position(99).unwrap(), Locus::new("1", 100));
        assert_eq!(rg.locus_from_global_position(100).unwrap(), Locus::new("X", 1));
        assert_eq!(rg.locus_from_global_position(174).unwrap(), Locus::new("MT", 5));
        assert!(rg.locus_from_global_position(175).is_err());
    }

    #[test]
    fn test_validate_locus() {
        let rg = toy();
        assert!(rg.validate_locus(&Locus::new("X", 50)).is_ok());
        assert!(matches!(
            rg.validate_locus(&Locus::new("X", 51)),
            Err(GenomeError::Validation(_))
        ));
        assert!(matches!(
            rg.validate_locus(&Locus::new("X", 0)),
            Err(GenomeError::Validation(_))
        ));
        assert!(matches!(
            rg.validate_locus(&Locus::new("2", 1)),
            Err(GenomeError::UnknownContig { .. })
        ));
    }

    #[test]
    fn test_par_membership() {
        let rg = toy();
        assert!(rg.in_x_par(&Locus::new("X", 10)));
        assert!(rg.in_par(&Locus::new("X", 19)));
        assert!(!rg.in_par(&Locus::new("X", 20)));
        assert!(!rg.in_y_par(&Locus::new("X", 15)));
        assert!(!rg.in_par(&Locus::new("Y", 15)));
    }

    #[test]
    fn test_rejects_par_on_autosome() {
        let result = ReferenceGenome::new(
            "bad",
            names(&["1", "X"]),
            lengths(&[("1", 100), ("X", 50)]),
            names(&["X"]),
            vec![],
            vec![],
            vec![Interval::par("1", 10, 20)],
        );
        assert!(matches!(result, Err(GenomeError::Validation(_))));
    }

    #[test]
    fn test_rejects_bad_par_positions() {
        for (start, end) in [(20, 20), (20, 10), (10, 51), (0, 5)] {
            let result = ReferenceGenome::new(
                "bad",
                names(&["X"]),
                lengths(&[("X", 50)]),
                names(&["X"]),
                vec![],
                vec![],
                vec![Interval::par("X", start, end)],
            );
            assert!(
                matches!(result, Err(GenomeError::Validation(_))),
                "PAR X:{start}-{end} should be rejected"
            );
        }
    }

    #[test]
    fn test_accepts_par_ending_at_contig_end() {
        let result = ReferenceGenome::new(
            "edge",
            names(&["X"]),
            lengths(&[("X", 50)]),
            names(&["X"]),
            vec![],
            vec![],
            vec![Interval::par("X", 1, 50)],
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_rejects_mixed_contig_par() {
        let result = ReferenceGenome::new(
            "bad",
            names(&["X", "Y"]),
            lengths(&[("X", 50), ("Y", 50)]),
            names(&["X"]),
            names(&["Y"]),
            vec![],
            vec![Interval::new(Locus::new("X", 1), Locus::new("Y", 10))],
        );
        assert!(matches!(result, Err(GenomeError::Validation(_))));
    }

    #[test]
    fn test_rejects_contig_length_mismatch() {
        let missing = ReferenceGenome::new(
            "bad",
            names(&["1", "2"]),
            lengths(&[("1", 100)]),
            vec![],
            vec![],
            vec![],
            vec![],
        );
        assert!(matches!(missing, Err(GenomeError::Validation(_))));

        let extra = ReferenceGenome::new(
            "bad",
            names(&["1"]),
            lengths(&[("1", 100), ("2", 100)]),
            vec![],
            vec![],
            vec![],
            vec![],
        );
        assert!(matches!(extra, Err(GenomeError::Validation(_))));

        let zero = ReferenceGenome::new(
            "bad",
            names(&["1"]),
            lengths(&[("1", 0)]),
            vec![],
            vec![],
            vec![],
            vec![],
        );
        assert!(matches!(zero, Err(GenomeError::Validation(_))));
    }

    #[test]
    fn test_rejects_duplicate_contig() {
        let result = ReferenceGenome::new(
            "bad",
            names(&["1", "1"]),
            lengths(&[("1", 100)]),
            vec![],
            vec![],
            vec![],
            vec![],
        );
        assert!(matches!(result, Err(GenomeError::Validation(_))));
    }

    #[test]
    fn test_rejects_unknown_classified_contig() {
        let result = ReferenceGenome::new(
            "bad",
            names(&["1"]),
            lengths(&[("1", 100)]),
            vec![],
            vec![],
            names(&["MT"]),
            vec![],
        );
        assert!(matches!(result, Err(GenomeError::Validation(_))));
    }

    #[test]
    fn test_overlapping_classification_is_permitted() {
        // A contig may be listed as both X and Y (and MT); nothing forbids it.
        let rg = ReferenceGenome::new(
            "overlap",
            names(&["XY"]),
            lengths(&[("XY", 100)]),
            names(&["XY"]),
            names(&["XY"]),
            names(&["XY"]),
            vec![Interval::par("XY", 1, 10)],
        )
        .unwrap();
        assert!(rg.is_x("XY") && rg.is_y("XY") && rg.is_mt("XY"));
        assert!(rg.in_x_par(&Locus::new("XY", 5)));
        assert!(rg.in_y_par(&Locus::new("XY", 5)));
    }

    #[test]
    fn test_equality_and_hash() {
        use std::collections::hash_map::DefaultHasher;

        fn hash_of(rg: &ReferenceGenome) -> u64 {
            let mut hasher = DefaultHasher::new();
            rg.hash(&mut hasher);
            hasher.finish()
        }

        let a = toy();
        let b = toy();
        assert_eq!(a, b);

        // Same name, different contigs: same hash, not equal
        let c = ReferenceGenomeBuilder::new("toy").contig("1", 100).build().unwrap();
        assert_ne!(a, c);
        assert_eq!(hash_of(&a), hash_of(&c));
    }

    #[test]
    fn test_default_index_path() {
        assert_eq!(default_index_path("ref.fasta"), "ref.fai");
        assert_eq!(
            default_index_path("gs://hail-common/references/human_g1k_v37.fasta.gz"),
            "gs://hail-common/references/human_g1k_v37.fasta.fai"
        );
        assert_eq!(default_index_path("/data/v1.2/genome"), "/data/v1.2/genome.fai");
    }
}
