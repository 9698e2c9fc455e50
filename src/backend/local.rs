//! In-process backend working on local files.
//!
//! FASTA indexes are read to derive or check contig lengths; FASTA and chain
//! file contents are never opened, only checked for existence.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::backend::{Backend, BackendError, FastaReference};
use crate::catalog::builtin::builtin_configs;
use crate::core::config::{ContigConfig, GenomeConfig};
use crate::core::genome::{ReferenceGenome, SequenceFiles};
use crate::core::locus::Interval;
use crate::error::Result;
use crate::parsing::fai::read_fai_file;

#[derive(Debug, Default)]
pub struct LocalBackend {
    references: HashMap<String, GenomeConfig>,
    sequences: HashMap<String, SequenceFiles>,
    /// (source, destination) -> chain file
    liftovers: HashMap<(String, String), String>,
}

impl LocalBackend {
    /// Backend that knows no genomes
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that already knows the built-in genomes
    ///
    /// # Errors
    ///
    /// Returns an error if an embedded built-in config fails to parse.
    pub fn with_builtins() -> Result<Self> {
        let mut backend = Self::new();
        for config in builtin_configs()? {
            backend.references.insert(config.name.clone(), config);
        }
        Ok(backend)
    }

    #[must_use]
    pub fn has_reference(&self, name: &str) -> bool {
        self.references.contains_key(name)
    }

    #[must_use]
    pub fn sequence(&self, name: &str) -> Option<&SequenceFiles> {
        self.sequences.get(name)
    }

    #[must_use]
    pub fn liftover_chain(&self, source: &str, destination: &str) -> Option<&str> {
        self.liftovers
            .get(&(source.to_string(), destination.to_string()))
            .map(String::as_str)
    }

    fn reference(&self, name: &str) -> Result<&GenomeConfig, BackendError> {
        self.references
            .get(name)
            .ok_or_else(|| BackendError::UnknownReference(name.to_string()))
    }
}

fn require_file(locator: &str) -> Result<(), BackendError> {
    if Path::new(locator).is_file() {
        Ok(())
    } else {
        Err(BackendError::FileNotFound(locator.to_string()))
    }
}

/// Every contig of the genome must appear in the index with the same length
fn check_index(config: &GenomeConfig, index: &[ContigConfig], index_file: &str) -> Result<(), BackendError> {
    let indexed: HashMap<&str, u64> = index.iter().map(|c| (c.name.as_str(), c.length)).collect();

    for contig in &config.contigs {
        match indexed.get(contig.name.as_str()) {
            None => {
                return Err(BackendError::Rejected(format!(
                    "Contig '{}' of reference genome '{}' is missing from FASTA index {index_file}",
                    contig.name, config.name
                )))
            }
            Some(&length) if length != contig.length => {
                return Err(BackendError::Rejected(format!(
                    "Contig '{}' has length {} in reference genome '{}' but {length} in FASTA index {index_file}",
                    contig.name, contig.length, config.name
                )))
            }
            Some(_) => {}
        }
    }
    Ok(())
}

impl Backend for LocalBackend {
    fn add_reference(&mut self, config: &GenomeConfig) -> Result<(), BackendError> {
        debug!(genome = %config.name, contigs = config.contigs.len(), "backend: add reference");
        if self
            .references
            .insert(config.name.clone(), config.clone())
            .is_some()
        {
            // Attachments belong to the replaced genome
            self.sequences.remove(&config.name);
            self.liftovers.retain(|(source, _), _| source != &config.name);
            debug!(genome = %config.name, "backend: replaced reference, dropped its sequence and liftovers");
        }
        Ok(())
    }

    fn get_reference(&self, name: &str) -> Result<GenomeConfig, BackendError> {
        self.reference(name).cloned()
    }

    fn from_fasta_file(&mut self, request: &FastaReference<'_>) -> Result<GenomeConfig, BackendError> {
        require_file(request.fasta_file)?;
        require_file(request.index_file)?;

        let contigs = read_fai_file(Path::new(request.index_file))?;
        let par = request
            .par
            .iter()
            .map(|p| Interval::parse(p))
            .collect::<Result<Vec<_>>>()
            .map_err(|e| BackendError::Rejected(e.to_string()))?;

        let config = GenomeConfig {
            name: request.name.to_string(),
            contigs,
            x_contigs: request.x_contigs.to_vec(),
            y_contigs: request.y_contigs.to_vec(),
            mt_contigs: request.mt_contigs.to_vec(),
            par,
        };
        ReferenceGenome::from_config(config.clone())
            .map_err(|e| BackendError::Rejected(e.to_string()))?;

        debug!(
            genome = request.name,
            fasta_file = request.fasta_file,
            contigs = config.contigs.len(),
            "backend: derived reference from FASTA index"
        );
        self.references.insert(config.name.clone(), config.clone());
        self.sequences.insert(
            config.name.clone(),
            SequenceFiles {
                fasta_file: request.fasta_file.to_string(),
                index_file: request.index_file.to_string(),
            },
        );
        Ok(config)
    }

    fn add_sequence(&mut self, name: &str, fasta_file: &str, index_file: &str) -> Result<(), BackendError> {
        let config = self.reference(name)?;
        if self.sequences.contains_key(name) {
            return Err(BackendError::Rejected(format!(
                "FASTA sequence has already been loaded for reference genome '{name}'"
            )));
        }
        require_file(fasta_file)?;
        require_file(index_file)?;
        check_index(config, &read_fai_file(Path::new(index_file))?, index_file)?;

        debug!(genome = name, fasta_file, index_file, "backend: add sequence");
        self.sequences.insert(
            name.to_string(),
            SequenceFiles {
                fasta_file: fasta_file.to_string(),
                index_file: index_file.to_string(),
            },
        );
        Ok(())
    }

    fn remove_sequence(&mut self, name: &str) -> Result<(), BackendError> {
        if self.sequences.remove(name).is_some() {
            debug!(genome = name, "backend: remove sequence");
        }
        Ok(())
    }

    fn add_liftover(&mut self, source: &str, chain_file: &str, destination: &str) -> Result<(), BackendError> {
        self.reference(source)?;
        self.reference(destination)?;
        require_file(chain_file)?;

        // An existing chain for the pair stays loaded; the caller reports the duplicate
        match self
            .liftovers
            .entry((source.to_string(), destination.to_string()))
        {
            Entry::Occupied(entry) => {
                debug!(source, destination, existing = %entry.get(), "backend: liftover already loaded");
            }
            Entry::Vacant(entry) => {
                debug!(source, destination, chain_file, "backend: add liftover");
                entry.insert(chain_file.to_string());
            }
        }
        Ok(())
    }

    fn remove_liftover(&mut self, source: &str, destination: &str) -> Result<(), BackendError> {
        self.liftovers
            .remove(&(source.to_string(), destination.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> String {
        let path = dir.path().join(name);
        std::fs::File::create(&path)
            .unwrap()
            .write_all(content.as_bytes())
            .unwrap();
        path.to_string_lossy().to_string()
    }

    fn toy_config() -> GenomeConfig {
        GenomeConfig::from_json(
            r#"{"name": "toy", "contigs": [{"name": "1", "length": 100}, {"name": "X", "length": 50}],
                "xContigs": ["X"]}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_builtins_known() {
        let backend = LocalBackend::with_builtins().unwrap();
        assert!(backend.has_reference("GRCh37"));
        assert!(backend.has_reference("GRCh38"));
        assert!(backend.has_reference("GRCm38"));
        assert!(!LocalBackend::new().has_reference("GRCh37"));
    }

    #[test]
    fn test_add_sequence_checks_index() {
        let dir = TempDir::new().unwrap();
        let fasta = write_file(&dir, "toy.fa", ">1\nACGT\n");
        let good = write_file(&dir, "toy.fai", "1\t100\t3\t60\t61\nX\t50\t110\t60\t61\n");
        let short = write_file(&dir, "short.fai", "1\t99\t3\t60\t61\nX\t50\t110\t60\t61\n");

        let mut backend = LocalBackend::new();
        backend.add_reference(&toy_config()).unwrap();

        assert!(matches!(
            backend.add_sequence("toy", &fasta, &short),
            Err(BackendError::Rejected(_))
        ));
        backend.add_sequence("toy", &fasta, &good).unwrap();
        assert_eq!(backend.sequence("toy").unwrap().index_file, good);

        // Second load is rejected until the first is removed
        assert!(matches!(
            backend.add_sequence("toy", &fasta, &good),
            Err(BackendError::Rejected(_))
        ));
        backend.remove_sequence("toy").unwrap();
        backend.remove_sequence("toy").unwrap();
        backend.add_sequence("toy", &fasta, &good).unwrap();
    }

    #[test]
    fn test_replaced_reference_drops_attachments() {
        let dir = TempDir::new().unwrap();
        let fasta = write_file(&dir, "toy.fa", ">1\nACGT\n");
        let index = write_file(&dir, "toy.fai", "1\t100\t3\t60\t61\nX\t50\t110\t60\t61\n");
        let chain = write_file(&dir, "toy_to_37.over.chain", "chain 1 1 100 + 0 100 1 100 + 0 100 1\n100\n");

        let mut backend = LocalBackend::with_builtins().unwrap();
        backend.add_reference(&toy_config()).unwrap();
        backend.add_sequence("toy", &fasta, &index).unwrap();
        backend.add_liftover("toy", &chain, "GRCh37").unwrap();
        backend.add_liftover("GRCh37", &chain, "toy").unwrap();

        backend.add_reference(&toy_config()).unwrap();
        assert!(backend.sequence("toy").is_none());
        assert!(backend.liftover_chain("toy", "GRCh37").is_none());
        // Edges held by other genomes survive
        assert_eq!(backend.liftover_chain("GRCh37", "toy"), Some(chain.as_str()));
        backend.add_sequence("toy", &fasta, &index).unwrap();
    }

    #[test]
    fn test_add_sequence_missing_files() {
        let mut backend = LocalBackend::new();
        backend.add_reference(&toy_config()).unwrap();
        assert!(matches!(
            backend.add_sequence("toy", "/no/such/toy.fa", "/no/such/toy.fai"),
            Err(BackendError::FileNotFound(_))
        ));
        assert!(matches!(
            backend.add_sequence("other", "/no/such/toy.fa", "/no/such/toy.fai"),
            Err(BackendError::UnknownReference(_))
        ));
    }

    #[test]
    fn test_from_fasta_file() {
        let dir = TempDir::new().unwrap();
        let fasta = write_file(&dir, "toy.fa", ">1\nACGT\n");
        let index = write_file(&dir, "toy.fai", "1\t100\t3\t60\t61\nX\t50\t110\t60\t61\n");

        let mut backend = LocalBackend::new();
        let x = vec!["X".to_string()];
        let par = vec!["X:10-20".to_string()];
        let config = backend
            .from_fasta_file(&FastaReference {
                name: "toy",
                fasta_file: &fasta,
                index_file: &index,
                x_contigs: &x,
                y_contigs: &[],
                mt_contigs: &[],
                par: &par,
            })
            .unwrap();

        assert_eq!(config.contigs.len(), 2);
        assert_eq!(config.par, vec![Interval::par("X", 10, 20)]);
        assert_eq!(backend.get_reference("toy").unwrap(), config);
        assert!(backend.sequence("toy").is_some());
    }

    #[test]
    fn test_from_fasta_file_rejects_bad_par() {
        let dir = TempDir::new().unwrap();
        let fasta = write_file(&dir, "toy.fa", ">1\nACGT\n");
        let index = write_file(&dir, "toy.fai", "1\t100\t3\t60\t61\n");

        let mut backend = LocalBackend::new();
        let par = vec!["1:10-20".to_string()];
        let result = backend.from_fasta_file(&FastaReference {
            name: "toy",
            fasta_file: &fasta,
            index_file: &index,
            x_contigs: &[],
            y_contigs: &[],
            mt_contigs: &[],
            par: &par,
        });
        assert!(matches!(result, Err(BackendError::Rejected(_))));
        assert!(!backend.has_reference("toy"));
    }

    #[test]
    fn test_liftover_requires_chain_file() {
        let dir = TempDir::new().unwrap();
        let chain = write_file(&dir, "37to38.over.chain", "chain 1 1 100 + 0 100 1 100 + 0 100 1\n100\n");

        let mut backend = LocalBackend::with_builtins().unwrap();
        assert!(matches!(
            backend.add_liftover("GRCh37", "/no/such.chain", "GRCh38"),
            Err(BackendError::FileNotFound(_))
        ));
        assert!(matches!(
            backend.add_liftover("GRCh37", &chain, "hg0"),
            Err(BackendError::UnknownReference(_))
        ));

        backend.add_liftover("GRCh37", &chain, "GRCh38").unwrap();
        assert_eq!(backend.liftover_chain("GRCh37", "GRCh38"), Some(chain.as_str()));

        // A second chain for the same pair leaves the first loaded
        let other = write_file(&dir, "37to38.v2.over.chain", "chain 1 1 100 + 0 100 1 100 + 0 100 2\n100\n");
        backend.add_liftover("GRCh37", &other, "GRCh38").unwrap();
        assert_eq!(backend.liftover_chain("GRCh37", "GRCh38"), Some(chain.as_str()));

        backend.remove_liftover("GRCh37", "GRCh38").unwrap();
        assert!(backend.liftover_chain("GRCh37", "GRCh38").is_none());
    }
}
