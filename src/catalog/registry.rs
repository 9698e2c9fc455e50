use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, warn};

use crate::backend::{Backend, FastaReference, FunctionRegistry, LocalBackend, ScopedFunctions};
use crate::catalog::builtin::{builtin_configs, is_builtin};
use crate::core::config::GenomeConfig;
use crate::core::genome::{ReferenceGenome, SequenceFiles};
use crate::error::{GenomeError, Result};

/// Name-keyed catalogue of every reference genome known to this process.
///
/// The registry owns the [`Backend`] and [`FunctionRegistry`] collaborators so
/// that every registration, sequence and liftover change reaches them in the
/// same order as the local state. It performs no locking: share it across
/// threads only behind a single `Mutex`.
///
/// Registering a name that is already present replaces the earlier genome,
/// except for built-in names, which are rejected.
#[derive(Debug)]
pub struct GenomeRegistry<B = LocalBackend, F = ScopedFunctions> {
    genomes: HashMap<String, ReferenceGenome>,
    backend: B,
    functions: F,
}

impl GenomeRegistry<LocalBackend, ScopedFunctions> {
    /// Registry over a [`LocalBackend`] with the built-in genomes loaded
    ///
    /// # Errors
    ///
    /// Returns an error if an embedded built-in config is invalid.
    pub fn local() -> Result<Self> {
        Self::with_builtins(LocalBackend::with_builtins()?, ScopedFunctions::new())
    }
}

impl<B: Backend, F: FunctionRegistry> GenomeRegistry<B, F> {
    /// Empty registry
    pub fn new(backend: B, functions: F) -> Self {
        Self {
            genomes: HashMap::new(),
            backend,
            functions,
        }
    }

    /// Registry holding the built-in genomes. Built-ins are not sent to the
    /// backend, which is expected to know them already.
    ///
    /// # Errors
    ///
    /// Returns an error if an embedded built-in config is invalid.
    pub fn with_builtins(backend: B, functions: F) -> Result<Self> {
        let mut registry = Self::new(backend, functions);
        for config in builtin_configs()? {
            let genome = ReferenceGenome::from_config(config)?;
            registry.insert(genome);
        }
        Ok(registry)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn functions(&self) -> &F {
        &self.functions
    }

    /// Register a user-defined genome with the backend and the registry.
    ///
    /// # Errors
    ///
    /// Returns `GenomeError::NameConflict` for a built-in name (before the
    /// backend is contacted) or `GenomeError::Backend` if the backend rejects
    /// the config; the registry is unchanged in both cases.
    pub fn register(&mut self, genome: ReferenceGenome) -> Result<&ReferenceGenome> {
        check_not_builtin(genome.name())?;
        self.backend.add_reference(&genome.to_config())?;
        Ok(self.insert(genome))
    }

    /// Decode and register a config
    ///
    /// # Errors
    ///
    /// See [`ReferenceGenome::from_config`] and [`Self::register`].
    pub fn load_config(&mut self, config: GenomeConfig) -> Result<&ReferenceGenome> {
        self.register(ReferenceGenome::from_config(config)?)
    }

    /// Load a genome from a JSON file and register it
    ///
    /// # Errors
    ///
    /// Returns `GenomeError::Io` or `GenomeError::Json` if the file cannot be
    /// read, otherwise see [`Self::load_config`].
    pub fn read(&mut self, path: &Path) -> Result<&ReferenceGenome> {
        self.load_config(GenomeConfig::read(path)?)
    }

    /// Write a registered genome's config to a JSON file
    ///
    /// # Errors
    ///
    /// Returns `GenomeError::UnknownReferenceGenome` or `GenomeError::Io`.
    pub fn write(&self, name: &str, path: &Path) -> Result<()> {
        self.get(name)?.write(path)
    }

    /// Register a genome the backend already knows, without sending it back.
    ///
    /// # Errors
    ///
    /// Returns `GenomeError::Backend` if the backend does not know `name`.
    pub fn import(&mut self, name: &str) -> Result<&ReferenceGenome> {
        let genome = ReferenceGenome::from_config(self.backend.get_reference(name)?)?;
        Ok(self.insert(genome))
    }

    /// Derive a genome from a FASTA file and its index through the backend,
    /// then register the backend's config with the sequence attached.
    ///
    /// `par` entries are `(contig, start, end)`.
    ///
    /// # Errors
    ///
    /// Returns `GenomeError::NameConflict` for a built-in name, or
    /// `GenomeError::Backend` if the backend cannot build the genome.
    #[allow(clippy::too_many_arguments)]
    pub fn from_fasta_file(
        &mut self,
        name: &str,
        fasta_file: &str,
        index_file: &str,
        x_contigs: &[String],
        y_contigs: &[String],
        mt_contigs: &[String],
        par: &[(String, u64, u64)],
    ) -> Result<&ReferenceGenome> {
        check_not_builtin(name)?;

        let par: Vec<String> = par
            .iter()
            .map(|(contig, start, end)| format!("{contig}:{start}-{end}"))
            .collect();
        let config = self.backend.from_fasta_file(&FastaReference {
            name,
            fasta_file,
            index_file,
            x_contigs,
            y_contigs,
            mt_contigs,
            par: &par,
        })?;

        let mut genome = ReferenceGenome::from_config(config)?;
        genome.set_sequence_files(SequenceFiles {
            fasta_file: fasta_file.to_string(),
            index_file: index_file.to_string(),
        });
        Ok(self.insert(genome))
    }

    fn insert(&mut self, genome: ReferenceGenome) -> &ReferenceGenome {
        self.functions
            .register_reference_genome_functions(genome.name());

        match self.genomes.entry(genome.name().to_string()) {
            Entry::Occupied(mut entry) => {
                warn!(genome = %entry.key(), "replacing previously registered reference genome");
                entry.insert(genome);
                entry.into_mut()
            }
            Entry::Vacant(entry) => {
                debug!(genome = %entry.key(), contigs = genome.contigs().len(), "registered reference genome");
                entry.insert(genome)
            }
        }
    }

    /// # Errors
    ///
    /// Returns `GenomeError::UnknownReferenceGenome` if `name` is not registered.
    pub fn get(&self, name: &str) -> Result<&ReferenceGenome> {
        self.genomes
            .get(name)
            .ok_or_else(|| GenomeError::UnknownReferenceGenome(name.to_string()))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.genomes.contains_key(name)
    }

    /// Registered names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.genomes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Registered genomes in name order
    pub fn iter(&self) -> impl Iterator<Item = &ReferenceGenome> {
        self.names().into_iter().filter_map(|name| self.genomes.get(name))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.genomes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }

    // === Sequence ===

    /// See [`ReferenceGenome::add_sequence`]
    ///
    /// # Errors
    ///
    /// Returns `GenomeError::UnknownReferenceGenome` or the backend's error.
    pub fn add_sequence(&mut self, name: &str, fasta_file: &str, index_file: Option<&str>) -> Result<()> {
        let genome = lookup_mut(&mut self.genomes, name)?;
        genome.add_sequence(&mut self.backend, fasta_file, index_file)
    }

    /// # Errors
    ///
    /// Returns `GenomeError::UnknownReferenceGenome` if `name` is not registered.
    pub fn has_sequence(&self, name: &str) -> Result<bool> {
        Ok(self.get(name)?.has_sequence())
    }

    /// See [`ReferenceGenome::remove_sequence`]
    ///
    /// # Errors
    ///
    /// Returns `GenomeError::UnknownReferenceGenome` or the backend's error.
    pub fn remove_sequence(&mut self, name: &str) -> Result<()> {
        let genome = lookup_mut(&mut self.genomes, name)?;
        genome.remove_sequence(&mut self.backend)
    }

    // === Liftover ===

    /// Register a chain file lifting `source` coordinates over to `destination`.
    /// Both genomes must be registered.
    ///
    /// # Errors
    ///
    /// Returns `GenomeError::UnknownReferenceGenome`, the backend's error, or
    /// `GenomeError::DuplicateLiftover` (after the backend has accepted the chain).
    pub fn add_liftover(&mut self, source: &str, chain_file: &str, destination: &str) -> Result<()> {
        self.get(destination)?;
        let genome = lookup_mut(&mut self.genomes, source)?;
        genome.add_liftover(&mut self.backend, &mut self.functions, chain_file, destination)
    }

    /// # Errors
    ///
    /// Returns `GenomeError::UnknownReferenceGenome` if either genome is not registered.
    pub fn has_liftover(&self, source: &str, destination: &str) -> Result<bool> {
        self.get(destination)?;
        Ok(self.get(source)?.has_liftover(destination))
    }

    /// See [`ReferenceGenome::remove_liftover`]
    ///
    /// # Errors
    ///
    /// Returns `GenomeError::UnknownReferenceGenome` or the backend's error.
    pub fn remove_liftover(&mut self, source: &str, destination: &str) -> Result<()> {
        self.get(destination)?;
        let genome = lookup_mut(&mut self.genomes, source)?;
        genome.remove_liftover(&mut self.backend, destination)
    }
}

fn lookup_mut<'a>(
    genomes: &'a mut HashMap<String, ReferenceGenome>,
    name: &str,
) -> Result<&'a mut ReferenceGenome> {
    genomes
        .get_mut(name)
        .ok_or_else(|| GenomeError::UnknownReferenceGenome(name.to_string()))
}

fn check_not_builtin(name: &str) -> Result<()> {
    if is_builtin(name) {
        return Err(GenomeError::NameConflict(format!(
            "'{name}' is a built-in reference genome and cannot be redefined"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::builder::ReferenceGenomeBuilder;

    fn toy(name: &str, length: u64) -> ReferenceGenome {
        ReferenceGenomeBuilder::new(name)
            .contig("1", length)
            .build()
            .unwrap()
    }

    #[test]
    fn test_local_registry_has_builtins() {
        let registry = GenomeRegistry::local().unwrap();
        assert_eq!(registry.names(), vec!["GRCh37", "GRCh38", "GRCm38"]);
        assert!(registry.functions().has_genome_functions("GRCh38"));
        assert!(!registry.backend().has_reference("toy"));
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = GenomeRegistry::new(LocalBackend::new(), ScopedFunctions::new());
        assert!(registry.is_empty());

        registry.register(toy("toy", 100)).unwrap();
        assert_eq!(registry.get("toy").unwrap().contig_length("1").unwrap(), 100);
        assert!(registry.backend().has_reference("toy"));
        assert!(registry.functions().has_genome_functions("toy"));
        assert!(matches!(
            registry.get("missing"),
            Err(GenomeError::UnknownReferenceGenome(_))
        ));
    }

    #[test]
    fn test_register_replaces_user_genome() {
        let mut registry = GenomeRegistry::new(LocalBackend::new(), ScopedFunctions::new());
        registry.register(toy("toy", 100)).unwrap();
        let replaced = registry.register(toy("toy", 200)).unwrap();
        assert_eq!(replaced.contig_length("1").unwrap(), 200);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("toy").unwrap().contig_length("1").unwrap(), 200);
    }

    #[test]
    fn test_builtin_names_protected() {
        let mut registry = GenomeRegistry::local().unwrap();
        let result = registry.register(toy("GRCh37", 100));
        assert!(matches!(result, Err(GenomeError::NameConflict(_))));
        assert_eq!(registry.get("GRCh37").unwrap().contigs().len(), 25);
    }

    #[test]
    fn test_import_from_backend() {
        let mut backend = LocalBackend::new();
        backend.add_reference(&toy("toy", 100).to_config()).unwrap();
        let mut registry = GenomeRegistry::new(backend, ScopedFunctions::new());

        assert!(!registry.contains("toy"));
        registry.import("toy").unwrap();
        assert!(registry.contains("toy"));
        assert!(registry.import("other").is_err());
    }

    #[test]
    fn test_liftover_requires_registered_destination() {
        let mut registry = GenomeRegistry::local().unwrap();
        assert!(matches!(
            registry.add_liftover("GRCh37", "chain.gz", "hg0"),
            Err(GenomeError::UnknownReferenceGenome(_))
        ));
        assert!(matches!(
            registry.has_liftover("GRCh37", "hg0"),
            Err(GenomeError::UnknownReferenceGenome(_))
        ));
        assert!(!registry.has_liftover("GRCh37", "GRCh38").unwrap());
    }
}
