use std::collections::BTreeSet;

use tracing::debug;

use crate::backend::FunctionRegistry;

/// Records which genome and liftover scopes have functions registered
#[derive(Debug, Clone, Default)]
pub struct ScopedFunctions {
    genomes: BTreeSet<String>,
    liftovers: BTreeSet<(String, String)>,
}

impl ScopedFunctions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn has_genome_functions(&self, genome: &str) -> bool {
        self.genomes.contains(genome)
    }

    #[must_use]
    pub fn has_liftover_functions(&self, source: &str, destination: &str) -> bool {
        self.liftovers
            .contains(&(source.to_string(), destination.to_string()))
    }

    /// Genome scopes in name order
    pub fn genomes(&self) -> impl Iterator<Item = &str> {
        self.genomes.iter().map(String::as_str)
    }
}

impl FunctionRegistry for ScopedFunctions {
    fn register_reference_genome_functions(&mut self, genome: &str) {
        debug!(genome, "registering reference genome functions");
        self.genomes.insert(genome.to_string());
    }

    fn register_liftover_functions(&mut self, source: &str, destination: &str) {
        debug!(source, destination, "registering liftover functions");
        self.liftovers
            .insert((source.to_string(), destination.to_string()));
    }
}
