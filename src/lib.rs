//! # ref-genome
//!
//! A library for describing reference genome coordinate systems.
//!
//! A reference genome is a named catalogue of contigs with lengths, a
//! classification of X, Y and mitochondrial contigs, and pseudoautosomal
//! regions (PARs). Genomic computations resolve a genome by name, then ask it
//! for contig lengths, global positions, PAR membership or liftover
//! availability.
//!
//! ## Features
//!
//! - **Validated model**: contig/length consistency, classification and PAR
//!   bounds are checked at construction
//! - **Canonical JSON**: one config format for files, interchange and equality
//! - **Global positions**: contigs laid end to end in catalogue order
//! - **Registry**: name resolution with reserved built-ins (GRCh37, GRCh38, GRCm38)
//! - **Sequences and liftovers**: FASTA and chain file registration delegated
//!   to a pluggable backend
//!
//! ## Example
//!
//! ```rust,no_run
//! use ref_genome::{GenomeRegistry, Locus};
//! use std::path::Path;
//!
//! let mut registry = GenomeRegistry::local().unwrap();
//! registry.read(Path::new("my_reference.json")).unwrap();
//!
//! let grch37 = registry.get("GRCh37").unwrap();
//! let locus = Locus::parse("X:60001").unwrap();
//! assert!(grch37.in_par(&locus));
//!
//! registry
//!     .add_sequence("GRCh37", "human_g1k_v37.fasta.gz", None)
//!     .unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Genome, locus, interval, liftover and config types
//! - [`catalog`]: The registry and built-in genomes
//! - [`backend`]: Backend and function-registry collaborators
//! - [`parsing`]: FASTA index reader
//! - [`cli`]: Command-line interface implementation

pub mod backend;
pub mod catalog;
pub mod cli;
pub mod core;
pub mod error;
pub mod parsing;

// Re-export commonly used types for convenience
pub use backend::{Backend, BackendError, FunctionRegistry, LocalBackend, ScopedFunctions};
pub use catalog::registry::GenomeRegistry;
pub use crate::core::{
    GenomeConfig, Interval, Liftovers, Locus, ReferenceGenome, ReferenceGenomeBuilder,
    SequenceFiles,
};
pub use error::{GenomeError, Result};
