//! Collaborators that hold loaded sequences and chain files.
//!
//! A reference genome only records metadata; loading a FASTA, validating a
//! chain file or deriving contigs from a FASTA index is delegated to a
//! [`Backend`]. A [`FunctionRegistry`] is told when genome-scoped and
//! liftover-scoped functions become available.
//!
//! Both are injected into [`crate::GenomeRegistry`] at construction time.
//! [`LocalBackend`] and [`ScopedFunctions`] are the in-process implementations.

use thiserror::Error;

use crate::core::config::GenomeConfig;
use crate::parsing::fai::ParseError;

pub mod functions;
pub mod local;

pub use functions::ScopedFunctions;
pub use local::LocalBackend;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid FASTA index: {0}")]
    Index(#[from] ParseError),

    #[error("Reference genome '{0}' is not known to the backend")]
    UnknownReference(String),

    #[error("{0}")]
    Rejected(String),
}

/// Request to derive a reference genome from a FASTA file and its index.
///
/// PAR intervals cross this boundary as `contig:start-end` strings.
#[derive(Debug, Clone)]
pub struct FastaReference<'a> {
    pub name: &'a str,
    pub fasta_file: &'a str,
    pub index_file: &'a str,
    pub x_contigs: &'a [String],
    pub y_contigs: &'a [String],
    pub mt_contigs: &'a [String],
    pub par: &'a [String],
}

/// Holder of reference configs, loaded sequences and liftover chains.
///
/// Calls are blocking; failures propagate unchanged to the caller.
pub trait Backend {
    /// Register a non-built-in genome
    fn add_reference(&mut self, config: &GenomeConfig) -> Result<(), BackendError>;

    /// Config of a genome the backend knows about
    fn get_reference(&self, name: &str) -> Result<GenomeConfig, BackendError>;

    /// Build, register and attach the sequence of a genome described by a
    /// FASTA file and its index
    fn from_fasta_file(&mut self, request: &FastaReference<'_>) -> Result<GenomeConfig, BackendError>;

    fn add_sequence(&mut self, name: &str, fasta_file: &str, index_file: &str) -> Result<(), BackendError>;

    fn remove_sequence(&mut self, name: &str) -> Result<(), BackendError>;

    fn add_liftover(&mut self, source: &str, chain_file: &str, destination: &str) -> Result<(), BackendError>;

    fn remove_liftover(&mut self, source: &str, destination: &str) -> Result<(), BackendError>;
}

/// Receiver of notifications that scoped functions now exist
pub trait FunctionRegistry {
    fn register_reference_genome_functions(&mut self, genome: &str);

    fn register_liftover_functions(&mut self, source: &str, destination: &str);
}
