//! Error types shared by the genome model, codec and registry.

use thiserror::Error;

use crate::backend::BackendError;

#[derive(Error, Debug)]
pub enum GenomeError {
    /// Construction input violates a reference genome invariant
    #[error("Invalid reference genome: {0}")]
    Validation(String),

    /// Name already taken by a reserved built-in genome
    #[error("Reference genome name conflict: {0}")]
    NameConflict(String),

    #[error("Contig '{contig}' is not in reference genome '{genome}'")]
    UnknownContig { contig: String, genome: String },

    #[error("Unknown reference genome: '{0}'")]
    UnknownReferenceGenome(String),

    /// Config decoded as JSON but does not describe a genome
    #[error("Malformed reference genome config: {0}")]
    MalformedConfig(String),

    #[error("Liftover already exists from {source_name} to {destination}")]
    DuplicateLiftover {
        source_name: String,
        destination: String,
    },

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse reference genome JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = GenomeError> = std::result::Result<T, E>;
