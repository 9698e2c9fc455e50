//! Command-line interface for ref-genome.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **list**: List the registered reference genomes
//! - **show**: Show contigs, classification, PARs and liftovers of a genome
//! - **validate**: Check a reference genome JSON file
//! - **position**: Convert between loci and global positions
//! - **from-fai**: Derive a reference genome from a FASTA index
//!
//! ## Usage
//!
//! ```text
//! # List built-in genomes plus a custom one
//! ref-genome --reference my_ref.json list
//!
//! # Canonical JSON for a genome
//! ref-genome show GRCh37 --format json
//!
//! # Global position and PAR membership of a locus
//! ref-genome position GRCh38 chrX:2781479
//!
//! # Build a genome from a FASTA index
//! ref-genome from-fai --name toy --fasta toy.fa --x-contig X --par X:10-20 -o toy.json
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::catalog::registry::GenomeRegistry;

pub mod fasta;
pub mod genome;
pub mod position;

#[derive(Parser)]
#[command(name = "ref-genome")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Inspect, validate and build reference genome definitions")]
#[command(
    long_about = "ref-genome manages reference genome coordinate systems: named contig catalogues with lengths, X/Y/MT classification and pseudoautosomal regions.\n\nGRCh37, GRCh38 and GRCm38 are built in; additional genomes are loaded from JSON with --reference."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Additional reference genome JSON file(s) to register before running
    #[arg(long = "reference", global = true)]
    pub references: Vec<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List registered reference genomes
    List,

    /// Show details of a reference genome
    Show(genome::ShowArgs),

    /// Validate a reference genome JSON file
    Validate(genome::ValidateArgs),

    /// Global position of a locus, or the locus at a global position
    Position(position::PositionArgs),

    /// Create a reference genome from a FASTA file and its index
    FromFai(fasta::FromFaiArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Registry with the built-ins plus every `--reference` file
///
/// # Errors
///
/// Returns an error if a reference file cannot be read or is invalid.
pub fn load_registry(references: &[PathBuf]) -> anyhow::Result<GenomeRegistry> {
    let mut registry = GenomeRegistry::local()?;
    for path in references {
        let genome = registry
            .read(path)
            .map_err(|e| anyhow::anyhow!("Failed to load {}: {e}", path.display()))?;
        tracing::debug!(genome = %genome, path = %path.display(), "loaded reference");
    }
    Ok(registry)
}
