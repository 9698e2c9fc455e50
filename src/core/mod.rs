//! Core data types for reference genome coordinate systems.
//!
//! - [`ReferenceGenome`]: contig catalogue with lengths, X/Y/MT classification,
//!   pseudoautosomal regions, sequence attachment and liftovers
//! - [`ReferenceGenomeBuilder`]: incremental construction
//! - [`Locus`], [`Interval`]: 1-based positions and half-open intervals
//! - [`GenomeConfig`]: the canonical JSON form
//! - [`Liftovers`]: destination genome -> chain file edges
//!
//! ## Global positions
//!
//! Contigs laid end to end in catalogue order define a single linear
//! coordinate. For contigs `1` (100 bp), `X` (50 bp), `Y` (20 bp):
//!
//! | Contig | Length | Global offset |
//! |--------|--------|---------------|
//! | 1      | 100    | 0             |
//! | X      | 50     | 100           |
//! | Y      | 20     | 150           |

pub mod builder;
pub mod config;
pub mod genome;
pub mod liftover;
pub mod locus;

pub use builder::ReferenceGenomeBuilder;
pub use config::{ContigConfig, GenomeConfig};
pub use genome::{default_index_path, ReferenceGenome, SequenceFiles};
pub use liftover::Liftovers;
pub use locus::{Interval, Locus};
