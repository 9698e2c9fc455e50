//! The process-wide reference genome registry and the built-in genomes.
//!
//! Every genome that coordinates refer to is resolved by name through a
//! [`GenomeRegistry`]. The registry is an explicit value: create one at
//! startup and pass it to whatever needs name resolution.
//!
//! ## Built-in genomes
//!
//! Compiled into the binary from `genomes/*.json`:
//!
//! - **GRCh37**: 1-22, X, Y, MT (NCBI naming)
//! - **GRCh38**: chr1-chr22, chrX, chrY, chrM (UCSC naming)
//! - **GRCm38**: 1-19, X, Y, MT (mouse)
//!
//! Built-in names are reserved; registering a user genome under one fails.
//!
//! ## Example
//!
//! ```rust
//! use ref_genome::{GenomeRegistry, ReferenceGenomeBuilder};
//!
//! let mut registry = GenomeRegistry::local().unwrap();
//!
//! let toy = ReferenceGenomeBuilder::new("toy")
//!     .contig("1", 100)
//!     .contig("X", 50)
//!     .x_contig("X")
//!     .par("X", 10, 20)
//!     .build()
//!     .unwrap();
//! registry.register(toy).unwrap();
//!
//! let toy = registry.get("toy").unwrap();
//! assert_eq!(toy.global_position("X").unwrap(), 100);
//! ```

pub mod builtin;
pub mod registry;
