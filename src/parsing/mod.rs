//! Parsers for files a backend reads on behalf of a reference genome.
//!
//! - **FASTA index (.fai) files**: contig names and lengths in FASTA order

pub mod fai;
