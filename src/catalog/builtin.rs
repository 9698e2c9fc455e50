use crate::core::config::GenomeConfig;
use crate::error::Result;

/// Names of the built-in reference genomes. These cannot be replaced.
pub const BUILTIN_NAMES: [&str; 3] = ["GRCh37", "GRCh38", "GRCm38"];

// Embedded at compile time; validated by build.rs
const GRCH37: &str = include_str!("../../genomes/GRCh37.json");
const GRCH38: &str = include_str!("../../genomes/GRCh38.json");
const GRCM38: &str = include_str!("../../genomes/GRCm38.json");

#[must_use]
pub fn is_builtin(name: &str) -> bool {
    BUILTIN_NAMES.contains(&name)
}

/// Configs of all built-in genomes, in [`BUILTIN_NAMES`] order
///
/// # Errors
///
/// Returns `GenomeError::Json` if an embedded config does not parse.
pub fn builtin_configs() -> Result<Vec<GenomeConfig>> {
    [GRCH37, GRCH38, GRCM38]
        .iter()
        .map(|json| GenomeConfig::from_json(json))
        .collect()
}
