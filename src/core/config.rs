//! Canonical JSON form of a reference genome.
//!
//! The config is both the file format and the equality key:
//!
//! ```json
//! {"name": "my_reference_genome",
//!  "contigs": [{"name": "1", "length": 10000000},
//!              {"name": "X", "length": 19856300},
//!              {"name": "Y", "length": 78140000},
//!              {"name": "MT", "length": 532}],
//!  "xContigs": ["X"],
//!  "yContigs": ["Y"],
//!  "mtContigs": ["MT"],
//!  "par": [{"start": {"contig": "X", "position": 60001},
//!           "end": {"contig": "X", "position": 2699521}}]}
//! ```
//!
//! `xContigs`, `yContigs`, `mtContigs` and `par` may be omitted when reading.

use serde::{Deserialize, Serialize};
use std::path::Path;

use tracing::info;

use crate::core::genome::ReferenceGenome;
use crate::core::locus::Interval;
use crate::error::{GenomeError, Result};

/// Contig entry of a [`GenomeConfig`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContigConfig {
    pub name: String,
    pub length: u64,
}

/// Serializable reference genome definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenomeConfig {
    pub name: String,
    pub contigs: Vec<ContigConfig>,
    #[serde(default)]
    pub x_contigs: Vec<String>,
    #[serde(default)]
    pub y_contigs: Vec<String>,
    #[serde(default)]
    pub mt_contigs: Vec<String>,
    #[serde(default)]
    pub par: Vec<Interval>,
}

impl GenomeConfig {
    /// Parse a config from JSON text
    ///
    /// # Errors
    ///
    /// Returns `GenomeError::Json` if the text is not a config.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// # Errors
    ///
    /// Returns `GenomeError::Json` if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// # Errors
    ///
    /// Returns `GenomeError::Io` if the file cannot be read and
    /// `GenomeError::Json` if it is not a config.
    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// # Errors
    ///
    /// Returns `GenomeError::Io` if the file cannot be written.
    pub fn write(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        info!(genome = %self.name, path = %path.display(), "wrote reference genome");
        Ok(())
    }
}

impl ReferenceGenome {
    /// Encode to the canonical config, reflecting the current state
    #[must_use]
    pub fn to_config(&self) -> GenomeConfig {
        GenomeConfig {
            name: self.name().to_string(),
            contigs: self
                .contigs()
                .iter()
                .map(|name| ContigConfig {
                    name: name.clone(),
                    length: self.lengths()[name],
                })
                .collect(),
            x_contigs: self.x_contigs().to_vec(),
            y_contigs: self.y_contigs().to_vec(),
            mt_contigs: self.mt_contigs().to_vec(),
            par: self.par().to_vec(),
        }
    }

    /// Decode a config into a validated genome. The genome is not registered.
    ///
    /// # Errors
    ///
    /// Returns `GenomeError::MalformedConfig` if a PAR entry has different
    /// contigs at start and end, or `GenomeError::Validation` for any other
    /// invariant violation.
    pub fn from_config(config: GenomeConfig) -> Result<Self> {
        if let Some(bad) = config.par.iter().find(|p| !p.is_single_contig()) {
            return Err(GenomeError::MalformedConfig(format!(
                "PAR entry in '{}' starts on contig '{}' but ends on contig '{}'",
                config.name, bad.start.contig, bad.end.contig
            )));
        }

        let contigs = config.contigs.iter().map(|c| c.name.clone()).collect();
        let lengths = config
            .contigs
            .into_iter()
            .map(|c| (c.name, c.length))
            .collect();

        ReferenceGenome::new(
            config.name,
            contigs,
            lengths,
            config.x_contigs,
            config.y_contigs,
            config.mt_contigs,
            config.par,
        )
    }

    /// Serialize the canonical config to pretty JSON
    ///
    /// # Errors
    ///
    /// Returns `GenomeError::Json` if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        self.to_config().to_json()
    }

    /// # Errors
    ///
    /// See [`GenomeConfig::from_json`] and [`Self::from_config`].
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_config(GenomeConfig::from_json(json)?)
    }

    /// Write the canonical config to a JSON file
    ///
    /// # Errors
    ///
    /// Returns `GenomeError::Io` if the file cannot be written.
    pub fn write(&self, path: &Path) -> Result<()> {
        self.to_config().write(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::builder::ReferenceGenomeBuilder;
    use crate::core::locus::Locus;

    fn toy() -> ReferenceGenome {
        ReferenceGenomeBuilder::new("toy")
            .contig("1", 100)
            .contig("X", 50)
            .contig("Y", 20)
            .contig("MT", 5)
            .x_contig("X")
            .y_contig("Y")
            .mt_contig("MT")
            .par("X", 10, 20)
            .build()
            .unwrap()
    }

    #[test]
    fn test_round_trip() {
        let rg = toy();
        let decoded = ReferenceGenome::from_json(&rg.to_json().unwrap()).unwrap();
        assert_eq!(decoded, rg);
        assert_eq!(decoded.contigs(), rg.contigs());
        assert_eq!(decoded.global_position("MT").unwrap(), 170);
    }

    #[test]
    fn test_field_names() {
        let value: serde_json::Value = serde_json::from_str(&toy().to_json().unwrap()).unwrap();
        assert_eq!(value["name"], "toy");
        assert_eq!(value["contigs"][1]["name"], "X");
        assert_eq!(value["contigs"][1]["length"], 50);
        assert_eq!(value["xContigs"][0], "X");
        assert_eq!(value["yContigs"][0], "Y");
        assert_eq!(value["mtContigs"][0], "MT");
        assert_eq!(value["par"][0]["start"]["contig"], "X");
        assert_eq!(value["par"][0]["start"]["position"], 10);
        assert_eq!(value["par"][0]["end"]["position"], 20);
    }

    #[test]
    fn test_encode_reflects_current_state() {
        let mut config = toy().to_config();
        config.name = "toy_renamed".to_string();
        let renamed = ReferenceGenome::from_config(config).unwrap();

        assert_eq!(renamed.to_config().name, "toy_renamed");
        assert_ne!(renamed, toy());
    }

    #[test]
    fn test_optional_fields_default() {
        let json = r#"{"name": "tiny", "contigs": [{"name": "a", "length": 3}]}"#;
        let rg = ReferenceGenome::from_json(json).unwrap();
        assert!(rg.x_contigs().is_empty());
        assert!(rg.par().is_empty());
    }

    #[test]
    fn test_mismatched_par_contigs_is_malformed() {
        let mut config = toy().to_config();
        config.par[0].end = Locus::new("Y", 20);
        assert!(matches!(
            ReferenceGenome::from_config(config),
            Err(GenomeError::MalformedConfig(_))
        ));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            ReferenceGenome::from_json("{\"name\": 1}"),
            Err(GenomeError::Json(_))
        ));
    }

    #[test]
    fn test_duplicate_contig_in_config() {
        let json = r#"{"name": "dup", "contigs": [{"name": "a", "length": 3}, {"name": "a", "length": 4}]}"#;
        assert!(matches!(
            ReferenceGenome::from_json(json),
            Err(GenomeError::Validation(_))
        ));
    }
}
