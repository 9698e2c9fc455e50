use std::collections::BTreeMap;

/// Liftover relations from one reference genome to others.
///
/// Each entry is a directed edge keyed by destination genome name, with the
/// chain file locator as payload. At most one edge exists per destination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Liftovers {
    chains: BTreeMap<String, String>,
}

impl Liftovers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an edge. Returns `false` (and leaves the existing edge alone) if
    /// one is already present for `destination`.
    pub fn insert(&mut self, destination: impl Into<String>, chain_file: impl Into<String>) -> bool {
        match self.chains.entry(destination.into()) {
            std::collections::btree_map::Entry::Occupied(_) => false,
            std::collections::btree_map::Entry::Vacant(entry) => {
                entry.insert(chain_file.into());
                true
            }
        }
    }

    #[must_use]
    pub fn contains(&self, destination: &str) -> bool {
        self.chains.contains_key(destination)
    }

    /// Chain file registered for `destination`
    #[must_use]
    pub fn chain_file(&self, destination: &str) -> Option<&str> {
        self.chains.get(destination).map(String::as_str)
    }

    /// Remove the edge to `destination`, returning its chain file if present
    pub fn remove(&mut self, destination: &str) -> Option<String> {
        self.chains.remove(destination)
    }

    /// `(destination, chain_file)` pairs in destination-name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.chains.iter().map(|(d, c)| (d.as_str(), c.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}
