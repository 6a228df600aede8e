//! Alias clusters built from mapping entries.
//!
//! Every registry name owns one cluster. A label seen for the first time joins
//! the cluster of its registry name; a label seen again with the same target
//! only adds a data source; a label seen again with a different target is
//! ambiguous and stays in the cluster it joined first.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;
use tracing::{debug, warn};
use volcano_ingest::MappingEntry;

/// Separator between labels in a composite key.
pub const KEY_SEPARATOR: char = ',';

/// Canonical comparison form of a label or name.
pub fn normalize_label(label: &str) -> String {
    label.trim().to_uppercase()
}

/// Archive labels resolving to one registry volcano.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasCluster {
    registry_name: String,
    labels: BTreeSet<String>,
    sources: BTreeSet<String>,
}

impl AliasCluster {
    fn new(registry_name: &str) -> Self {
        Self {
            registry_name: registry_name.trim().to_string(),
            labels: BTreeSet::new(),
            sources: BTreeSet::new(),
        }
    }

    pub fn registry_name(&self) -> &str {
        &self.registry_name
    }

    /// Labels in sorted order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    /// `REGION/file.csv` data sources holding rows for the cluster.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(String::as_str)
    }

    /// Sorted, de-duplicated labels joined by `,`.
    pub fn composite_key(&self) -> String {
        let mut key = String::new();
        for (idx, label) in self.labels.iter().enumerate() {
            if idx > 0 {
                key.push(KEY_SEPARATOR);
            }
            key.push_str(label);
        }
        key
    }

    pub fn contains_label(&self, label: &str) -> bool {
        let wanted = normalize_label(label);
        self.labels.iter().any(|l| normalize_label(l) == wanted)
    }
}

/// All clusters plus the label lookup tables.
#[derive(Debug, Clone, Default)]
pub struct AliasIndex {
    clusters: Vec<AliasCluster>,
    by_registry: HashMap<String, usize>,
    by_label: HashMap<String, usize>,
    /// Normalized label to every registry name it was mapped to.
    ambiguous: BTreeMap<String, BTreeSet<String>>,
}

impl AliasIndex {
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a MappingEntry>,
    {
        let mut index = Self::default();
        for entry in entries {
            index.insert(entry);
        }
        index
    }

    /// Adds one mapping entry.
    pub fn insert(&mut self, entry: &MappingEntry) {
        let label = entry.archive_label.trim();
        let registry_name = entry.registry_name.trim();
        if label.is_empty() || registry_name.is_empty() {
            debug!(source = %entry.source, "skipping mapping entry with empty label or name");
            return;
        }
        let label_key = normalize_label(label);
        let registry_key = normalize_label(registry_name);

        if let Some(&cluster_idx) = self.by_label.get(&label_key) {
            let cluster = &mut self.clusters[cluster_idx];
            if normalize_label(&cluster.registry_name) == registry_key {
                cluster.sources.insert(entry.source.clone());
            } else {
                warn!(
                    label,
                    first = %cluster.registry_name,
                    second = registry_name,
                    source = %entry.source,
                    "archive label maps to two registry names"
                );
                self.ambiguous
                    .entry(label_key)
                    .or_insert_with(|| BTreeSet::from([cluster.registry_name.clone()]))
                    .insert(registry_name.to_string());
            }
            return;
        }

        let cluster_idx = *self
            .by_registry
            .entry(registry_key)
            .or_insert_with(|| {
                self.clusters.push(AliasCluster::new(registry_name));
                self.clusters.len() - 1
            });
        let cluster = &mut self.clusters[cluster_idx];
        cluster.labels.insert(label.to_string());
        cluster.sources.insert(entry.source.clone());
        self.by_label.insert(label_key, cluster_idx);
    }

    /// Clusters in first-seen order.
    pub fn clusters(&self) -> &[AliasCluster] {
        &self.clusters
    }

    pub(crate) fn label_position(&self, label: &str) -> Option<usize> {
        self.by_label.get(&normalize_label(label)).copied()
    }

    pub(crate) fn registry_position(&self, name: &str) -> Option<usize> {
        self.by_registry.get(&normalize_label(name)).copied()
    }

    pub fn cluster_for_label(&self, label: &str) -> Option<&AliasCluster> {
        self.by_label
            .get(&normalize_label(label))
            .map(|idx| &self.clusters[*idx])
    }

    pub fn cluster_for_registry_name(&self, name: &str) -> Option<&AliasCluster> {
        self.by_registry
            .get(&normalize_label(name))
            .map(|idx| &self.clusters[*idx])
    }

    /// Registry names an ambiguous label was mapped to.
    pub fn ambiguity(&self, label: &str) -> Option<&BTreeSet<String>> {
        self.ambiguous.get(&normalize_label(label))
    }

    pub fn ambiguous_labels(&self) -> impl Iterator<Item = &str> {
        self.ambiguous.keys().map(String::as_str)
    }

    /// Known labels in sorted order.
    pub fn labels(&self) -> BTreeSet<&str> {
        self.clusters
            .iter()
            .flat_map(|cluster| cluster.labels())
            .collect()
    }

    /// Registry name to composite key, independent of insertion order.
    pub fn composite_keys(&self) -> BTreeMap<String, String> {
        self.clusters
            .iter()
            .map(|cluster| (normalize_label(&cluster.registry_name), cluster.composite_key()))
            .collect()
    }
}
