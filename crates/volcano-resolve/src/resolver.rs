//! Resolution of archive labels to registry volcanoes.

use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};

use rapidfuzz::distance::jaro_winkler;
use serde::Serialize;
use tracing::{info, info_span, warn};
use volcano_ingest::{MappingEntry, Registry};
use volcano_model::{Resolution, VolcanoId, VolcanoRecord};
use volcano_standards::ShorteningRules;

use crate::alias::{AliasCluster, AliasIndex, normalize_label};
use crate::short_name::{ShortName, is_aggregated, shorten};

/// A known label close to an unresolved one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelSuggestion {
    pub label: String,
    /// Jaro-Winkler similarity in `[0, 1]`.
    pub score: f64,
}

/// Bidirectional mapping between archive labels and registry volcanoes.
///
/// Built once from every mapping entry and immutable afterwards.
#[derive(Debug, Clone)]
pub struct NameResolver {
    index: AliasIndex,
    /// Short name per cluster, for aggregated sites only.
    short_names: Vec<Option<ShortName>>,
    display_names: Vec<String>,
    /// Normalized composite key or display name to cluster.
    by_display: HashMap<String, usize>,
    /// Normalized registry name to every volcano carrying it.
    registry_ids: HashMap<String, Vec<VolcanoId>>,
}

impl NameResolver {
    /// Builds the resolver from mapping entries in file order.
    pub fn build(entries: &[MappingEntry], registry: &Registry, rules: &ShorteningRules) -> Self {
        let _span = info_span!("build_name_resolver", entries = entries.len()).entered();
        Self::from_index(AliasIndex::from_entries(entries), registry, rules)
    }

    pub fn from_index(index: AliasIndex, registry: &Registry, rules: &ShorteningRules) -> Self {
        let mut registry_ids: HashMap<String, Vec<VolcanoId>> = HashMap::new();
        for volcano in registry.volcanoes() {
            registry_ids
                .entry(normalize_label(&volcano.name))
                .or_default()
                .push(volcano.id);
        }

        let mut short_names = Vec::with_capacity(index.clusters().len());
        let mut display_names = Vec::with_capacity(index.clusters().len());
        let mut by_display = HashMap::new();
        for (idx, cluster) in index.clusters().iter().enumerate() {
            if !registry_ids.contains_key(&normalize_label(cluster.registry_name())) {
                warn!(
                    registry_name = cluster.registry_name(),
                    "mapped registry name not found in registry"
                );
            }
            let key = cluster.composite_key();
            let short = is_aggregated(&key, cluster.label_count(), rules)
                .then(|| shorten(&key, cluster.label_count(), rules))
                .flatten();
            let display = short.as_ref().map_or_else(|| key.clone(), ToString::to_string);
            for name in [&key, &display] {
                match by_display.entry(normalize_label(name)) {
                    Entry::Vacant(slot) => {
                        slot.insert(idx);
                    }
                    Entry::Occupied(taken) if *taken.get() != idx => warn!(
                        name = name.as_str(),
                        kept = index.clusters()[*taken.get()].registry_name(),
                        dropped = cluster.registry_name(),
                        "display name shared by two clusters; keeping the first"
                    ),
                    Entry::Occupied(_) => {}
                }
            }
            short_names.push(short);
            display_names.push(display);
        }

        info!(
            clusters = index.clusters().len(),
            aggregated = short_names.iter().flatten().count(),
            ambiguous = index.ambiguous_labels().count(),
            "name resolver built"
        );
        Self {
            index,
            short_names,
            display_names,
            by_display,
            registry_ids,
        }
    }

    pub fn index(&self) -> &AliasIndex {
        &self.index
    }

    pub fn clusters(&self) -> &[AliasCluster] {
        self.index.clusters()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.index
            .label_position(name)
            .or_else(|| self.by_display.get(&normalize_label(name)).copied())
    }

    /// Finds a cluster by archive label, composite key, or display name.
    pub fn cluster(&self, name: &str) -> Option<&AliasCluster> {
        self.position(name).map(|idx| &self.index.clusters()[idx])
    }

    /// Cluster of a registry volcano, looked up by its display name.
    pub fn cluster_for_volcano(&self, volcano: &VolcanoRecord) -> Option<&AliasCluster> {
        self.index.cluster_for_registry_name(&volcano.name)
    }

    /// Display name of the cluster `name` belongs to.
    ///
    /// Aggregated sites show their short name; other clusters show their
    /// composite key.
    pub fn short_name(&self, name: &str) -> Option<&str> {
        self.position(name).map(|idx| self.display_names[idx].as_str())
    }

    /// Display name of a cluster returned by this resolver.
    pub fn display_name(&self, cluster: &AliasCluster) -> Option<&str> {
        self.index
            .registry_position(cluster.registry_name())
            .map(|idx| self.display_names[idx].as_str())
    }

    /// Every cluster display name, sorted.
    pub fn display_names(&self) -> Vec<&str> {
        let names: BTreeSet<&str> = self.display_names.iter().map(String::as_str).collect();
        names.into_iter().collect()
    }

    /// Aggregated sites with their picked short names.
    pub fn aggregated_sites(&self) -> impl Iterator<Item = (&AliasCluster, &ShortName)> {
        self.index
            .clusters()
            .iter()
            .zip(&self.short_names)
            .filter_map(|(cluster, short)| short.as_ref().map(|short| (cluster, short)))
    }

    /// Volcanoes whose display name is `registry_name`.
    pub fn volcano_ids(&self, registry_name: &str) -> &[VolcanoId] {
        self.registry_ids
            .get(&normalize_label(registry_name))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Resolves an archive label, composite key, or display name.
    ///
    /// A label mapped to two registry names is `Ambiguous` with every volcano
    /// carrying either name.
    pub fn resolve(&self, label: &str) -> Resolution {
        if let Some(names) = self.index.ambiguity(label) {
            let ids: BTreeSet<VolcanoId> = names
                .iter()
                .flat_map(|name| self.volcano_ids(name).iter().copied())
                .collect();
            return Resolution::Ambiguous(ids.into_iter().collect());
        }
        let Some(cluster) = self.cluster(label) else {
            return Resolution::Unresolved;
        };
        match self.volcano_ids(cluster.registry_name()) {
            [] => Resolution::Unresolved,
            [only] => Resolution::Resolved(*only),
            many => Resolution::Ambiguous(many.to_vec()),
        }
    }

    /// Known labels most similar to `label`, best first.
    pub fn suggest(&self, label: &str, limit: usize) -> Vec<LabelSuggestion> {
        let wanted = normalize_label(label);
        let mut scored: Vec<LabelSuggestion> = self
            .index
            .labels()
            .into_iter()
            .map(|known| LabelSuggestion {
                label: known.to_string(),
                score: jaro_winkler::similarity(wanted.chars(), normalize_label(known).chars()),
            })
            .collect();
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.label.cmp(&b.label))
        });
        scored.truncate(limit);
        scored
    }
}
