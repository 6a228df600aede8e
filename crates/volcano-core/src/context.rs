//! The immutable context shared by every query.
//!
//! A [`VolcanoContext`] is built once from a data directory and holds the
//! registry, the name resolver, and the override table. Archive samples are
//! loaded lazily per alias cluster and memoized for the lifetime of the
//! context; decoded archive files are memoized separately by path.

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;
use tracing::{debug, info, info_span, warn};
use volcano_ingest::{
    ArchiveFile, DataLayout, IngestError, Registry, load_mapping_entries, load_registry,
    read_archive_samples, resolve_archive_path,
};
use volcano_model::{EruptionMatch, Resolution, SampleRecord, VolcanoRecord, VolcanoStats};
use volcano_resolve::{AliasCluster, NameResolver};
use volcano_standards::{Overrides, load_default_overrides, load_overrides_from_path};
use volcano_stats::{Timeline, aggregate, build_timeline};
use volcano_transform::{enrich_samples, match_all_eruptions};

use crate::error::{ContextError, Result};
use crate::location::select_cluster_samples;
use crate::nearby::{
    NearbyIndex, archive_fingerprint, build_nearby_sites, is_fresh, read_fingerprint,
    read_nearby_sites, write_nearby_index,
};
use crate::options::ContextOptions;
use crate::summary::{CorpusSummary, count_archive_files};

type SampleSet = Arc<[SampleRecord]>;

#[derive(Debug)]
pub struct VolcanoContext {
    options: ContextOptions,
    layout: DataLayout,
    overrides: Overrides,
    registry: Registry,
    resolver: NameResolver,
    /// Enriched samples by cluster composite key.
    samples: RwLock<HashMap<String, SampleSet>>,
    /// Raw samples by archive file path.
    files: RwLock<HashMap<PathBuf, SampleSet>>,
}

impl VolcanoContext {
    /// Loads the registry and mapping files and builds the resolver.
    pub fn load(options: ContextOptions) -> Result<Self> {
        let span = info_span!("load_context", data_dir = %options.data_dir().display());
        let _guard = span.enter();

        let layout = DataLayout::new(options.data_dir());
        layout.ensure_exists()?;
        let overrides = match &options.overrides_path {
            Some(path) => load_overrides_from_path(path)?,
            None => load_default_overrides()?,
        };
        let registry = load_registry(&layout, &overrides.registry, &options.registry)?;
        let entries = load_mapping_entries(&layout)?;
        let resolver = NameResolver::build(&entries, &registry, &overrides.shortening);
        Ok(Self::from_parts(options, overrides, registry, resolver))
    }

    /// Assembles a context from already-loaded parts.
    pub fn from_parts(
        options: ContextOptions,
        overrides: Overrides,
        registry: Registry,
        resolver: NameResolver,
    ) -> Self {
        Self {
            layout: DataLayout::new(options.data_dir()),
            options,
            overrides,
            registry,
            resolver,
            samples: RwLock::new(HashMap::new()),
            files: RwLock::new(HashMap::new()),
        }
    }

    pub fn options(&self) -> &ContextOptions {
        &self.options
    }

    pub fn layout(&self) -> &DataLayout {
        &self.layout
    }

    pub fn overrides(&self) -> &Overrides {
        &self.overrides
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn resolver(&self) -> &NameResolver {
        &self.resolver
    }

    pub fn resolve(&self, label: &str) -> Resolution {
        self.resolver.resolve(label)
    }

    /// Finds a volcano by number, registry name, or archive label.
    pub fn volcano(&self, key: &str) -> Result<&VolcanoRecord> {
        if let Some(volcano) = self.registry.lookup(key) {
            return Ok(volcano);
        }
        let id = self.resolver.resolve(key).into_result(key)?;
        self.registry
            .volcano(id)
            .ok_or_else(|| ContextError::UnknownVolcano {
                key: key.to_string(),
            })
    }

    pub fn stats(&self, volcano: &VolcanoRecord) -> VolcanoStats {
        aggregate(volcano, self.registry.eruptions_for(volcano.id))
    }

    pub fn timeline(&self, volcano: &VolcanoRecord) -> Timeline {
        build_timeline(
            &self.registry.eruptions_for(volcano.id),
            self.registry.events(),
        )
    }

    /// Archive files listed by one cluster; missing files are skipped.
    pub fn cluster_files(&self, cluster: &AliasCluster) -> Result<Vec<ArchiveFile>> {
        self.resolve_sources(cluster.sources())
    }

    /// Every archive file listed by any mapping file.
    pub fn archive_files(&self) -> Result<Vec<ArchiveFile>> {
        let sources: BTreeSet<&str> = self
            .resolver
            .clusters()
            .iter()
            .flat_map(AliasCluster::sources)
            .collect();
        let mut files = self.resolve_sources(sources)?;
        files.sort_by(|a, b| a.path.cmp(&b.path));
        files.dedup_by(|a, b| a.path == b.path);
        Ok(files)
    }

    fn resolve_sources<'a>(&self, sources: impl IntoIterator<Item = &'a str>) -> Result<Vec<ArchiveFile>> {
        let dataset_dir = self.layout.dataset_dir();
        let mut files = Vec::new();
        for source in sources {
            match resolve_archive_path(&dataset_dir, source) {
                Ok(file) => files.push(file),
                Err(
                    err @ (IngestError::ArchiveFileNotFound { .. }
                    | IngestError::FileNotFound { .. }
                    | IngestError::DirectoryNotFound { .. }),
                ) => warn!(source, error = %err, "archive file missing"),
                Err(err) => return Err(err.into()),
            }
        }
        Ok(files)
    }

    /// Raw samples of one archive file, read once.
    pub fn file_samples(&self, file: &ArchiveFile) -> Result<SampleSet> {
        if let Some(cached) = self
            .files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&file.path)
        {
            return Ok(Arc::clone(cached));
        }
        let samples: SampleSet = read_archive_samples(file)?.into();
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(file.path.clone(), Arc::clone(&samples));
        Ok(samples)
    }

    /// Enriched samples of an alias cluster, loaded on first use.
    pub fn samples_for_cluster(&self, cluster: &AliasCluster) -> Result<SampleSet> {
        let key = cluster.composite_key();
        if let Some(cached) = self
            .samples
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(Arc::clone(cached));
        }

        let span = info_span!("load_cluster_samples", cluster = %key);
        let _guard = span.enter();
        let mut selected = Vec::new();
        for file in self.cluster_files(cluster)? {
            let rows = self.file_samples(&file)?;
            let before = selected.len();
            selected.extend(
                select_cluster_samples(&rows, cluster, &self.overrides.archive).cloned(),
            );
            debug!(source = %file.source, rows = selected.len() - before, "cluster rows selected");
        }
        enrich_samples(&mut selected);
        info!(samples = selected.len(), "archive samples loaded");

        let samples: SampleSet = selected.into();
        self.samples
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key)
            .or_insert_with(|| Arc::clone(&samples));
        Ok(samples)
    }

    /// Enriched samples of a registry volcano; empty when nothing is mapped to it.
    pub fn samples_for_volcano(&self, volcano: &VolcanoRecord) -> Result<SampleSet> {
        match self.resolver.cluster_for_volcano(volcano) {
            Some(cluster) => self.samples_for_cluster(cluster),
            None => Ok(Arc::from(Vec::new())),
        }
    }

    /// Samples by archive label, display name, or registry volcano.
    pub fn samples(&self, key: &str) -> Result<SampleSet> {
        if let Some(cluster) = self.resolver.cluster(key) {
            return self.samples_for_cluster(cluster);
        }
        let volcano = self.volcano(key)?;
        self.samples_for_volcano(volcano)
    }

    /// Matches every sample year against the volcano's eruptions.
    pub fn eruption_matches(
        &self,
        volcano: &VolcanoRecord,
        samples: &[SampleRecord],
    ) -> Vec<(i32, EruptionMatch<'_>)> {
        let eruptions = self.registry.eruptions_for(volcano.id);
        match_all_eruptions(
            samples.iter().filter_map(SampleRecord::effective_year),
            eruptions.iter().copied(),
        )
    }

    /// Loads the stored nearby index, rebuilding it when absent, stale, or forced.
    pub fn nearby_index(&self, force_rebuild: bool) -> Result<NearbyIndex> {
        let path = self.options.nearby_index_path();
        let files = self.archive_files()?;
        let fingerprint = archive_fingerprint(&files)?;

        if !force_rebuild && is_fresh(&path, &fingerprint) {
            let sites = read_nearby_sites(&path)?;
            let generated_at = read_fingerprint(&path).and_then(|(_, stamp)| stamp);
            debug!(path = %path.display(), sites = sites.len(), "nearby index reused");
            return Ok(NearbyIndex {
                sites,
                fingerprint,
                generated_at,
                rebuilt: false,
            });
        }

        let span = info_span!("build_nearby_index", files = files.len());
        let _guard = span.enter();
        let mut samples = Vec::new();
        for file in &files {
            samples.extend(self.file_samples(file)?.iter().cloned());
        }
        let index = NearbyIndex {
            sites: build_nearby_sites(self.registry.volcanoes(), &samples),
            fingerprint,
            generated_at: Some(Utc::now()),
            rebuilt: true,
        };
        write_nearby_index(&path, &index)?;
        Ok(index)
    }

    pub fn summary(&self) -> Result<CorpusSummary> {
        Ok(CorpusSummary {
            volcanoes: self.registry.volcanoes().len(),
            eruptions: self.registry.eruptions().len(),
            volcanoes_with_eruptions: self.registry.volcanoes_with_eruptions().len(),
            alias_clusters: self.resolver.clusters().len(),
            aggregated_sites: self.resolver.aggregated_sites().count(),
            archive_files: count_archive_files(&self.layout.dataset_dir())?,
        })
    }
}
