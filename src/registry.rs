//! Process-wide, read-only set of loaded recognisers and vocabularies.

use std::{collections::BTreeMap, sync::Arc};

use anyhow::{bail, Context, Result};
use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    config::Settings,
    data::bundle,
    nlp::{Annotator, EntityLabel, GazetteerAnnotator},
    normalize::{
        seeds, Category, KnowledgeSource, NormalizationService, PangoPatternSource, RxNavSource,
        Vocabulary,
    },
};

/// Unanchored lineage pattern used for recognition in the genetic channel.
const LINEAGE_MENTION_PATTERN: &str = r"\b[A-Z]{1,3}(?:\.\d+){1,4}\b";

static GLOBAL: OnceCell<Arc<Registry>> = OnceCell::new();

/// Availability of one category, as reported on the landing page and by
/// `check-models`.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryStatus {
    pub category: Category,
    pub available: bool,
    pub reason: Option<String>,
    pub sources: Vec<String>,
}

impl CategoryStatus {
    pub fn detail(&self) -> String {
        match (&self.reason, self.available) {
            (Some(reason), _) => reason.clone(),
            (None, true) => format!("sources: {}", self.sources.join(", ")),
            (None, false) => "not configured".to_string(),
        }
    }
}

/// Loaded annotator and per-category normalisation services.
pub struct Registry {
    annotator: Arc<dyn Annotator>,
    services: BTreeMap<Category, Arc<NormalizationService>>,
    unavailable: BTreeMap<Category, String>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("labels", &self.annotator.labels())
            .field("services", &self.services)
            .field("unavailable", &self.unavailable)
            .finish()
    }
}

impl Registry {
    pub fn new(annotator: Arc<dyn Annotator>) -> Self {
        Self {
            annotator,
            services: BTreeMap::new(),
            unavailable: BTreeMap::new(),
        }
    }

    pub fn with_service(mut self, service: NormalizationService) -> Self {
        self.unavailable.remove(&service.category());
        self.services.insert(service.category(), Arc::new(service));
        self
    }

    pub fn with_unavailable(mut self, category: Category, reason: impl Into<String>) -> Self {
        self.services.remove(&category);
        self.unavailable.insert(category, reason.into());
        self
    }

    /// Initialise the process-wide registry once; later calls reuse it.
    pub fn global(settings: &Settings) -> Result<Arc<Registry>> {
        GLOBAL
            .get_or_try_init(|| Registry::load(settings).map(Arc::new))
            .cloned()
    }

    /// Load vocabularies, check bundles and compile the annotator.
    ///
    /// Category problems only disable that category. Failing to build the
    /// annotator is fatal.
    pub fn load(settings: &Settings) -> Result<Self> {
        if settings.model_root.exists() && !settings.model_root.is_dir() {
            bail!(
                "model root {} exists but is not a directory",
                settings.model_root.display()
            );
        }

        let mut vocabularies: BTreeMap<Category, Vocabulary> = BTreeMap::new();
        let mut unavailable: BTreeMap<Category, String> = BTreeMap::new();

        for category in Category::ALL {
            let mut vocabulary = seeds::seed_vocabulary(category);
            let extension = settings.join_vocab(category.vocab_file());
            if extension.is_file() {
                if let Err(err) = vocabulary.extend_from_csv(&extension) {
                    unavailable.insert(category, format!("vocabulary failed to load: {err}"));
                    continue;
                }
            }
            vocabularies.insert(category, vocabulary);
        }

        if settings.require_model_bundles {
            for label in EntityLabel::ALL {
                let status = bundle::inspect(&settings.model_root, label);
                if !status.is_complete() {
                    unavailable.entry(recogniser_category(label)).or_insert_with(|| {
                        format!(
                            "incomplete model bundle at {} (missing {})",
                            status.dir.display(),
                            status.missing().join(", ")
                        )
                    });
                }
            }
        }

        let feeds_covid = [Category::Genetic, Category::Chemical]
            .iter()
            .any(|c| vocabularies.contains_key(c) && !unavailable.contains_key(c));
        if !feeds_covid {
            unavailable
                .entry(Category::Covid)
                .or_insert_with(|| "no genetic or chemical recogniser available".to_string());
        }
        let is_ready = |c: Category| vocabularies.contains_key(&c) && !unavailable.contains_key(&c);

        // Lineages are recognised by the genetic channel, or the chemical one
        // when genetics is down; both feed the covid service.
        let lineage_label = [EntityLabel::Genetic, EntityLabel::Chemical]
            .into_iter()
            .find(|label| is_ready(recogniser_category(*label)))
            .filter(|_| is_ready(Category::Covid));

        let mut gazetteer = GazetteerAnnotator::builder();
        for label in EntityLabel::ALL {
            let category = recogniser_category(label);
            if !is_ready(category) {
                continue;
            }
            gazetteer = gazetteer.terms(label, vocabularies[&category].surface_terms());
            if lineage_label == Some(label) {
                gazetteer = gazetteer
                    .terms(label, vocabularies[&Category::Covid].surface_terms())
                    .pattern(label, LINEAGE_MENTION_PATTERN);
            }
        }
        let annotator = gazetteer
            .build()
            .context("compiling gazetteer annotator")?;

        let mut registry = Registry::new(Arc::new(annotator));
        for category in Category::ALL {
            if let Some(reason) = unavailable.get(&category) {
                warn!(%category, %reason, "category unavailable");
                registry = registry.with_unavailable(category, reason.clone());
                continue;
            }
            let Some(vocabulary) = vocabularies.remove(&category) else {
                continue;
            };
            let service = build_service(category, vocabulary, settings);
            info!(%category, sources = ?service.source_names(), "category ready");
            registry = registry.with_service(service);
        }
        Ok(registry)
    }

    pub fn annotator(&self) -> &dyn Annotator {
        self.annotator.as_ref()
    }

    pub fn service(&self, category: Category) -> Option<&NormalizationService> {
        self.services.get(&category).map(Arc::as_ref)
    }

    pub fn status(&self) -> Vec<CategoryStatus> {
        Category::ALL
            .into_iter()
            .map(|category| match self.services.get(&category) {
                Some(service) => CategoryStatus {
                    category,
                    available: true,
                    reason: None,
                    sources: service
                        .source_names()
                        .into_iter()
                        .map(str::to_string)
                        .collect(),
                },
                None => CategoryStatus {
                    category,
                    available: false,
                    reason: self.unavailable.get(&category).cloned(),
                    sources: Vec::new(),
                },
            })
            .collect()
    }
}

fn recogniser_category(label: EntityLabel) -> Category {
    match label {
        EntityLabel::Disease => Category::Disease,
        EntityLabel::Chemical => Category::Chemical,
        EntityLabel::Genetic => Category::Genetic,
    }
}

fn build_service(category: Category, vocabulary: Vocabulary, settings: &Settings) -> NormalizationService {
    let primary = vocabulary.name().to_string();
    let mut service = NormalizationService::new(category, primary)
        .with_threshold(settings.match_threshold)
        .with_timeout(settings.lookup_timeout())
        .with_source(Arc::new(vocabulary) as Arc<dyn KnowledgeSource>);

    match category {
        Category::Covid => {
            service = service.with_source(Arc::new(PangoPatternSource));
        }
        Category::Chemical if !settings.offline => match RxNavSource::new(&settings.rxnav_base_url) {
            Ok(source) => service = service.with_source(Arc::new(source)),
            Err(err) => warn!(error = %err, "rxnav source disabled"),
        },
        _ => {}
    }
    service
}
