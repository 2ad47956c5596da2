//! Request orchestration: annotate, partition, deduplicate, normalise, render.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    nlp::{unique_terms, Partitioned},
    normalize::{Category, NormalizationResult, NormalizedEntity},
    registry::Registry,
    ui,
};

/// Rendered markup plus normalised entities for one document.
#[derive(Debug, Clone, Serialize)]
pub struct Extraction {
    pub html: String,
    pub entities: NormalizationResult,
}

/// Run the end-to-end extraction pipeline over one document.
#[instrument(skip_all, fields(bytes = text.len()))]
pub async fn extract_entities(registry: &Registry, text: &str) -> Result<Extraction> {
    let mentions = registry.annotator().annotate(text);
    let partitioned = Partitioned::from_mentions(&mentions);

    let diseases = unique_terms(&partitioned.diseases);
    let chemicals = unique_terms(&partitioned.chemicals);
    let genetics = unique_terms(&partitioned.genetics);
    // Lineage identifiers surface through either the genetic or chemical channel.
    let covid = unique_terms(genetics.iter().chain(chemicals.iter()));

    let (diseases, chemicals, genetics, covid) = tokio::join!(
        normalize(registry, Category::Disease, &diseases),
        normalize(registry, Category::Chemical, &chemicals),
        normalize(registry, Category::Genetic, &genetics),
        normalize(registry, Category::Covid, &covid),
    );

    let html = ui::render_entities(text, &mentions).context("rendering entity markup")?;
    info!(
        mentions = mentions.len(),
        diseases = diseases.len(),
        chemicals = chemicals.len(),
        genetics = genetics.len(),
        covid = covid.len(),
        "extraction complete"
    );

    Ok(Extraction {
        html,
        entities: NormalizationResult {
            diseases,
            chemicals,
            genetics,
            covid,
        },
    })
}

async fn normalize(registry: &Registry, category: Category, terms: &[String]) -> Vec<NormalizedEntity> {
    match registry.service(category) {
        Some(service) => service.normalize(terms).await,
        None => Vec::new(),
    }
}
