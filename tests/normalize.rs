use std::{sync::Arc, time::Duration};

use bionlp_service::normalize::{
    lookup_key, seeds, Candidate, Category, Concept, KnowledgeSource, LookupError,
    NormalizationService, PangoPatternSource, Query, Vocabulary,
};
use futures::future::{BoxFuture, FutureExt};

fn seed_id(category: Category, surface: &str) -> Option<String> {
    seeds::seed_vocabulary(category)
        .candidates(&lookup_key(surface), 1.0)
        .into_iter()
        .next()
        .map(|c| c.id)
}

#[test]
fn gleevec_maps_to_imatinib() {
    assert_eq!(seed_id(Category::Chemical, "Gleevec").as_deref(), Some("CHEBI:45783"));
}

/// Fails every lookup for one key and defers to the seed vocabulary otherwise.
struct FlakySource {
    inner: Vocabulary,
    broken_key: &'static str,
}

impl KnowledgeSource for FlakySource {
    fn name(&self) -> &str {
        "flaky"
    }

    fn lookup<'a>(&'a self, query: Query<'a>) -> BoxFuture<'a, Result<Vec<Candidate>, LookupError>> {
        async move {
            if query.key == self.broken_key {
                return Err(LookupError::Status(503));
            }
            self.inner.lookup(query).await
        }
        .boxed()
    }
}

struct SlowSource;

impl KnowledgeSource for SlowSource {
    fn name(&self) -> &str {
        "slow"
    }

    fn lookup<'a>(&'a self, _query: Query<'a>) -> BoxFuture<'a, Result<Vec<Candidate>, LookupError>> {
        async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(Vec::new())
        }
        .boxed()
    }
}

fn terms(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn one_failing_lookup_degrades_only_that_entry() {
    let service = NormalizationService::new(Category::Chemical, "CHEBI").with_source(Arc::new(
        FlakySource {
            inner: seeds::seed_vocabulary(Category::Chemical),
            broken_key: "ibuprofen",
        },
    ));

    let out = service
        .normalize(&terms(&["Aspirin", "Ibuprofen", "Metformin"]))
        .await;

    assert_eq!(out.len(), 3);
    assert_eq!(out[0].canonical_id.as_deref(), Some("CHEBI:15365"));
    assert_eq!(out[1].surface_text, "Ibuprofen");
    assert_eq!(out[1].canonical_id, None);
    assert_eq!(out[1].canonical_name, None);
    assert_eq!(out[1].source_vocabulary, "CHEBI");
    assert_eq!(out[2].canonical_id.as_deref(), Some("CHEBI:6801"));
}

#[tokio::test]
async fn output_matches_input_length_and_order() {
    let service = NormalizationService::new(Category::Disease, "MESH")
        .with_source(Arc::new(seeds::seed_vocabulary(Category::Disease)));
    let input = terms(&["zzqx unknown", "Hypertension", "flu", "--"]);

    let out = service.normalize(&input).await;

    let surfaces: Vec<&str> = out.iter().map(|e| e.surface_text.as_str()).collect();
    assert_eq!(surfaces, vec!["zzqx unknown", "Hypertension", "flu", "--"]);
    assert!(!out[0].is_resolved());
    assert_eq!(out[1].canonical_id.as_deref(), Some("MESH:D006973"));
    assert_eq!(out[2].canonical_id.as_deref(), Some("MESH:D007251"));
    assert!(!out[3].is_resolved());
}

#[tokio::test]
async fn misspelling_resolves_fuzzily_below_full_confidence() {
    let service = NormalizationService::new(Category::Chemical, "CHEBI")
        .with_source(Arc::new(seeds::seed_vocabulary(Category::Chemical)));

    let entity = service.resolve("dexamethazone").await;

    assert_eq!(entity.canonical_id.as_deref(), Some("CHEBI:41879"));
    let confidence = entity.match_confidence.unwrap();
    assert!(confidence >= 0.88 && confidence < 1.0);
}

#[tokio::test]
async fn exact_ties_prefer_rank_then_identifier() {
    let vocabulary = Vocabulary::new(
        "TEST",
        vec![
            Concept::new("TEST:3", "zeta", &["shared"], 2),
            Concept::new("TEST:2", "beta", &["shared"], 1),
            Concept::new("TEST:1", "alpha", &["shared"], 1),
        ],
    );
    let service =
        NormalizationService::new(Category::Genetic, "TEST").with_source(Arc::new(vocabulary));

    let entity = service.resolve("Shared").await;

    assert_eq!(entity.canonical_id.as_deref(), Some("TEST:1"));
    assert_eq!(entity.canonical_name.as_deref(), Some("alpha"));
}

#[tokio::test]
async fn slow_source_times_out_and_next_source_answers() {
    let service = NormalizationService::new(Category::Chemical, "CHEBI")
        .with_timeout(Duration::from_millis(20))
        .with_source(Arc::new(SlowSource))
        .with_source(Arc::new(seeds::seed_vocabulary(Category::Chemical)));

    let entity = service.resolve("caffeine").await;

    assert_eq!(entity.canonical_id.as_deref(), Some("CHEBI:27732"));
}

#[tokio::test]
async fn unlisted_pango_lineage_resolves_by_pattern() {
    let service = NormalizationService::new(Category::Covid, "NCBITaxon")
        .with_source(Arc::new(seeds::seed_vocabulary(Category::Covid)))
        .with_source(Arc::new(PangoPatternSource));

    let listed = service.resolve("B.1.1.7").await;
    let unlisted = service.resolve("JN.1.7").await;

    assert_eq!(listed.canonical_id.as_deref(), Some("pango:B.1.1.7"));
    assert_eq!(listed.match_confidence, Some(1.0));
    assert_eq!(unlisted.canonical_id.as_deref(), Some("pango:JN.1.7"));
    assert_eq!(unlisted.source_vocabulary, "pango");
}

fn covid_service() -> NormalizationService {
    NormalizationService::new(Category::Covid, "NCBITaxon")
        .with_source(Arc::new(seeds::seed_vocabulary(Category::Covid)))
        .with_source(Arc::new(PangoPatternSource))
}

#[tokio::test]
async fn unlisted_lineage_near_a_listed_one_keeps_its_own_identity() {
    let service = covid_service();

    let out = service.normalize(&terms(&["B.1.1.8", "BA.2.86", "BA.2"])).await;

    let ids: Vec<Option<&str>> = out.iter().map(|e| e.canonical_id.as_deref()).collect();
    assert_eq!(
        ids,
        vec![Some("pango:B.1.1.8"), Some("pango:BA.2.86"), Some("pango:BA.2")]
    );
    assert!(out.iter().all(|e| e.match_confidence == Some(1.0)));
}

#[tokio::test]
async fn exact_hit_in_later_source_beats_fuzzy_hit_in_earlier_one() {
    let curated = Vocabulary::new(
        "LOCAL",
        vec![Concept::new("LOCAL:7", "dexamethazone", &[], 5)],
    );
    let service = NormalizationService::new(Category::Chemical, "CHEBI")
        .with_source(Arc::new(seeds::seed_vocabulary(Category::Chemical)))
        .with_source(Arc::new(curated));

    let misspelt = service.resolve("dexamethazone").await;
    let correct = service.resolve("dexamethasone").await;

    assert_eq!(misspelt.canonical_id.as_deref(), Some("LOCAL:7"));
    assert_eq!(misspelt.match_confidence, Some(1.0));
    assert_eq!(correct.canonical_id.as_deref(), Some("CHEBI:41879"));
}

#[tokio::test]
async fn gene_symbol_with_other_digits_stays_unresolved() {
    let service = NormalizationService::new(Category::Genetic, "HGNC")
        .with_source(Arc::new(seeds::seed_vocabulary(Category::Genetic)));

    let entity = service.resolve("BRCA3").await;

    assert_eq!(entity.canonical_id, None);
    assert_eq!(entity.source_vocabulary, "HGNC");
}

#[test]
fn csv_extension_adds_synonyms() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chemical.csv");
    std::fs::write(
        &path,
        "id,name,synonyms,rank\nCHEBI:15365,aspirin,Bayer Aspirin|ASA,\nCHEBI:28077,rifampicin,rifampin,1\n",
    )
    .unwrap();

    let mut vocabulary = seeds::seed_vocabulary(Category::Chemical);
    let before = vocabulary.len();
    let rows = vocabulary.extend_from_csv(&path).unwrap();

    assert_eq!(rows, 2);
    assert_eq!(vocabulary.len(), before + 1);
    assert_eq!(vocabulary.candidates("bayeraspirin", 0.88)[0].id, "CHEBI:15365");
    assert_eq!(vocabulary.candidates("rifampin", 0.88)[0].id, "CHEBI:28077");
}

#[test]
fn csv_rows_without_name_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("disease.csv");
    std::fs::write(&path, "id,name\nMESH:D000001,\n").unwrap();

    assert!(bionlp_service::normalize::vocabulary::load_csv(&path).is_err());
}
