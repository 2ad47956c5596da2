//! Built-in seed vocabularies shipped with the service.
//!
//! Each category starts from a small curated set; deployments extend it with
//! `<VOCAB_DIR>/<category>.csv`.

use super::{Category, Concept, Vocabulary};

type SeedRow = (&'static str, &'static str, &'static [&'static str], u32);

const DISEASE_SEED: &[SeedRow] = &[
    ("MESH:D006973", "Hypertension", &["high blood pressure"], 1),
    ("MESH:D003920", "Diabetes Mellitus", &["diabetes"], 1),
    (
        "MESH:D003924",
        "Diabetes Mellitus, Type 2",
        &["type 2 diabetes", "type 2 diabetes mellitus", "T2DM"],
        1,
    ),
    ("MESH:D001943", "Breast Neoplasms", &["breast cancer"], 1),
    ("MESH:D008175", "Lung Neoplasms", &["lung cancer"], 1),
    ("MESH:D009369", "Neoplasms", &["cancer", "tumor", "tumour"], 2),
    (
        "MESH:D000544",
        "Alzheimer Disease",
        &["Alzheimer's disease", "Alzheimers"],
        1,
    ),
    ("MESH:D001249", "Asthma", &[], 1),
    ("MESH:D011014", "Pneumonia", &[], 1),
    ("MESH:D007251", "Influenza, Human", &["influenza", "flu"], 1),
    ("MESH:D006505", "Hepatitis", &[], 1),
    (
        "MESH:D056486",
        "Chemical and Drug Induced Liver Injury",
        &["hepatotoxicity", "drug-induced liver injury"],
        1,
    ),
    ("MESH:D005334", "Fever", &["pyrexia"], 1),
    ("MESH:D003371", "Cough", &[], 1),
    ("MESH:D005221", "Fatigue", &[], 1),
    ("MESH:D009325", "Nausea", &[], 1),
    ("MESH:D006261", "Headache", &[], 1),
    ("MESH:D005076", "Exanthema", &["rash"], 1),
    ("MESH:D009503", "Neutropenia", &[], 1),
    ("MESH:D000740", "Anemia", &["anaemia"], 1),
    ("MESH:D013921", "Thrombocytopenia", &[], 1),
    ("MESH:D003550", "Cystic Fibrosis", &[], 1),
];

const CHEMICAL_SEED: &[SeedRow] = &[
    ("CHEBI:15365", "aspirin", &["acetylsalicylic acid"], 1),
    ("CHEBI:5855", "ibuprofen", &[], 1),
    ("CHEBI:46195", "paracetamol", &["acetaminophen"], 1),
    ("CHEBI:6801", "metformin", &[], 1),
    ("CHEBI:45783", "imatinib", &["gleevec"], 1),
    ("CHEBI:41879", "dexamethasone", &[], 1),
    ("CHEBI:145994", "remdesivir", &[], 1),
    ("CHEBI:5801", "hydroxychloroquine", &[], 1),
    ("CHEBI:27899", "cisplatin", &[], 1),
    ("CHEBI:27732", "caffeine", &[], 1),
    ("CHEBI:16236", "ethanol", &["alcohol"], 1),
    ("CHEBI:17234", "glucose", &[], 1),
    ("CHEBI:16113", "cholesterol", &[], 1),
    ("CHEBI:17688", "nicotine", &[], 1),
    ("CHEBI:10033", "warfarin", &[], 1),
    ("CHEBI:6078", "ivermectin", &[], 1),
];

const GENETIC_SEED: &[SeedRow] = &[
    ("HGNC:1100", "BRCA1", &[], 1),
    ("HGNC:1101", "BRCA2", &[], 1),
    ("HGNC:11998", "TP53", &["p53"], 1),
    ("HGNC:6407", "KRAS", &["K-RAS"], 1),
    ("HGNC:3236", "EGFR", &["HER1"], 1),
    ("HGNC:3430", "ERBB2", &["HER2"], 1),
    ("HGNC:13557", "ACE2", &[], 1),
    ("HGNC:11876", "TMPRSS2", &[], 1),
    ("HGNC:6018", "IL6", &["IL-6", "interleukin-6"], 1),
    ("HGNC:613", "APOE", &[], 1),
    ("HGNC:1884", "CFTR", &[], 1),
    ("HGNC:11892", "TNF", &["TNF-alpha"], 1),
];

const COVID_SEED: &[SeedRow] = &[
    (
        "NCBITaxon:2697049",
        "Severe acute respiratory syndrome coronavirus 2",
        &["SARS-CoV-2", "COVID-19", "COVID", "2019-nCoV", "novel coronavirus"],
        1,
    ),
    (
        "NCBITaxon:694009",
        "Severe acute respiratory syndrome-related coronavirus",
        &["SARS-CoV"],
        1,
    ),
    ("pango:B.1.1.7", "B.1.1.7", &["Alpha variant"], 1),
    ("pango:B.1.351", "B.1.351", &["Beta variant"], 1),
    ("pango:P.1", "P.1", &["Gamma variant"], 1),
    ("pango:B.1.617.2", "B.1.617.2", &["Delta variant"], 1),
    ("pango:B.1.1.529", "B.1.1.529", &["Omicron", "Omicron variant"], 1),
    ("pango:BA.2", "BA.2", &[], 1),
    ("pango:XBB.1.5", "XBB.1.5", &[], 1),
];

/// Name reported for unresolved mentions of a category.
pub fn vocabulary_name(category: Category) -> &'static str {
    match category {
        Category::Disease => "MESH",
        Category::Chemical => "CHEBI",
        Category::Genetic => "HGNC",
        Category::Covid => "NCBITaxon",
    }
}

/// Seed vocabulary for a category.
pub fn seed_vocabulary(category: Category) -> Vocabulary {
    let rows = match category {
        Category::Disease => DISEASE_SEED,
        Category::Chemical => CHEMICAL_SEED,
        Category::Genetic => GENETIC_SEED,
        Category::Covid => COVID_SEED,
    };
    Vocabulary::new(
        vocabulary_name(category),
        rows.iter()
            .map(|(id, name, synonyms, rank)| Concept::new(id, name, synonyms, *rank)),
    )
}
