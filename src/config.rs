//! Runtime configuration utilities for bionlp-service.

use std::{
    env,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;

use crate::normalize::DEFAULT_MATCH_THRESHOLD;

const OFFLINE_VARS: &[&str] = &["BIONLP_OFFLINE", "HF_HUB_OFFLINE", "TRANSFORMERS_OFFLINE"];

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Root folder holding one model bundle per entity category.
    pub model_root: PathBuf,
    /// Folder with optional vocabulary CSV extensions.
    pub vocab_dir: PathBuf,
    /// Never reach out to remote knowledge sources.
    pub offline: bool,
    /// Skip categories whose model bundle is incomplete.
    pub require_model_bundles: bool,
    /// Minimum similarity for a fuzzy candidate to be accepted.
    pub match_threshold: f64,
    /// Upper bound for a single knowledge-source lookup.
    pub lookup_timeout_ms: u64,
    /// Base URL of the NLM RxNav REST API.
    pub rxnav_base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model_root: PathBuf::from("./models"),
            vocab_dir: PathBuf::from("./vocab"),
            offline: false,
            require_model_bundles: true,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            lookup_timeout_ms: 3_000,
            rxnav_base_url: "https://rxnav.nlm.nih.gov/REST".to_string(),
        }
    }
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let model_root = env::var("MODEL_ROOT")
            .map(PathBuf::from)
            .unwrap_or(defaults.model_root);
        let vocab_dir = env::var("VOCAB_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.vocab_dir);
        let offline = OFFLINE_VARS
            .iter()
            .any(|name| env::var(name).map(|v| is_truthy(&v)).unwrap_or(false));
        let require_model_bundles = env::var("BIONLP_REQUIRE_MODEL_BUNDLES")
            .map(|v| is_truthy(&v))
            .unwrap_or(defaults.require_model_bundles);
        let match_threshold = env::var("BIONLP_MATCH_THRESHOLD")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|t| (0.0..=1.0).contains(t))
            .unwrap_or(defaults.match_threshold);
        let lookup_timeout_ms = env::var("BIONLP_LOOKUP_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.lookup_timeout_ms);
        let rxnav_base_url = env::var("RXNAV_BASE_URL").unwrap_or(defaults.rxnav_base_url);

        Ok(Self {
            model_root,
            vocab_dir,
            offline,
            require_model_bundles,
            match_threshold,
            lookup_timeout_ms,
            rxnav_base_url,
        })
    }

    /// Per-lookup timeout as a `Duration`.
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }

    /// Convenience helper for a category's vocabulary extension file.
    pub fn join_vocab<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.vocab_dir.join(path)
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::is_truthy;

    #[test]
    fn truthy_values() {
        assert!(is_truthy("1"));
        assert!(is_truthy(" TRUE "));
        assert!(is_truthy("on"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy(""));
    }
}
