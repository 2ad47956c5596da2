//! Model bundle availability checks.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::nlp::EntityLabel;

/// Accepted weight file names, in preference order.
pub const WEIGHT_FILES: &[&str] = &["pytorch_model.bin", "model.safetensors", "model.onnx"];
/// Accepted configuration file names.
pub const CONFIG_FILES: &[&str] = &["config.json"];
/// Accepted tokenizer artefacts.
pub const TOKENIZER_FILES: &[&str] = &["tokenizer_config.json", "tokenizer.json", "vocab.txt"];

/// What was found in a category's bundle directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundleStatus {
    pub label: EntityLabel,
    pub dir: PathBuf,
    pub weights: Option<&'static str>,
    pub config: Option<&'static str>,
    pub tokenizer: Option<&'static str>,
}

impl BundleStatus {
    pub fn is_complete(&self) -> bool {
        self.weights.is_some() && self.config.is_some() && self.tokenizer.is_some()
    }

    /// Names of the artefact groups that are absent.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.weights.is_none() {
            out.push("weights");
        }
        if self.config.is_none() {
            out.push("config");
        }
        if self.tokenizer.is_none() {
            out.push("tokenizer");
        }
        out
    }
}

/// Directory expected to hold the bundle for `label`.
pub fn bundle_dir(model_root: &Path, label: EntityLabel) -> PathBuf {
    model_root.join(label.bundle_dir())
}

/// Inspect the bundle of one category without loading anything.
pub fn inspect(model_root: &Path, label: EntityLabel) -> BundleStatus {
    let dir = bundle_dir(model_root, label);
    BundleStatus {
        label,
        weights: first_present(&dir, WEIGHT_FILES),
        config: first_present(&dir, CONFIG_FILES),
        tokenizer: first_present(&dir, TOKENIZER_FILES),
        dir,
    }
}

/// True when weights, configuration and tokenizer files are all present.
pub fn is_complete(model_root: &Path, label: EntityLabel) -> bool {
    inspect(model_root, label).is_complete()
}

fn first_present(dir: &Path, candidates: &[&'static str]) -> Option<&'static str> {
    candidates.iter().copied().find(|name| dir.join(name).is_file())
}
