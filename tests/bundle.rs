use std::fs;

use bionlp_service::{data::bundle, nlp::EntityLabel};

fn touch(dir: &std::path::Path, name: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(name), b"").unwrap();
}

#[test]
fn complete_bundle_is_reported_complete() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("Disease");
    touch(&dir, "model.safetensors");
    touch(&dir, "config.json");
    touch(&dir, "vocab.txt");

    let status = bundle::inspect(root.path(), EntityLabel::Disease);

    assert!(status.is_complete());
    assert_eq!(status.weights, Some("model.safetensors"));
    assert!(status.missing().is_empty());
}

#[test]
fn weights_without_tokenizer_is_incomplete() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("Chemical");
    touch(&dir, "pytorch_model.bin");
    touch(&dir, "config.json");

    let status = bundle::inspect(root.path(), EntityLabel::Chemical);

    assert!(!status.is_complete());
    assert_eq!(status.missing(), vec!["tokenizer"]);
    assert!(!bundle::is_complete(root.path(), EntityLabel::Chemical));
}

#[test]
fn genetic_bundle_lives_under_gene() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("Gene");
    touch(&dir, "pytorch_model.bin");
    touch(&dir, "config.json");
    touch(&dir, "tokenizer.json");

    assert!(bundle::is_complete(root.path(), EntityLabel::Genetic));
    assert!(!bundle::is_complete(root.path(), EntityLabel::Disease));
}

#[test]
fn directory_named_like_a_file_does_not_count() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("Disease");
    fs::create_dir_all(dir.join("config.json")).unwrap();
    touch(&dir, "model.onnx");
    touch(&dir, "tokenizer_config.json");

    assert!(!bundle::is_complete(root.path(), EntityLabel::Disease));
}
