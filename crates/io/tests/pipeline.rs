//! End-to-end: fixture files → adapters → engine → projections.

use std::path::{Path, PathBuf};

use ossror_io::{build_hierarchy, load_all, write_hierarchical, write_tabular, SourceError};
use ossror_recon::{run, MalformedPolicy, PipelineConfig};

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn config() -> PipelineConfig {
    let text = std::fs::read_to_string(fixtures().join("pipeline.toml")).unwrap();
    PipelineConfig::from_toml(&text).unwrap()
}

fn tabular(config: &PipelineConfig) -> String {
    let batches = load_all(config, &fixtures()).unwrap();
    let result = run(&batches, config.on_malformed).unwrap();
    let mut out = Vec::new();
    write_tabular(&result.links, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn fixture_pipeline_matches_expected_csv() {
    let expected = std::fs::read_to_string(fixtures().join("expected_software_to_ror.csv")).unwrap();
    assert_eq!(tabular(&config()), expected);
}

#[test]
fn source_order_does_not_change_csv_bytes() {
    let forward = tabular(&config());

    let mut reversed = config();
    reversed.sources.reverse();
    assert_eq!(tabular(&reversed), forward);

    let mut rotated = config();
    rotated.sources.rotate_left(2);
    assert_eq!(tabular(&rotated), forward);
}

#[test]
fn summary_counts_per_source() {
    let config = config();
    let batches = load_all(&config, &fixtures()).unwrap();
    let result = run(&batches, MalformedPolicy::Abort).unwrap();
    let summary = &result.summary;

    assert_eq!(summary.source_records["orca"], 4);
    assert_eq!(summary.source_records["stack_readme"], 2);
    assert_eq!(summary.source_records["curated"], 3);
    assert_eq!(summary.source_records["czi"], 1);
    assert_eq!(summary.source_records["joss"], 1);
    assert_eq!(summary.source_records["openaire"], 1);
    assert_eq!(summary.input_records, 12);
    assert_eq!(summary.links, 8);
    assert_eq!(summary.merged_duplicates, 4);
    assert_eq!(summary.distinct_rors, 5);
    assert!(result.conflicts.is_empty());
}

#[test]
fn hierarchy_is_second_pass_over_links() {
    let config = config();
    let batches = load_all(&config, &fixtures()).unwrap();
    let result = run(&batches, config.on_malformed).unwrap();

    let tree = build_hierarchy(&result.links);
    let leaves: usize = tree.values().map(|names| names.len()).sum();
    assert_eq!(leaves, result.links.len());

    let nasa = &tree["https://ror.org/027ka1x80"];
    assert_eq!(nasa.len(), 2);
    assert_eq!(nasa["nasa/openmct"].extraction_methods, "by_name;human_curated;url_matches");

    let seurat = &tree["https://ror.org/04ezjnq35"];
    assert_eq!(seurat["Seurat"].extraction_methods, "czi_affiliation_links;openaire_czi");
    assert_eq!(seurat["satijalab/seurat"].github_slug, "satijalab/seurat");

    let mut out = Vec::new();
    write_hierarchical(&result.links, &mut out).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(value["https://ror.org/004fze387"]["PyDMD"]["github_slug"], "mathLab/PyDMD");
}

#[test]
fn missing_source_file_names_source() {
    let mut config = config();
    config.sources[1].file = "nope.csv".into();

    let err = load_all(&config, &fixtures()).unwrap_err();
    assert!(matches!(err, SourceError::Io { ref origin, .. } if origin == "stack_readme"), "{err}");
}
