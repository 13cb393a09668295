use super::*;
use common::prediction::Confidence;
use std::path::PathBuf;

fn model_file() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../model/model.json")
}

#[test]
fn test_load_bundled_model() {
    let model = load_model(&model_file()).unwrap();
    assert_eq!(model.location_stats.len(), 8);
}

#[test]
fn test_load_missing_model_fails() {
    let err = load_model(Path::new("/nonexistent/model.json")).unwrap_err();
    assert!(err.to_string().contains("/nonexistent/model.json"));
}

#[test]
fn test_predict_report() {
    let model = load_model(&model_file()).unwrap();
    let report = predict(&model, "kilimani", 2, ListingType::Sale).unwrap();
    assert_eq!(report.result.predicted, 8_368_624.0);
    assert_eq!(report.result.confidence, Confidence::High);
    assert_eq!(report.comparables.len(), DEFAULT_COMPARABLES);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["type"], "Sale");
    assert_eq!(json["predicted"], 8_368_624.0);
    assert_eq!(json["confidence"], "high");
}

#[test]
fn test_predict_rejects_too_many_bedrooms() {
    let model = load_model(&model_file()).unwrap();
    let err = predict(&model, "kilimani", 3000, ListingType::Sale).unwrap_err();
    assert!(err.to_string().contains("at most 20"));
}

#[test]
fn test_describe() {
    let model = load_model(&model_file()).unwrap();
    let report = describe(&model);
    assert_eq!(
        report,
        ModelReport {
            locations: 8,
            premiums: 7,
            sale_buckets: 8,
            rent_buckets: 8,
            training_rows: 1157,
            r2: 0.74,
        }
    );
}
