//! End-to-end tests of both pipelines against the bundled model directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use claimguard::adapters::artifacts::{ArtifactManifest, MANIFEST_FILE};
use claimguard::adapters::{tabular, ModelArtifact};
use claimguard::application::{BatchPredictionService, InferenceContext, SinglePredictionService};
use claimguard::domain::{
    BatchWarning, Gender, PolicyType, PolicyholderRecord, RawRecord, Region, Verdict, AGE_RANGE,
    ANNUAL_PREMIUM_RANGE, CLAIMS_HISTORY_RANGE, CREDIT_SCORE_RANGE, DEPENDENTS_RANGE,
    VEHICLE_AGE_RANGE,
};
use claimguard::ClaimGuardError;
use tempfile::tempdir;

fn repo_path(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(relative)
}

fn context() -> Arc<InferenceContext<ModelArtifact>> {
    let context =
        InferenceContext::load(&repo_path("models"), "vehicle_type").expect("load bundled models");
    Arc::new(context)
}

#[test]
fn test_bundled_artifacts_agree() {
    let context = context();
    assert_eq!(context.model_kind(), "random_forest");
    assert_eq!(context.schema().len(), 15);
    assert_eq!(
        context.encoder().map(|e| e.classes().len()),
        Some(4),
        "vehicle_type encoder should be bundled"
    );
}

#[test]
fn test_single_default_policyholder() {
    let service = SinglePredictionService::new(context());
    let result = service
        .predict_policyholder(&PolicyholderRecord::default())
        .expect("predict");

    assert_eq!(result.prediction.verdict(), Verdict::UnlikelyToClaim);
    assert!((result.prediction.probability - 0.83 / 3.0).abs() < 1e-9);
    assert_eq!(
        result.prediction.summary(),
        "This policyholder is UNLIKELY to claim. (Probability: 0.28)"
    );
    assert!(result.unknown_categories.is_empty());
    // The form has no vehicle type; the label-encoded column is zero-filled
    // and reported.
    assert_eq!(result.unfilled_columns, ["vehicle_type"]);
}

#[test]
fn test_single_young_driver_with_claims() {
    let service = SinglePredictionService::new(context());
    let record = PolicyholderRecord {
        age: 22,
        claims_history: 3,
        policy_type: PolicyType::ThirdParty,
        region: Region::Suburban,
        ..Default::default()
    };
    let result = service.predict_policyholder(&record).expect("predict");

    // 0.75, 0.55 and 0.30 from the three trees.
    assert_eq!(result.prediction.label, 1);
    assert!((result.prediction.probability - 1.6 / 3.0).abs() < 1e-9);
}

#[test]
fn test_single_alignment_matches_schema() {
    let service = SinglePredictionService::new(context());
    let aligned = service.align(&PolicyholderRecord::default().to_raw_record());

    assert_eq!(aligned.columns(), service.context().schema().columns());
    let ones: Vec<&str> = aligned
        .columns()
        .iter()
        .zip(aligned.values())
        .filter(|(c, v)| c.contains('_') && c.chars().any(char::is_uppercase) && **v == 1.0)
        .map(|(c, _)| c.as_str())
        .collect();
    assert_eq!(
        ones,
        ["gender_Male", "policy_type_Comprehensive", "region_Urban"]
    );
    assert_eq!(aligned.get("age"), Some(30.0));
    assert_eq!(aligned.get("credit_score"), Some(600.0));
    assert_eq!(aligned.get("vehicle_type"), Some(0.0));
    assert_eq!(aligned.unfilled_columns(), ["vehicle_type"]);
}

#[test]
fn test_every_valid_form_record_aligns_to_schema() {
    let service = SinglePredictionService::new(context());
    let schema = service.context().schema().columns().to_vec();

    let low = PolicyholderRecord {
        age: *AGE_RANGE.start(),
        vehicle_age: *VEHICLE_AGE_RANGE.start(),
        annual_premium: *ANNUAL_PREMIUM_RANGE.start(),
        claims_history: *CLAIMS_HISTORY_RANGE.start(),
        credit_score: *CREDIT_SCORE_RANGE.start(),
        number_of_dependents: *DEPENDENTS_RANGE.start(),
        ..Default::default()
    };
    let high = PolicyholderRecord {
        age: *AGE_RANGE.end(),
        vehicle_age: *VEHICLE_AGE_RANGE.end(),
        annual_premium: *ANNUAL_PREMIUM_RANGE.end(),
        claims_history: *CLAIMS_HISTORY_RANGE.end(),
        credit_score: *CREDIT_SCORE_RANGE.end(),
        number_of_dependents: *DEPENDENTS_RANGE.end(),
        ..Default::default()
    };

    let mut checked = 0;
    for base in [PolicyholderRecord::default(), low, high] {
        for gender in Gender::ALL {
            for policy_type in PolicyType::ALL {
                for region in Region::ALL {
                    let record = PolicyholderRecord {
                        gender,
                        policy_type,
                        region,
                        ..base.clone()
                    };
                    record.validate().expect("record within form bounds");

                    let aligned = service.align(&record.to_raw_record());
                    assert_eq!(aligned.columns(), schema.as_slice());
                    assert!(aligned.values().iter().all(|v| v.is_finite()));
                    assert!(aligned.unknown_categories().is_empty(), "{record:?}");
                    assert_eq!(aligned.unfilled_columns(), ["vehicle_type"]);

                    for attribute in ["gender_", "policy_type_", "region_"] {
                        let hot: Vec<f64> = aligned
                            .columns()
                            .iter()
                            .zip(aligned.values())
                            .filter(|(c, _)| c.starts_with(attribute))
                            .map(|(_, v)| *v)
                            .collect();
                        assert_eq!(
                            hot.iter().filter(|v| **v == 1.0).count(),
                            1,
                            "{attribute} for {record:?}"
                        );
                        assert!(hot.iter().all(|v| *v == 0.0 || *v == 1.0));
                    }

                    service.predict_policyholder(&record).expect("predict");
                    checked += 1;
                }
            }
        }
    }
    assert_eq!(checked, 3 * 2 * 3 * 3);
}

#[test]
fn test_single_unknown_region_is_flagged() {
    let service = SinglePredictionService::new(context());
    let record = RawRecord::new()
        .with("age", 40u32)
        .with("region", "Coastal")
        .with("gender", "Female");
    let result = service.predict_record(&record).expect("predict");

    assert_eq!(result.unknown_categories.len(), 1);
    assert_eq!(result.unknown_categories[0].attribute, "region");
    assert_eq!(result.unknown_categories[0].value, "Coastal");
}

#[test]
fn test_batch_demo_file_end_to_end() {
    let service = BatchPredictionService::new(context());
    let result = service
        .predict_file(&repo_path("demos/policyholders.csv"), b',')
        .expect("predict demo file");

    assert_eq!(
        result.warnings,
        [BatchWarning::ExtraColumns(vec!["policy_id".into()])]
    );
    assert_eq!(result.row_count(), 5);
    assert_eq!(result.positive_count, 2);

    let predictions: Vec<&str> = result
        .table
        .column_values("prediction")
        .expect("prediction column")
        .collect();
    assert_eq!(predictions, ["0", "1", "0", "1", "0"]);

    let mut expected_columns: Vec<String> = service.context().schema().columns().to_vec();
    expected_columns.push("prediction".into());
    assert_eq!(result.table.columns(), expected_columns.as_slice());

    let temp = tempdir().expect("tempdir");
    let out = temp.path().join("predictions.csv");
    service.export(&result, &out).expect("export");
    let reparsed = tabular::read_table_path(&out, b',').expect("reparse export");
    assert_eq!(reparsed, result.table);
}

#[test]
fn test_batch_missing_vehicle_type() {
    let demo = tabular::read_table_path(&repo_path("demos/policyholders.csv"), b',')
        .expect("read demo");
    let keep: Vec<String> = demo
        .columns()
        .iter()
        .filter(|c| *c != "vehicle_type")
        .cloned()
        .collect();
    let without = demo.select(&keep).expect("select");

    let service = BatchPredictionService::new(context());
    let err = service.predict_table(&without).expect_err("missing column");
    assert!(matches!(
        err,
        ClaimGuardError::MissingColumns(cols) if cols == ["vehicle_type"]
    ));
}

#[test]
fn test_batch_unknown_vehicle_type() {
    let temp = tempdir().expect("tempdir");
    let input = temp.path().join("input.csv");
    let demo = std::fs::read_to_string(repo_path("demos/policyholders.csv")).expect("read demo");
    std::fs::write(&input, demo.replace("Truck", "Hovercraft")).expect("write input");

    let service = BatchPredictionService::new(context());
    let err = service.predict_file(&input, b',').expect_err("unknown label");
    assert!(matches!(
        err,
        ClaimGuardError::UnknownCategory { column, values }
            if column == "vehicle_type" && values == ["Hovercraft"]
    ));
}

#[test]
fn test_tampered_artifacts_refuse_to_load() {
    let temp = tempdir().expect("tempdir");
    let dir = temp.path();
    for name in ["model.json", "model_columns.json", "vehicle_type_encoder.json"] {
        std::fs::copy(repo_path("models").join(name), dir.join(name)).expect("copy artifact");
    }

    let manifest = ArtifactManifest::for_directory(
        dir,
        &["model.json", "model_columns.json", "vehicle_type_encoder.json"],
    )
    .expect("manifest");
    std::fs::write(
        dir.join(MANIFEST_FILE),
        serde_json::to_vec_pretty(&manifest).expect("serialize"),
    )
    .expect("write manifest");

    let context = InferenceContext::load(dir, "vehicle_type").expect("verified load");
    assert!(context.is_verified());

    std::fs::write(
        dir.join("vehicle_type_encoder.json"),
        r#"{"column": "vehicle_type", "classes": ["Hovercraft"]}"#,
    )
    .expect("tamper");
    assert!(matches!(
        InferenceContext::load(dir, "vehicle_type"),
        Err(ClaimGuardError::Artifact(_))
    ));
}
