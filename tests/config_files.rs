//! Configuration persistence and loading.

use gbrt_rust::{Config, ConfigBuilder, GbrtError, GradientBoostedRegressorBuilder, LossType};
use std::fs;
use tempfile::TempDir;

fn custom_config() -> Config {
    ConfigBuilder::new()
        .num_trees(25)
        .max_depth(4)
        .learning_rate(0.25)
        .min_samples_per_leaf(3)
        .min_impurity_improvement(1e-6)
        .loss(LossType::LeastAbsoluteDeviation)
        .parallel_split_search(true)
        .num_threads(2)
        .build()
        .unwrap()
}

#[test]
fn test_json_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gbrt.json");
    let config = custom_config();

    config.save_to_file(&path).unwrap();
    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_toml_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(gbrt_rust::config::DEFAULT_CONFIG_FILE);
    let config = custom_config();

    config.save_to_file(&path).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("loss = \"least_absolute_deviation\""));

    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_partial_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("partial.toml");
    fs::write(&path, "num_trees = 7\nlearning_rate = 0.5\n").unwrap();

    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded.num_trees, 7);
    assert_eq!(loaded.learning_rate, 0.5);
    assert_eq!(loaded.max_depth, Config::default().max_depth);
    assert_eq!(loaded.loss, LossType::LeastSquares);
}

#[test]
fn test_invalid_values_rejected_on_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, r#"{ "num_trees": 0 }"#).unwrap();

    let err = Config::load_from_file(&path).unwrap_err();
    assert!(matches!(err, GbrtError::InvalidParameter { .. }));
}

#[test]
fn test_unparsable_and_unsupported_files() {
    let dir = TempDir::new().unwrap();

    let garbled = dir.path().join("garbled.json");
    fs::write(&garbled, "{ not json").unwrap();
    assert!(matches!(
        Config::load_from_file(&garbled),
        Err(GbrtError::Config { .. })
    ));

    let yaml = dir.path().join("gbrt.yaml");
    fs::write(&yaml, "num_trees: 3").unwrap();
    assert!(Config::load_from_file(&yaml).is_err());
    assert!(Config::default().save_to_file(&yaml).is_err());

    let missing = dir.path().join("missing.toml");
    assert!(Config::load_from_file(&missing).is_err());
}

#[test]
fn test_loaded_config_drives_training() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("train.toml");
    fs::write(&path, "num_trees = 4\nmax_depth = 1\nlearning_rate = 1.0\n").unwrap();

    let config = Config::load_from_file(&path).unwrap();
    let x = vec![0.0, 1.0, 2.0, 3.0];
    let y = vec![1.0, 1.0, 5.0, 5.0];
    let model = GradientBoostedRegressorBuilder::with_config(config)
        .unwrap()
        .fit(&x, &y)
        .unwrap();
    assert_eq!(model.additive_regression_tree().num_trees(), 5);
    assert_eq!(model.predict_row(&[3.0]).unwrap(), 5.0);
}
