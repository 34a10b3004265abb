//! End-to-end reference scenario: one boosting round of a depth-1 tree on the
//! generated periodic table.

mod common;

use approx::assert_abs_diff_eq;
use common::generate_data;
use gbrt_rust::{
    ColumnFrame, Config, Executor, GradientBoostedRegressorBuilder, InlineExecutor, Rule,
    TabularData, ThreadPoolExecutor,
};

fn fixture() -> (ColumnFrame, ColumnFrame) {
    generate_data(0.1, 10)
        .split_last_column()
        .expect("fixture has columns")
}

fn assert_reference_ensemble(model: &gbrt_rust::GradientBoostedRegressor) {
    let trees = model.additive_regression_tree().trees();
    assert_eq!(trees.len(), 2);

    let base = trees[0].rules();
    assert_eq!(base.len(), 1);
    assert!(base[0].is_leaf());
    assert_abs_diff_eq!(base[0].leaf_value(), 4.98992443325, epsilon = 1e-9);

    let rules = trees[1].rules();
    assert_eq!(rules.len(), 3);

    let root = match &rules[0] {
        Rule::Split(split) => split,
        Rule::Leaf(_) => panic!("root of the boosted tree must be a split"),
    };
    assert_eq!(root.jump_if_less, 1);
    assert_eq!(root.jump_if_higher, 2);
    assert_eq!(root.dimension, 8);
    // Column 8 takes the values 0..=9; the split separates {0, 1, 2, 3}.
    assert!(root.split_point > 3.0 && root.split_point < 4.0);
    assert_abs_diff_eq!(root.impurity_improvement, 0.00093093285723711, epsilon = 1e-9);
    assert_eq!(root.num_samples, 1191);
    assert_abs_diff_eq!(root.leaf_value, 0.0, epsilon = 1e-9);

    assert!(rules[1].is_leaf());
    assert!(rules[2].is_leaf());
    assert_abs_diff_eq!(rules[1].leaf_value(), 0.0373292355137323, epsilon = 1e-9);
    assert_abs_diff_eq!(rules[2].leaf_value(), -0.0249384388516114, epsilon = 1e-9);
}

#[test]
fn test_fixture_shape() {
    let (x, y) = fixture();
    assert_eq!(x.num_rows(), 1191);
    assert_eq!(x.num_columns(), 9);
    assert_eq!(y.num_columns(), 1);
}

#[test]
fn test_reference_ensemble() {
    let (x, y) = fixture();
    let model = GradientBoostedRegressorBuilder::new(1, 1, 1.0)
        .unwrap()
        .fit(&x, &y)
        .unwrap();
    assert_reference_ensemble(&model);
}

#[test]
fn test_reference_ensemble_through_executors() {
    let (x, y) = fixture();
    let builder = GradientBoostedRegressorBuilder::new(1, 1, 1.0).unwrap();

    let inline = InlineExecutor
        .evaluate(|| builder.fit(&x, &y))
        .unwrap()
        .unwrap();
    assert_reference_ensemble(&inline);

    let pooled = ThreadPoolExecutor::new(4)
        .unwrap()
        .evaluate(|| builder.fit(&x, &y))
        .unwrap()
        .unwrap();
    assert_eq!(inline, pooled);
}

#[test]
fn test_reference_ensemble_with_parallel_split_search() {
    let (x, y) = fixture();
    let config = Config {
        num_trees: 1,
        max_depth: 1,
        learning_rate: 1.0,
        parallel_split_search: true,
        ..Config::default()
    };
    let model = GradientBoostedRegressorBuilder::with_config(config)
        .unwrap()
        .fit(&x, &y)
        .unwrap();
    assert_reference_ensemble(&model);
}

#[test]
fn test_reference_predictions() {
    let (x, y) = fixture();
    let model = GradientBoostedRegressorBuilder::new(1, 1, 1.0)
        .unwrap()
        .fit(&x, &y)
        .unwrap();

    let mut low = x.row(0);
    low[8] = 2.0;
    let mut high = x.row(0);
    high[8] = 7.0;
    assert_abs_diff_eq!(
        model.predict_row(&low).unwrap(),
        4.98992443325 + 0.0373292355137323,
        epsilon = 1e-9
    );
    assert_abs_diff_eq!(
        model.predict_row(&high).unwrap(),
        4.98992443325 - 0.0249384388516114,
        epsilon = 1e-9
    );
}
