//! Classifier behaviour against stores of synthetic gestures


use hand_gesture_control::{
    classifier::{Classification, Classifier},
    constants::FEATURE_LEN,
    features::{extract_pose, FeatureVector},
    gesture_store::GestureStore,
};
use test_helpers::{fist, hand, open_palm, peace, pointing, CURLED};

fn fv(fill: f64) -> FeatureVector {
    FeatureVector::new(vec![fill; FEATURE_LEN]).unwrap()
}

/// Vector at exactly `d` from `fv(0.0)`
fn at_distance(d: f64) -> FeatureVector {
    let mut values = vec![0.0; FEATURE_LEN];
    values[0] = d;
    FeatureVector::new(values).unwrap()
}

fn trained_store() -> GestureStore {
    let mut store = GestureStore::in_memory();
    store.add_sample("open_palm", &open_palm()).unwrap();
    store.add_sample("fist", &fist()).unwrap();
    store.add_sample("peace", &peace()).unwrap();
    store.add_sample("point", &pointing()).unwrap();
    store
}

#[test]
fn test_single_sample_matches_itself() {
    let mut store = GestureStore::in_memory();
    store.add_features("A", fv(0.7)).unwrap();

    let classifier = Classifier::default();
    assert_eq!(classifier.classify(&store, &fv(0.7)), Some("A".to_string()));
    match classifier.classify_detailed(&store, &fv(0.7)) {
        Classification::Match { label, distance } => {
            assert_eq!(label, "A");
            assert_eq!(distance, 0.0);
        }
        other => panic!("expected match, got {other:?}"),
    }
}

#[test]
fn test_recognizes_synthetic_gestures() {
    let store = trained_store();
    let classifier = Classifier::default();

    // Slightly different hands still land on the right label
    let cases = [
        (hand([0.05, 0.0, 0.05, 0.0, 0.0]), "open_palm"),
        (hand([CURLED, CURLED - 0.1, CURLED, CURLED, CURLED]), "fist"),
        (hand([CURLED, 0.05, 0.05, CURLED, CURLED]), "peace"),
        (hand([CURLED, 0.05, CURLED, CURLED, CURLED]), "point"),
    ];
    for (pose, expected) in cases {
        assert_eq!(
            classifier.classify(&store, &extract_pose(&pose)).as_deref(),
            Some(expected)
        );
    }
}

#[test]
fn test_empty_store_is_no_match() {
    let store = GestureStore::in_memory();
    assert_eq!(
        Classifier::default().classify_detailed(&store, &fv(0.0)),
        Classification::NoMatch
    );
}

#[test]
fn test_threshold_is_exclusive() {
    let mut store = GestureStore::in_memory();
    store.add_features("A", fv(0.0)).unwrap();
    let classifier = Classifier::new(0.5, 0.1);

    assert_eq!(classifier.classify(&store, &at_distance(0.49)), Some("A".to_string()));
    assert_eq!(classifier.classify(&store, &at_distance(0.5)), None);
    assert_eq!(classifier.classify(&store, &at_distance(3.0)), None);
}

#[test]
fn test_near_tie_between_labels_is_ambiguous() {
    let mut store = GestureStore::in_memory();
    store.add_features("A", at_distance(0.30)).unwrap();
    store.add_features("B", at_distance(-0.35)).unwrap();
    let classifier = Classifier::default();

    match classifier.classify_detailed(&store, &fv(0.0)) {
        Classification::Ambiguous {
            best, runner_up, ..
        } => {
            assert_eq!(best, "A");
            assert_eq!(runner_up, "B");
        }
        other => panic!("expected ambiguous, got {other:?}"),
    }
    assert_eq!(classifier.classify(&store, &fv(0.0)), None);

    // Clear winner once the gap exceeds the margin
    store.add_features("A", fv(0.0)).unwrap();
    assert_eq!(classifier.classify(&store, &fv(0.0)), Some("A".to_string()));
}

#[test]
fn test_samples_of_one_label_never_compete() {
    // Two near-identical samples of the same label are not ambiguous
    let mut store = GestureStore::in_memory();
    store.add_features("A", at_distance(0.10)).unwrap();
    store.add_features("A", at_distance(0.12)).unwrap();
    store.add_features("B", at_distance(0.60)).unwrap();

    assert_eq!(
        Classifier::default().classify(&store, &fv(0.0)),
        Some("A".to_string())
    );
}

#[test]
fn test_labels_without_samples_are_skipped() {
    let mut store = GestureStore::in_memory();
    store.add_features("real", at_distance(0.2)).unwrap();
    store.add_features("hollow", fv(0.0)).unwrap();
    store.delete_sample("hollow", 0).unwrap();

    assert_eq!(
        Classifier::default().classify(&store, &fv(0.0)),
        Some("real".to_string())
    );
}
