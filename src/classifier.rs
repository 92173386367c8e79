//! Nearest-neighbour gesture classifier with ambiguity rejection.
//!
//! For each label the closest of its samples is found; the best and the
//! runner-up are tracked across distinct labels. A match is accepted only if
//! it is within the match threshold and clearly ahead of the runner-up, so two
//! near-duplicate gestures never alternate frame to frame.

use crate::{
    constants::{DEFAULT_AMBIGUITY_MARGIN, DEFAULT_MATCH_THRESHOLD},
    features::FeatureVector,
    gesture_store::GestureStore,
};
use log::debug;

/// Outcome of comparing one feature vector against the store
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// Store has no samples, or the best distance is over the threshold
    NoMatch,
    /// Best and runner-up labels are too close to call
    Ambiguous {
        best: String,
        best_distance: f64,
        runner_up: String,
        runner_up_distance: f64,
    },
    /// A single label wins
    Match { label: String, distance: f64 },
}

impl Classification {
    /// The matched label, if any
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Match { label, .. } => Some(label),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_label(self) -> Option<String> {
        match self {
            Self::Match { label, .. } => Some(label),
            _ => None,
        }
    }
}

/// 1-NN classifier parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classifier {
    match_threshold: f64,
    ambiguity_margin: f64,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(DEFAULT_MATCH_THRESHOLD, DEFAULT_AMBIGUITY_MARGIN)
    }
}

impl Classifier {
    #[must_use]
    pub const fn new(match_threshold: f64, ambiguity_margin: f64) -> Self {
        Self {
            match_threshold,
            ambiguity_margin,
        }
    }

    #[must_use]
    pub const fn match_threshold(&self) -> f64 {
        self.match_threshold
    }

    #[must_use]
    pub const fn ambiguity_margin(&self) -> f64 {
        self.ambiguity_margin
    }

    /// Best label for `features`, or `None` when nothing matches unambiguously
    #[must_use]
    pub fn classify(&self, store: &GestureStore, features: &FeatureVector) -> Option<String> {
        self.classify_detailed(store, features).into_label()
    }

    /// Full classification result including distances
    #[must_use]
    pub fn classify_detailed(&self, store: &GestureStore, features: &FeatureVector) -> Classification {
        let mut best: Option<(&str, f64)> = None;
        let mut runner_up: Option<(&str, f64)> = None;

        for (label, samples) in store.iter() {
            let Some(local) = samples
                .iter()
                .map(|s| features.distance(s))
                .min_by(f64::total_cmp)
            else {
                continue;
            };

            match best {
                Some((_, d)) if local >= d => {
                    if runner_up.map_or(true, |(_, r)| local < r) {
                        runner_up = Some((label, local));
                    }
                }
                _ => {
                    runner_up = best;
                    best = Some((label, local));
                }
            }
        }

        let Some((label, distance)) = best else {
            return Classification::NoMatch;
        };
        if distance >= self.match_threshold {
            return Classification::NoMatch;
        }

        if let Some((other, other_distance)) = runner_up {
            if other_distance - distance < self.ambiguity_margin {
                debug!("Ambiguous: {label}({distance:.2}) vs {other}({other_distance:.2})");
                return Classification::Ambiguous {
                    best: label.to_string(),
                    best_distance: distance,
                    runner_up: other.to_string(),
                    runner_up_distance: other_distance,
                };
            }
        }

        debug!("Matched: {label} | Dist: {distance:.3}");
        Classification::Match {
            label: label.to_string(),
            distance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::FEATURE_LEN;

    fn fv_with(first: f64) -> FeatureVector {
        let mut v = vec![0.0; FEATURE_LEN];
        v[0] = first;
        FeatureVector::new(v).unwrap()
    }

    #[test]
    fn test_empty_store_no_match() {
        let store = GestureStore::in_memory();
        assert_eq!(
            Classifier::default().classify_detailed(&store, &fv_with(0.0)),
            Classification::NoMatch
        );
    }

    #[test]
    fn test_exact_sample_matches() {
        let mut store = GestureStore::in_memory();
        store.add_features("A", fv_with(0.3)).unwrap();
        assert_eq!(Classifier::default().classify(&store, &fv_with(0.3)).as_deref(), Some("A"));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let mut store = GestureStore::in_memory();
        store.add_features("A", fv_with(0.0)).unwrap();
        let classifier = Classifier::new(0.5, 0.1);
        assert_eq!(classifier.classify(&store, &fv_with(0.5)), None);
        assert_eq!(classifier.classify(&store, &fv_with(0.49)).as_deref(), Some("A"));
    }

    #[test]
    fn test_ambiguous_labels_rejected() {
        let mut store = GestureStore::in_memory();
        store.add_features("A", fv_with(0.0)).unwrap();
        store.add_features("B", fv_with(0.3)).unwrap();

        // 0.14 from A, 0.16 from B
        let result = Classifier::default().classify_detailed(&store, &fv_with(0.14));
        match result {
            Classification::Ambiguous { best, runner_up, .. } => {
                assert_eq!(best, "A");
                assert_eq!(runner_up, "B");
            }
            other => panic!("Expected ambiguity, got {other:?}"),
        }
    }

    #[test]
    fn test_runner_up_is_per_label_not_per_sample() {
        let mut store = GestureStore::in_memory();
        // Two close samples of the same label must not count as ambiguity
        store.add_features("A", fv_with(0.0)).unwrap();
        store.add_features("A", fv_with(0.05)).unwrap();
        store.add_features("B", fv_with(0.6)).unwrap();

        assert_eq!(Classifier::default().classify(&store, &fv_with(0.02)).as_deref(), Some("A"));
    }

    #[test]
    fn test_runner_up_found_when_best_comes_later() {
        let mut store = GestureStore::in_memory();
        // "A" iterates first but "B" is closer; A must still be the runner-up
        store.add_features("A", fv_with(0.2)).unwrap();
        store.add_features("B", fv_with(0.1)).unwrap();
        let result = Classifier::default().classify_detailed(&store, &fv_with(0.12));
        assert!(matches!(result, Classification::Ambiguous { ref best, .. } if best == "B"));
    }

    #[test]
    fn test_empty_label_never_matches() {
        let mut store = GestureStore::in_memory();
        store.add_features("ghost", fv_with(0.0)).unwrap();
        store.delete_sample("ghost", 0).unwrap();
        store.add_features("real", fv_with(1.5)).unwrap();

        assert_eq!(Classifier::default().classify(&store, &fv_with(0.0)), None);
        assert_eq!(Classifier::default().classify(&store, &fv_with(1.45)).as_deref(), Some("real"));
    }
}
