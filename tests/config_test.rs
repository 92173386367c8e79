//! Configuration file loading and validation


use hand_gesture_control::{
    config::{Config, EXAMPLE_CONFIG},
    cursor_control::{CursorMapper, CursorTracker},
    Error,
};
use std::{fs, path::PathBuf};
use tempfile::TempDir;
use test_helpers::mouse_pose;

#[test]
fn test_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");

    let mut config = Config::default();
    config.recognition.required_stability = 5;
    config.dispatch.cooldown_secs = 1.5;
    config.smart_mouse.mirror_x = false;
    config.screen.width = 2560;
    config.storage.samples_dir = PathBuf::from("/data/samples");
    config.to_file(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded.recognition.required_stability, 5);
    assert_eq!(loaded.dispatch.cooldown_secs, 1.5);
    assert!(!loaded.smart_mouse.mirror_x);
    assert_eq!(loaded.screen.width, 2560);
    assert_eq!(loaded.storage.samples_dir, PathBuf::from("/data/samples"));
    assert!(loaded.validate().is_ok());
}

#[test]
fn test_partial_file_uses_defaults() {
    let config = Config::from_yaml("recognition:\n  match_threshold: 0.6\n").unwrap();
    assert_eq!(config.recognition.match_threshold, 0.6);
    assert_eq!(config.recognition.ambiguity_margin, 0.10);
    assert_eq!(config.recognition.required_stability, 3);
    assert_eq!(config.smart_mouse.filter, "exponential");
    assert_eq!(config.screen.height, 1080);
    assert_eq!(config.storage.bindings_file, PathBuf::from("action_config.json"));

    let empty = Config::from_yaml("{}").unwrap();
    assert_eq!(empty.dispatch.cooldown_secs, 0.5);
}

#[test]
fn test_example_config_matches_defaults() {
    let example = Config::from_yaml(EXAMPLE_CONFIG).unwrap();
    let defaults = Config::default();
    assert_eq!(example.recognition.match_threshold, defaults.recognition.match_threshold);
    assert_eq!(example.dispatch.status_clear_secs, defaults.dispatch.status_clear_secs);
    assert_eq!(example.smart_mouse.curl_threshold, defaults.smart_mouse.curl_threshold);
    assert_eq!(example.storage.gestures_file, defaults.storage.gestures_file);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let result = Config::from_file(dir.path().join("absent.yaml"));
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_malformed_yaml_is_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(&path, "recognition: [unclosed").unwrap();
    match Config::from_file(&path) {
        Err(Error::ConfigError(msg)) => assert!(msg.contains("parse")),
        other => panic!("Expected ConfigError, got {other:?}"),
    }

    let wrong_type = Config::from_yaml("screen:\n  width: wide\n");
    assert!(matches!(wrong_type, Err(Error::ConfigError(_))));
}

#[test]
fn test_validation_rules() {
    let cases: Vec<(&str, fn(&mut Config))> = vec![
        ("match threshold", |c| c.recognition.match_threshold = 0.0),
        ("margin", |c| c.recognition.ambiguity_margin = -0.1),
        ("stability", |c| c.recognition.required_stability = 0),
        ("cooldown", |c| c.dispatch.cooldown_secs = f64::NAN),
        ("status clear", |c| c.dispatch.status_clear_secs = -1.0),
        ("right click", |c| c.smart_mouse.right_click_cooldown_secs = f64::INFINITY),
        ("curl", |c| c.smart_mouse.curl_threshold = 0.0),
        ("smoothing", |c| c.smart_mouse.smoothing_factor = 1.2),
        ("filter", |c| c.smart_mouse.filter = "median".to_string()),
        ("screen", |c| c.screen.height = 0),
        ("storage", |c| c.storage.gestures_file = PathBuf::new()),
    ];

    for (name, mutate) in cases {
        let mut config = Config::default();
        mutate(&mut config);
        assert!(
            matches!(config.validate(), Err(Error::ConfigError(_))),
            "{name} should be rejected"
        );
    }
}

#[test]
fn test_cursor_filter_from_config() {
    let mut config = Config::default();
    config.smart_mouse.filter = "none".to_string();
    let filter = config.create_cursor_filter().unwrap();
    assert_eq!(filter.name(), "NoFilter");

    // Without smoothing the cursor lands on the target immediately
    let mapper = CursorMapper::new(1000, 1000, true);
    let mut tracker = CursorTracker::with_filter(mapper, filter);
    tracker.update(&mouse_pose(0.2, 0.3));
    assert_eq!(tracker.update(&mouse_pose(0.2, 0.25)), (500, 250));

    config.smart_mouse.filter = "Exponential".to_string();
    config.smart_mouse.smoothing_factor = 0.0;
    assert!(config.create_cursor_filter().is_ok());
}
