//! Constants used throughout the application

/// Number of landmarks in one hand pose
pub const NUM_HAND_LANDMARKS: usize = 21;

/// Landmark indices
pub const WRIST: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const INDEX_BASE: usize = 5;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_BASE: usize = 9;

/// Number of fingers on one hand
pub const NUM_FINGERS: usize = 5;

/// Bones (direction vectors) per finger, wrist to tip
pub const BONES_PER_FINGER: usize = 4;

/// Intra-finger curl angles in a feature vector
pub const NUM_CURL_ANGLES: usize = 16;

/// Inter-finger spread angles in a feature vector
pub const NUM_SPREAD_ANGLES: usize = 4;

/// Total length of a feature vector
pub const FEATURE_LEN: usize = NUM_CURL_ANGLES + NUM_SPREAD_ANGLES;

/// Classifier defaults (radian-space Euclidean distances)
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.85;
pub const DEFAULT_AMBIGUITY_MARGIN: f64 = 0.10;

/// Frames a candidate must repeat before it is confirmed
pub const DEFAULT_REQUIRED_STABILITY: u32 = 3;

/// Seconds between one-shot triggers
pub const DEFAULT_COOLDOWN_SECS: f64 = 0.5;

/// Seconds before the last-action status text is cleared
pub const DEFAULT_STATUS_CLEAR_SECS: f64 = 3.0;

/// Smart mouse defaults
pub const DEFAULT_CURL_THRESHOLD: f64 = 0.1;
pub const DEFAULT_SMOOTHING_FACTOR: f64 = 0.2;
pub const DEFAULT_RIGHT_CLICK_COOLDOWN_SECS: f64 = 1.0;

/// Default screen size used when the executor does not report one
pub const DEFAULT_SCREEN_WIDTH: u32 = 1920;
pub const DEFAULT_SCREEN_HEIGHT: u32 = 1080;

/// Dynamic scroll dead zone (normalized Y) and gain
pub const SCROLL_DEAD_ZONE_TOP: f64 = 0.4;
pub const SCROLL_DEAD_ZONE_BOTTOM: f64 = 0.6;
pub const SCROLL_GAIN: f64 = 400.0;

/// Fixed scroll step for scroll_up / scroll_down
pub const SCROLL_STEP: i32 = 40;

/// Maximum number of artifacts listed per gesture
pub const MAX_LISTED_ARTIFACTS: usize = 30;

