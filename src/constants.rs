//! Constants used throughout the tracker

/// Number of landmarks in a full pose frame
pub const NUM_POSE_LANDMARKS: usize = 33;

/// Elbow angle below which the arms count as bent (degrees)
pub const DEFAULT_ANGLE_THRESHOLD_DOWN: f64 = 90.0;

/// Elbow angle above which the arms count as extended (degrees)
pub const DEFAULT_ANGLE_THRESHOLD_UP: f64 = 160.0;

/// Deepest angle below which a non-good rep is still partial (degrees)
pub const DEFAULT_PARTIAL_REP_THRESHOLD: f64 = 110.0;

/// Exponential smoothing factor applied to the elbow angle
pub const DEFAULT_SMOOTHING_FACTOR: f64 = 0.3;

/// Minimum landmark visibility to treat a joint as usable
pub const DEFAULT_MIN_VISIBILITY: f64 = 0.5;

/// Shoulder and hip visibility required by the posture gate, independent of
/// the configured arm threshold
pub const POSTURE_MIN_VISIBILITY: f64 = DEFAULT_MIN_VISIBILITY;

/// Maximum shoulder/hip vertical offset for a horizontal body
pub const DEFAULT_HORIZONTAL_THRESHOLD: f64 = 0.3;

/// Joint angles are reported in [0, 180]
pub const MAX_JOINT_ANGLE: f64 = 180.0;
pub const FULL_TURN_DEGREES: f64 = 360.0;
