//! Body landmark records and the fixed pose index schema.
//!
//! Frames arrive from an external pose model as 33 landmarks in a fixed
//! order. Only the upper-body and hip points are read by the tracker; the
//! remaining indices are carried through untouched.

use serde::{Deserialize, Serialize};

/// A single tracked body point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Normalized X coordinate (0.0-1.0)
    pub x: f64,
    /// Normalized Y coordinate (0.0-1.0), growing downward
    pub y: f64,
    /// Relative depth, zero when the model does not provide it
    #[serde(default)]
    pub z: f64,
    /// Estimation confidence (0.0-1.0)
    #[serde(default)]
    pub visibility: f64,
}

impl Landmark {
    #[must_use]
    pub const fn new(x: f64, y: f64, visibility: f64) -> Self {
        Self { x, y, z: 0.0, visibility }
    }

    #[must_use]
    pub const fn with_depth(x: f64, y: f64, z: f64, visibility: f64) -> Self {
        Self { x, y, z, visibility }
    }
}

impl Default for Landmark {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

/// Landmark indices used by the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum PoseLandmark {
    Nose = 0,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
}

impl PoseLandmark {
    /// Position of this landmark in a frame
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Look up this landmark in a frame, `None` if the frame is too short
    #[must_use]
    pub fn get(self, landmarks: &[Landmark]) -> Option<&Landmark> {
        landmarks.get(self.index())
    }
}

/// Body side of an arm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    /// Shoulder, elbow and wrist indices for this side
    #[must_use]
    pub const fn arm(self) -> [PoseLandmark; 3] {
        match self {
            Side::Left => [PoseLandmark::LeftShoulder, PoseLandmark::LeftElbow, PoseLandmark::LeftWrist],
            Side::Right => [PoseLandmark::RightShoulder, PoseLandmark::RightElbow, PoseLandmark::RightWrist],
        }
    }
}
