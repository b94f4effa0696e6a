//! Landmark geometry: joint angles, visibility gating and posture checks.
//!
//! Everything here is a pure function over a single frame. Coordinates are
//! the normalized image-plane positions reported by the pose model.

use crate::constants::{FULL_TURN_DEGREES, MAX_JOINT_ANGLE, NUM_POSE_LANDMARKS};
use crate::landmarks::{Landmark, PoseLandmark, Side};

/// Angle at `vertex` between the rays to `a` and `c`, in degrees [0, 180]
///
/// Computed from the difference of the two `atan2` bearings. NaN inputs
/// propagate to a NaN result.
#[must_use]
pub fn angle_at(a: &Landmark, vertex: &Landmark, c: &Landmark) -> f64 {
    let radians = (c.y - vertex.y).atan2(c.x - vertex.x) - (a.y - vertex.y).atan2(a.x - vertex.x);
    let angle = radians.to_degrees().abs();

    if angle > MAX_JOINT_ANGLE {
        FULL_TURN_DEGREES - angle
    } else {
        angle
    }
}

/// Whether a landmark is present and strictly above the visibility threshold
#[must_use]
pub fn is_visible(landmark: Option<&Landmark>, threshold: f64) -> bool {
    landmark.is_some_and(|lm| lm.visibility > threshold)
}

/// Whether shoulder, elbow and wrist of one arm are all visible
#[must_use]
pub fn arm_visible(landmarks: &[Landmark], side: Side, min_visibility: f64) -> bool {
    side.arm()
        .iter()
        .all(|joint| is_visible(joint.get(landmarks), min_visibility))
}

/// Elbow angle for one side, `None` unless the whole arm is visible
#[must_use]
pub fn elbow_angle(landmarks: &[Landmark], side: Side, min_visibility: f64) -> Option<f64> {
    let [shoulder, elbow, wrist] = side.arm();
    let shoulder = shoulder.get(landmarks).filter(|lm| lm.visibility > min_visibility)?;
    let elbow = elbow.get(landmarks).filter(|lm| lm.visibility > min_visibility)?;
    let wrist = wrist.get(landmarks).filter(|lm| lm.visibility > min_visibility)?;

    Some(angle_at(shoulder, elbow, wrist))
}

/// Coarse check that the body is roughly horizontal, as in a push-up
///
/// Compares the mean shoulder height with the mean hip height. Requires a
/// full frame and all four torso points visible.
#[must_use]
pub fn is_horizontal_posture(landmarks: &[Landmark], min_visibility: f64, horizontal_threshold: f64) -> bool {
    if landmarks.len() < NUM_POSE_LANDMARKS {
        return false;
    }

    let torso = [
        PoseLandmark::LeftShoulder,
        PoseLandmark::RightShoulder,
        PoseLandmark::LeftHip,
        PoseLandmark::RightHip,
    ];
    let mut points = [Landmark::default(); 4];
    for (slot, joint) in points.iter_mut().zip(torso) {
        match joint.get(landmarks) {
            Some(lm) if lm.visibility > min_visibility => *slot = *lm,
            _ => return false,
        }
    }

    let [left_shoulder, right_shoulder, left_hip, right_hip] = points;
    let shoulder_y = (left_shoulder.y + right_shoulder.y) / 2.0;
    let hip_y = (left_hip.y + right_hip.y) / 2.0;

    (shoulder_y - hip_y).abs() < horizontal_threshold
}

/// Single-pole exponential smoothing step
///
/// No clamping is applied to `factor`; callers pass a value in (0, 1].
#[must_use]
pub fn smooth(current: f64, target: f64, factor: f64) -> f64 {
    current + (target - current) * factor
}

/// Euclidean distance between two landmarks in the image plane
#[must_use]
pub fn distance(a: &Landmark, b: &Landmark) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Mean position of a set of landmarks
///
/// The returned visibility is the lowest visibility in the set.
#[must_use]
#[allow(clippy::cast_precision_loss)] // Landmark sets are tiny
pub fn average_landmark(landmarks: &[Landmark]) -> Option<Landmark> {
    if landmarks.is_empty() {
        return None;
    }

    let n = landmarks.len() as f64;
    let (sx, sy, sz) = landmarks
        .iter()
        .fold((0.0, 0.0, 0.0), |(x, y, z), lm| (x + lm.x, y + lm.y, z + lm.z));
    let visibility = landmarks.iter().map(|lm| lm.visibility).fold(f64::INFINITY, f64::min);

    Some(Landmark::with_depth(sx / n, sy / n, sz / n, visibility))
}
