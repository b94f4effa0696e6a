//! Small numeric helpers shared by the tracker and the replay driver.

pub mod safe_cast;

use crate::constants::MAX_JOINT_ANGLE;
use safe_cast::f64_to_i32_clamp;

/// Round a joint angle to whole degrees for display
///
/// Halves round away from zero; non-finite angles report as 0.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // MAX_JOINT_ANGLE is a small integer
pub fn round_angle(angle: f64) -> i32 {
    f64_to_i32_clamp(angle.round(), 0, MAX_JOINT_ANGLE as i32)
}
