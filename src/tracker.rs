//! Rep detection state machine.
//!
//! A [`RepCounter`] is one tracking session. Each call to
//! [`RepCounter::process_pose`] consumes a landmark frame, gates it on arm
//! visibility and body posture, smooths the elbow angle and advances a
//! four-state machine:
//!
//! ```text
//! Waiting --(angle > up)--> Ready --(angle < down)--> Down --(angle > up)--> Up
//!                                                      ^                     |
//!                                                      +----(angle < down)---+
//! ```
//!
//! Every `Down -> Up` transition completes exactly one rep. Frames without a
//! usable arm or with a non-horizontal body force the session back to
//! `Waiting`; a rep in progress at that point is dropped.

use crate::config::TrackerConfig;
use crate::constants::POSTURE_MIN_VISIBILITY;
use crate::filters::{exponential::ExponentialFilter, AngleFilter};
use crate::geometry::{arm_visible, elbow_angle, is_horizontal_posture};
use crate::landmarks::{Landmark, Side};
use crate::utils::round_angle;
use crate::Result;
use log::{debug, info, trace};
use serde::Serialize;
use std::fmt;

/// Phase of the push-up cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RepState {
    /// No usable pose yet, or the pose was lost
    Waiting,
    /// Arms extended in push-up position, first rep not started
    Ready,
    /// Arms bent, descent in progress
    Down,
    /// Arms extended after a completed rep
    Up,
}

impl RepState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RepState::Waiting => "waiting",
            RepState::Ready => "ready",
            RepState::Down => "down",
            RepState::Up => "up",
        }
    }
}

impl fmt::Display for RepState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Form quality of a completed rep, judged by the deepest elbow angle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RepQuality {
    Good,
    Partial,
    Shallow,
}

impl RepQuality {
    /// Classify a rep from the deepest angle reached during its descent
    #[must_use]
    pub fn classify(deepest_angle: f64, config: &TrackerConfig) -> Self {
        if deepest_angle < config.angle_threshold_down {
            RepQuality::Good
        } else if deepest_angle < config.partial_rep_threshold {
            RepQuality::Partial
        } else {
            RepQuality::Shallow
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RepQuality::Good => "good",
            RepQuality::Partial => "partial",
            RepQuality::Shallow => "shallow",
        }
    }

    /// Short user-facing feedback line
    #[must_use]
    pub const fn feedback(self) -> &'static str {
        match self {
            RepQuality::Good => "Good Rep!",
            RepQuality::Partial => "Partial Rep",
            RepQuality::Shallow => "Go Deeper",
        }
    }
}

impl fmt::Display for RepQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A completed rep
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RepEvent {
    /// Total reps in the session, including this one
    pub count: u32,
    /// Form quality
    pub quality: RepQuality,
    /// Deepest smoothed elbow angle of the rep (degrees)
    pub angle: f64,
}

/// Events emitted while processing a frame, in emission order
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum TrackerEvent {
    /// Smoothed elbow angle, rounded to whole degrees
    AngleUpdated(i32),
    /// The session moved to a new state
    StateChanged(RepState),
    /// A rep was completed
    RepCompleted(RepEvent),
}

impl TrackerEvent {
    /// Forward this event to the matching listener callback
    pub fn dispatch(&self, listener: &mut dyn TrackerListener) {
        match self {
            TrackerEvent::AngleUpdated(angle) => listener.on_angle_update(*angle),
            TrackerEvent::StateChanged(state) => listener.on_state_change(*state),
            TrackerEvent::RepCompleted(rep) => listener.on_rep_complete(rep),
        }
    }
}

/// Observer for tracker events; every callback defaults to a no-op
pub trait TrackerListener {
    fn on_rep_complete(&mut self, _rep: &RepEvent) {}

    fn on_angle_update(&mut self, _angle: i32) {}

    fn on_state_change(&mut self, _state: RepState) {}
}

/// Read-only snapshot of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrackerStats {
    pub rep_count: u32,
    pub current_state: RepState,
    /// Rounded smoothed angle, `None` before the first usable frame
    pub current_angle: Option<i32>,
}

/// Push-up tracking session
pub struct RepCounter {
    config: TrackerConfig,
    filter: Box<dyn AngleFilter>,
    state: RepState,
    rep_count: u32,
    last_elbow_angle: Option<f64>,
}

impl RepCounter {
    /// Create a session with exponential smoothing at the configured factor
    pub fn new(config: TrackerConfig) -> Result<Self> {
        config.validate()?;
        let filter = Box::new(ExponentialFilter::new(config.smoothing_factor));
        Ok(Self::build(config, filter))
    }

    /// Create a session with a caller-supplied smoothing filter
    ///
    /// The filter replaces the configured smoothing factor.
    pub fn with_filter(config: TrackerConfig, filter: Box<dyn AngleFilter>) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, filter))
    }

    fn build(config: TrackerConfig, filter: Box<dyn AngleFilter>) -> Self {
        info!(
            "Rep counter initialized (down < {}°, up > {}°, partial < {}°, filter {})",
            config.angle_threshold_down,
            config.angle_threshold_up,
            config.partial_rep_threshold,
            filter.name()
        );
        let mut counter = Self {
            config,
            filter,
            state: RepState::Waiting,
            rep_count: 0,
            last_elbow_angle: None,
        };
        counter.reset();
        counter
    }

    /// Process one landmark frame and return the events it produced
    pub fn process_pose(&mut self, landmarks: &[Landmark]) -> Vec<TrackerEvent> {
        let mut events = Vec::new();
        self.step(landmarks, &mut events);
        events
    }

    /// Process one landmark frame and deliver its events to `listener`
    pub fn process_pose_with(&mut self, landmarks: &[Landmark], listener: &mut dyn TrackerListener) {
        for event in self.process_pose(landmarks) {
            event.dispatch(listener);
        }
    }

    /// Abandon the session: back to `Waiting` with no reps and no angle
    ///
    /// Emits no events.
    pub fn reset(&mut self) {
        self.state = RepState::Waiting;
        self.rep_count = 0;
        self.last_elbow_angle = None;
        self.filter.reset();
    }

    #[must_use]
    pub fn stats(&self) -> TrackerStats {
        TrackerStats {
            rep_count: self.rep_count,
            current_state: self.state,
            current_angle: self.smoothed_angle().map(round_angle),
        }
    }

    #[must_use]
    pub fn state(&self) -> RepState {
        self.state
    }

    #[must_use]
    pub fn rep_count(&self) -> u32 {
        self.rep_count
    }

    /// Current smoothed elbow angle
    #[must_use]
    pub fn smoothed_angle(&self) -> Option<f64> {
        self.filter.value()
    }

    /// Deepest angle of the current or most recent descent
    #[must_use]
    pub fn last_elbow_angle(&self) -> Option<f64> {
        self.last_elbow_angle
    }

    #[must_use]
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    fn step(&mut self, landmarks: &[Landmark], events: &mut Vec<TrackerEvent>) {
        let min_visibility = self.config.min_visibility;

        if !Side::BOTH.iter().any(|&side| arm_visible(landmarks, side, min_visibility)) {
            trace!("No complete arm visible");
            self.transition(RepState::Waiting, events);
            return;
        }

        // The torso is always judged at the fixed posture threshold
        if !is_horizontal_posture(landmarks, POSTURE_MIN_VISIBILITY, self.config.horizontal_threshold) {
            trace!("Body not in push-up position");
            self.transition(RepState::Waiting, events);
            return;
        }

        let left = elbow_angle(landmarks, Side::Left, min_visibility);
        let right = elbow_angle(landmarks, Side::Right, min_visibility);
        let angle = match (left, right) {
            (Some(l), Some(r)) => (l + r) / 2.0,
            (Some(a), None) | (None, Some(a)) => a,
            // State is left untouched here, unlike the gates above
            (None, None) => {
                trace!("No elbow angle available, skipping frame");
                return;
            }
        };

        let smoothed = self.filter.apply(angle);
        events.push(TrackerEvent::AngleUpdated(round_angle(smoothed)));

        self.advance(smoothed, events);
    }

    fn advance(&mut self, angle: f64, events: &mut Vec<TrackerEvent>) {
        let TrackerConfig {
            angle_threshold_down: down,
            angle_threshold_up: up,
            ..
        } = self.config;

        match self.state {
            RepState::Waiting => {
                if angle > up {
                    self.transition(RepState::Ready, events);
                }
            }
            RepState::Ready | RepState::Up => {
                if angle < down {
                    self.transition(RepState::Down, events);
                    self.last_elbow_angle = Some(angle);
                }
            }
            RepState::Down => {
                let deepest = self.last_elbow_angle.unwrap_or(angle);
                if angle > up {
                    self.complete_rep(deepest, events);
                    self.transition(RepState::Up, events);
                } else if angle < deepest {
                    self.last_elbow_angle = Some(angle);
                }
            }
        }
    }

    fn complete_rep(&mut self, deepest: f64, events: &mut Vec<TrackerEvent>) {
        self.rep_count += 1;
        let rep = RepEvent {
            count: self.rep_count,
            quality: RepQuality::classify(deepest, &self.config),
            angle: deepest,
        };
        debug!("Rep {} completed: {} (deepest {:.1}°)", rep.count, rep.quality, rep.angle);
        events.push(TrackerEvent::RepCompleted(rep));
    }

    fn transition(&mut self, next: RepState, events: &mut Vec<TrackerEvent>) {
        if self.state != next {
            debug!("State {} -> {}", self.state, next);
            self.state = next;
            events.push(TrackerEvent::StateChanged(next));
        }
    }
}

impl Default for RepCounter {
    fn default() -> Self {
        let config = TrackerConfig::default();
        let filter = Box::new(ExponentialFilter::new(config.smoothing_factor));
        Self::build(config, filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::NUM_POSE_LANDMARKS;
    use crate::filters::NoFilter;
    use crate::landmarks::PoseLandmark;

    /// Prone body with the left arm bent to `angle` degrees; right arm hidden
    fn frame(angle: f64) -> Vec<Landmark> {
        let mut frame = vec![Landmark::new(0.5, 0.5, 0.1); NUM_POSE_LANDMARKS];
        let elbow = (0.3, 0.6);
        let bearing = (angle - 90.0).to_radians();

        frame[PoseLandmark::LeftShoulder.index()] = Landmark::new(0.3, 0.4, 0.9);
        frame[PoseLandmark::RightShoulder.index()] = Landmark::new(0.32, 0.4, 0.9);
        frame[PoseLandmark::LeftElbow.index()] = Landmark::new(elbow.0, elbow.1, 0.9);
        frame[PoseLandmark::LeftWrist.index()] =
            Landmark::new(elbow.0 + 0.2 * bearing.cos(), elbow.1 + 0.2 * bearing.sin(), 0.9);
        frame[PoseLandmark::LeftHip.index()] = Landmark::new(0.7, 0.45, 0.9);
        frame[PoseLandmark::RightHip.index()] = Landmark::new(0.72, 0.45, 0.9);
        frame
    }

    fn unsmoothed() -> RepCounter {
        RepCounter::with_filter(TrackerConfig::default(), Box::new(NoFilter::default())).unwrap()
    }

    fn reps(events: &[TrackerEvent]) -> Vec<RepEvent> {
        events
            .iter()
            .filter_map(|e| match e {
                TrackerEvent::RepCompleted(rep) => Some(*rep),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_frame_helper_angle() {
        for angle in [30.0, 90.0, 135.0, 170.0] {
            let f = frame(angle);
            let measured = elbow_angle(&f, Side::Left, 0.5).unwrap();
            assert!((measured - angle).abs() < 1e-9, "{measured} != {angle}");
            assert!(elbow_angle(&f, Side::Right, 0.5).is_none());
        }
    }

    #[test]
    fn test_initial_state() {
        let counter = RepCounter::default();
        assert_eq!(
            counter.stats(),
            TrackerStats {
                rep_count: 0,
                current_state: RepState::Waiting,
                current_angle: None,
            }
        );
        assert_eq!(counter.last_elbow_angle(), None);
    }

    #[test]
    fn test_end_to_end_scenario() {
        let mut counter = unsmoothed();
        let mut all = Vec::new();

        let e = counter.process_pose(&frame(170.0));
        assert_eq!(e, vec![TrackerEvent::AngleUpdated(170), TrackerEvent::StateChanged(RepState::Ready)]);
        all.extend(e);

        let e = counter.process_pose(&frame(150.0));
        assert_eq!(e, vec![TrackerEvent::AngleUpdated(150)]);

        let e = counter.process_pose(&frame(80.0));
        assert_eq!(e, vec![TrackerEvent::AngleUpdated(80), TrackerEvent::StateChanged(RepState::Down)]);

        let e = counter.process_pose(&frame(70.0));
        assert_eq!(e, vec![TrackerEvent::AngleUpdated(70)]);
        assert!((counter.last_elbow_angle().unwrap() - 70.0).abs() < 1e-9);

        let e = counter.process_pose(&frame(165.0));
        assert_eq!(e.len(), 3);
        assert_eq!(e[0], TrackerEvent::AngleUpdated(165));
        assert_eq!(e[2], TrackerEvent::StateChanged(RepState::Up));
        let rep = reps(&e);
        assert_eq!(rep.len(), 1);
        assert_eq!(rep[0].count, 1);
        assert_eq!(rep[0].quality, RepQuality::Good);
        assert!((rep[0].angle - 70.0).abs() < 1e-9);

        assert_eq!(counter.rep_count(), 1);
        assert_eq!(counter.state(), RepState::Up);
    }

    #[test]
    fn test_first_sample_not_smoothed() {
        let mut counter = RepCounter::default();
        counter.process_pose(&frame(120.0));
        assert!((counter.smoothed_angle().unwrap() - 120.0).abs() < 1e-9);

        counter.process_pose(&frame(100.0));
        assert!((counter.smoothed_angle().unwrap() - 114.0).abs() < 1e-9);
    }

    #[test]
    fn test_smoothing_delays_transitions() {
        let mut counter = RepCounter::default();
        counter.process_pose(&frame(170.0));
        assert_eq!(counter.state(), RepState::Ready);

        // 170 -> 80 smooths to 143, still above the down threshold
        counter.process_pose(&frame(80.0));
        assert_eq!(counter.state(), RepState::Ready);

        for _ in 0..10 {
            counter.process_pose(&frame(80.0));
        }
        assert_eq!(counter.state(), RepState::Down);
    }

    #[test]
    fn test_lost_arm_forces_waiting() {
        let mut counter = unsmoothed();
        counter.process_pose(&frame(170.0));
        counter.process_pose(&frame(80.0));
        assert_eq!(counter.state(), RepState::Down);

        let mut hidden = frame(60.0);
        hidden[PoseLandmark::LeftWrist.index()].visibility = 0.3;
        let e = counter.process_pose(&hidden);
        assert_eq!(e, vec![TrackerEvent::StateChanged(RepState::Waiting)]);
        assert!((counter.last_elbow_angle().unwrap() - 80.0).abs() < 1e-9);

        // Already waiting: no repeated notification
        assert!(counter.process_pose(&hidden).is_empty());
    }

    #[test]
    fn test_upright_body_forces_waiting() {
        let mut counter = unsmoothed();
        counter.process_pose(&frame(170.0));

        let mut standing = frame(170.0);
        standing[PoseLandmark::LeftHip.index()].y = 0.95;
        standing[PoseLandmark::RightHip.index()].y = 0.95;
        let e = counter.process_pose(&standing);
        assert_eq!(e, vec![TrackerEvent::StateChanged(RepState::Waiting)]);
    }

    #[test]
    fn test_interrupted_descent_is_not_counted() {
        let mut counter = unsmoothed();
        counter.process_pose(&frame(170.0));
        counter.process_pose(&frame(80.0));
        counter.process_pose(&[]);
        assert_eq!(counter.state(), RepState::Waiting);

        // Coming back extended only re-arms the machine
        let e = counter.process_pose(&frame(170.0));
        assert!(reps(&e).is_empty());
        assert_eq!(counter.state(), RepState::Ready);
        assert_eq!(counter.rep_count(), 0);
    }

    #[test]
    fn test_both_arms_are_averaged() {
        let mut f = frame(100.0);
        // Mirror a 140 degree right arm
        let bearing = (140.0_f64 - 90.0).to_radians();
        f[PoseLandmark::RightShoulder.index()] = Landmark::new(0.5, 0.4, 0.9);
        f[PoseLandmark::RightElbow.index()] = Landmark::new(0.5, 0.6, 0.9);
        f[PoseLandmark::RightWrist.index()] = Landmark::new(0.5 + 0.2 * bearing.cos(), 0.6 + 0.2 * bearing.sin(), 0.9);

        let mut counter = unsmoothed();
        let e = counter.process_pose(&f);
        assert_eq!(e, vec![TrackerEvent::AngleUpdated(120)]);
    }

    #[test]
    fn test_quality_boundaries() {
        let config = TrackerConfig::default();
        assert_eq!(RepQuality::classify(85.0, &config), RepQuality::Good);
        assert_eq!(RepQuality::classify(89.9, &config), RepQuality::Good);
        assert_eq!(RepQuality::classify(90.0, &config), RepQuality::Partial);
        assert_eq!(RepQuality::classify(105.0, &config), RepQuality::Partial);
        assert_eq!(RepQuality::classify(109.9, &config), RepQuality::Partial);
        assert_eq!(RepQuality::classify(110.0, &config), RepQuality::Shallow);
        assert_eq!(RepQuality::classify(115.0, &config), RepQuality::Shallow);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut counter = unsmoothed();
        for angle in [170.0, 80.0, 170.0, 75.0] {
            counter.process_pose(&frame(angle));
        }
        assert_eq!(counter.rep_count(), 1);

        counter.reset();
        assert_eq!(
            counter.stats(),
            TrackerStats {
                rep_count: 0,
                current_state: RepState::Waiting,
                current_angle: None,
            }
        );
        assert_eq!(counter.last_elbow_angle(), None);
    }

    #[derive(Default)]
    struct Recorder {
        angles: Vec<i32>,
        states: Vec<RepState>,
        reps: Vec<RepEvent>,
    }

    impl TrackerListener for Recorder {
        fn on_rep_complete(&mut self, rep: &RepEvent) {
            self.reps.push(*rep);
        }

        fn on_angle_update(&mut self, angle: i32) {
            self.angles.push(angle);
        }

        fn on_state_change(&mut self, state: RepState) {
            self.states.push(state);
        }
    }

    #[test]
    fn test_listener_dispatch() {
        let mut counter = unsmoothed();
        let mut recorder = Recorder::default();
        for angle in [170.0, 150.0, 80.0, 70.0, 165.0] {
            counter.process_pose_with(&frame(angle), &mut recorder);
        }

        assert_eq!(recorder.angles, vec![170, 150, 80, 70, 165]);
        assert_eq!(recorder.states, vec![RepState::Ready, RepState::Down, RepState::Up]);
        assert_eq!(recorder.reps.len(), 1);
        assert_eq!(recorder.reps[0].quality, RepQuality::Good);
    }

    #[test]
    fn test_event_serialization() {
        let json = serde_json::to_string(&TrackerEvent::StateChanged(RepState::Down)).unwrap();
        assert_eq!(json, r#"{"type":"state_changed","payload":"down"}"#);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = TrackerConfig {
            smoothing_factor: 0.0,
            ..TrackerConfig::default()
        };
        assert!(RepCounter::new(config).is_err());
    }
}
