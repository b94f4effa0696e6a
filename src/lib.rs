//! Push-up repetition tracking from body-landmark streams.
//!
//! This library turns per-frame pose landmarks from an external
//! pose-estimation model into push-up rep counts with form feedback:
//! - Geometry helpers compute elbow angles and gate frames on landmark
//!   visibility and a horizontal body posture
//! - An exponential filter smooths the noisy per-frame angle
//! - A four-state machine emits exactly one event per down-up cycle,
//!   classified by how deep the rep went
//!
//! # Examples
//!
//! ## Counting reps
//!
//! ```no_run
//! use pushup_tracker::{Landmark, RepCounter, TrackerConfig, TrackerEvent};
//!
//! # fn main() -> pushup_tracker::Result<()> {
//! let mut counter = RepCounter::new(TrackerConfig::default())?;
//!
//! // One frame of 33 landmarks from the pose model
//! let frame: Vec<Landmark> = vec![Landmark::default(); 33];
//!
//! for event in counter.process_pose(&frame) {
//!     match event {
//!         TrackerEvent::AngleUpdated(angle) => println!("Elbow: {angle}°"),
//!         TrackerEvent::StateChanged(state) => println!("State: {state}"),
//!         TrackerEvent::RepCompleted(rep) => {
//!             println!("Rep {}: {}", rep.count, rep.quality.feedback());
//!         }
//!     }
//! }
//!
//! let stats = counter.stats();
//! println!("{} reps so far", stats.rep_count);
//! # Ok(())
//! # }
//! ```
//!
//! ## Replaying a recording
//!
//! ```no_run
//! use pushup_tracker::replay::{replay, FrameReader};
//! use pushup_tracker::{RepCounter, TrackerListener};
//!
//! struct Quiet;
//! impl TrackerListener for Quiet {}
//!
//! # fn main() -> pushup_tracker::Result<()> {
//! let mut counter = RepCounter::default();
//! let frames = FrameReader::open("session.jsonl")?;
//! let summary = replay(&mut counter, frames, &mut Quiet)?;
//! println!("{} reps", summary.reps.len());
//! # Ok(())
//! # }
//! ```

/// Landmark records and the pose index schema
pub mod landmarks;

/// Joint angles, visibility gating and posture checks
pub mod geometry;

/// Angle smoothing filters
pub mod filters;

/// Rep detection state machine
pub mod tracker;

/// Replay of recorded landmark streams
pub mod replay;

/// Numeric helpers
pub mod utils;

/// Error types and result handling
pub mod error;

/// Constants used throughout the crate
pub mod constants;

/// Configuration management
pub mod config;

pub use config::{Config, TrackerConfig};
pub use error::{Error, Result};
pub use landmarks::{Landmark, PoseLandmark, Side};
pub use tracker::{RepCounter, RepEvent, RepQuality, RepState, TrackerEvent, TrackerListener, TrackerStats};
