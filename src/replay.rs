//! Replay of recorded landmark streams.
//!
//! Recordings are JSON Lines: one frame per line, either a bare array of
//! landmarks or an object with a `landmarks` field. An object whose
//! `landmarks` is missing or null marks a frame where the pose model found
//! nobody; such frames are delivered as `None` and skipped by [`replay`]
//! without touching the tracker. Blank lines and lines starting with `#`
//! are ignored.

use crate::landmarks::Landmark;
use crate::tracker::{RepCounter, RepEvent, RepQuality, TrackerEvent, TrackerListener, TrackerStats};
use crate::{Error, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

#[derive(Deserialize)]
#[serde(untagged)]
enum FrameRecord {
    Bare(Vec<Landmark>),
    Wrapped {
        #[serde(default)]
        landmarks: Option<Vec<Landmark>>,
    },
}

/// Iterator over the frames of a JSON Lines recording
pub struct FrameReader<R> {
    lines: Lines<R>,
    line_no: usize,
}

impl<R: BufRead> FrameReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl FrameReader<BufReader<File>> {
    /// Open a recording on disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening landmark recording: {}", path.display());
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: BufRead> Iterator for FrameReader<R> {
    type Item = Result<Option<Vec<Landmark>>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(Error::Io(e))),
            };
            self.line_no += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let record = serde_json::from_str::<FrameRecord>(trimmed).map_err(|source| Error::Json {
                line: self.line_no,
                source,
            });
            return Some(record.map(|record| match record {
                FrameRecord::Bare(landmarks) => Some(landmarks),
                FrameRecord::Wrapped { landmarks } => landmarks,
            }));
        }
    }
}

/// Outcome of replaying a recording through a tracker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplaySummary {
    /// Frames handed to the tracker
    pub frames_processed: usize,
    /// Frames where the pose model reported no person
    pub frames_without_pose: usize,
    /// Every completed rep, in order
    pub reps: Vec<RepEvent>,
    /// Tracker snapshot after the last frame
    pub final_stats: TrackerStats,
}

impl ReplaySummary {
    /// Number of reps with the given quality
    #[must_use]
    pub fn count_quality(&self, quality: RepQuality) -> usize {
        self.reps.iter().filter(|rep| rep.quality == quality).count()
    }
}

/// Feed every frame into `counter`, forwarding events to `listener`
///
/// Stops at the first unreadable frame.
pub fn replay<I>(counter: &mut RepCounter, frames: I, listener: &mut dyn TrackerListener) -> Result<ReplaySummary>
where
    I: IntoIterator<Item = Result<Option<Vec<Landmark>>>>,
{
    let mut frames_processed = 0;
    let mut frames_without_pose = 0;
    let mut reps = Vec::new();

    for frame in frames {
        let Some(landmarks) = frame? else {
            frames_without_pose += 1;
            continue;
        };

        frames_processed += 1;
        for event in counter.process_pose(&landmarks) {
            if let TrackerEvent::RepCompleted(rep) = event {
                reps.push(rep);
            }
            event.dispatch(listener);
        }
    }

    debug!(
        "Replay finished: {} frames processed, {} without pose, {} reps",
        frames_processed,
        frames_without_pose,
        reps.len()
    );

    Ok(ReplaySummary {
        frames_processed,
        frames_without_pose,
        reps,
        final_stats: counter.stats(),
    })
}
