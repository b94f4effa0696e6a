//! Smoothing filters for the per-frame elbow angle.
//!
//! Raw angles jitter by several degrees between frames; the tracker runs
//! them through one of these filters before driving the rep state machine.

/// Exponential filter for responsive smoothing
pub mod exponential;

use crate::constants::DEFAULT_SMOOTHING_FACTOR;
use crate::{Error, Result};

/// Trait for all angle filters
pub trait AngleFilter: Send + Sync {
    /// Apply filter to a new angle sample and return the filtered angle
    fn apply(&mut self, angle: f64) -> f64;

    /// Last filtered angle, `None` before the first sample
    fn value(&self) -> Option<f64>;

    /// Reset filter state
    fn reset(&mut self);

    /// Get filter name
    fn name(&self) -> &str;
}

/// No-op filter that passes through values unchanged
#[derive(Default)]
pub struct NoFilter {
    last: Option<f64>,
}

impl AngleFilter for NoFilter {
    fn apply(&mut self, angle: f64) -> f64 {
        self.last = Some(angle);
        angle
    }

    fn value(&self) -> Option<f64> {
        self.last
    }

    fn reset(&mut self) {
        self.last = None;
    }

    fn name(&self) -> &str {
        "NoFilter"
    }
}

/// Filter selected by name, with its parsed parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterKind {
    /// Pass-through (`none`)
    Passthrough,
    /// Exponential smoothing with an optional explicit alpha
    Exponential(Option<f64>),
}

impl FilterKind {
    /// Parse a name such as `none`, `exponential` or `exponential:0.3`
    pub fn parse(filter_spec: &str) -> Result<Self> {
        let mut parts = filter_spec.split(':');
        let name = parts.next().unwrap_or_default().trim().to_lowercase();
        let params: Vec<&str> = parts.collect();

        match name.as_str() {
            "none" | "nofilter" => {
                expect_params(filter_spec, &params, 0)?;
                Ok(Self::Passthrough)
            }
            "exponential" => {
                expect_params(filter_spec, &params, 1)?;
                let alpha = match params.first() {
                    Some(raw) => {
                        let alpha = parse_param(filter_spec, raw)?;
                        if !(alpha > 0.0 && alpha <= 1.0) {
                            return Err(Error::FilterError(format!("Alpha must be in (0, 1], got {alpha}")));
                        }
                        Some(alpha)
                    }
                    None => None,
                };
                Ok(Self::Exponential(alpha))
            }
            _ => Err(Error::FilterError(format!("Unknown filter type: {filter_spec}"))),
        }
    }

    /// Build the filter; `default_alpha` applies when no alpha was given
    ///
    /// `default_alpha` must be in (0, 1].
    pub fn build(self, default_alpha: f64) -> Box<dyn AngleFilter> {
        match self {
            Self::Passthrough => Box::new(NoFilter::default()),
            Self::Exponential(alpha) => Box::new(exponential::ExponentialFilter::new(alpha.unwrap_or(default_alpha))),
        }
    }
}

/// Create an angle filter from a name such as `exponential` or `exponential:0.3`
pub fn create_filter(filter_spec: &str) -> Result<Box<dyn AngleFilter>> {
    Ok(FilterKind::parse(filter_spec)?.build(DEFAULT_SMOOTHING_FACTOR))
}

fn expect_params(filter_spec: &str, params: &[&str], max: usize) -> Result<()> {
    if params.len() > max {
        return Err(Error::FilterError(format!("Too many parameters in filter spec: {filter_spec}")));
    }
    Ok(())
}

fn parse_param(filter_spec: &str, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| Error::FilterError(format!("Invalid parameter '{raw}' in {filter_spec}: {e}")))
}
