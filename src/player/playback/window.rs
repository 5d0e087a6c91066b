//! Start/end bounds of the playable range.
//!
//! Each bound remembers where its value came from. Bounds derived from
//! media metadata follow every new source; bounds set by the host stay put
//! across source loads until the host clears them.
//!
//! The window never inverts: a bound that would cross the other one is
//! rejected, and when new metadata ends before an overridden start, the
//! effective start is pulled back to the end.

use serde::Serialize;

use crate::error::{ControllerError, Result};

/// Where a bound's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Computed from media metadata
    Derived,
    /// Set explicitly by the host application
    Overridden,
}

/// One end of the time window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bound {
    pub value: f64,
    pub provenance: Provenance,
}

impl Bound {
    fn derived(value: f64) -> Self {
        Self {
            value,
            provenance: Provenance::Derived,
        }
    }

    pub fn is_overridden(&self) -> bool {
        self.provenance == Provenance::Overridden
    }
}

/// Reject negative and non-finite times.
pub fn validate_time(value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ControllerError::InvalidTime { value })
    }
}

/// The playable range `[start, end]`.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeWindow {
    start: Bound,
    end: Bound,
    /// Metadata-derived values, restored when an override is cleared
    derived_start: f64,
    derived_end: f64,
    /// Whether the derived end reflects real metadata yet
    metadata_loaded: bool,
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeWindow {
    pub fn new() -> Self {
        Self {
            start: Bound::derived(0.0),
            end: Bound::derived(0.0),
            derived_start: 0.0,
            derived_end: 0.0,
            metadata_loaded: false,
        }
    }

    /// Effective start bound, never past the end.
    pub fn start(&self) -> Bound {
        Bound {
            value: self.start_time(),
            provenance: self.start.provenance,
        }
    }

    pub fn end(&self) -> Bound {
        self.end
    }

    pub fn start_time(&self) -> f64 {
        self.start.value.min(self.end.value)
    }

    pub fn end_time(&self) -> f64 {
        self.end.value
    }

    /// Length of the window. Infinite for live streams.
    pub fn total_time(&self) -> f64 {
        self.end.value - self.start_time()
    }

    /// Whether the end bound is a real value rather than the empty
    /// placeholder used before any metadata arrives.
    fn end_is_known(&self) -> bool {
        self.metadata_loaded || self.end.is_overridden()
    }

    pub fn set_start(&mut self, value: f64) -> Result<()> {
        let value = validate_time(value)?;
        if self.end_is_known() && value > self.end.value {
            return Err(ControllerError::InvalidTime { value });
        }
        self.start = Bound {
            value,
            provenance: Provenance::Overridden,
        };
        Ok(())
    }

    pub fn set_end(&mut self, value: f64) -> Result<()> {
        let value = validate_time(value)?;
        if value < self.start.value {
            return Err(ControllerError::InvalidTime { value });
        }
        self.end = Bound {
            value,
            provenance: Provenance::Overridden,
        };
        Ok(())
    }

    /// Drop a host override and fall back to the metadata value.
    pub fn clear_start(&mut self) {
        self.start = Bound::derived(self.derived_start);
    }

    pub fn clear_end(&mut self) {
        self.end = Bound::derived(self.derived_end);
    }

    /// Adopt bounds from freshly loaded metadata.
    ///
    /// Overridden bounds keep their value; derived bounds follow the media.
    /// Returns true if either effective bound changed.
    pub fn on_metadata_loaded(&mut self, duration: f64, initial_time: f64) -> bool {
        let before = (self.start_time(), self.end_time());
        self.metadata_loaded = true;

        self.derived_start = if initial_time.is_finite() && initial_time >= 0.0 {
            initial_time
        } else {
            0.0
        };
        self.derived_end = if duration.is_nan() || duration < 0.0 {
            0.0
        } else {
            duration
        };

        if !self.start.is_overridden() {
            self.start = Bound::derived(self.derived_start);
        }
        if !self.end.is_overridden() {
            self.end = Bound::derived(self.derived_end);
        }

        before != (self.start_time(), self.end_time())
    }

    /// Upper limit for positions: the end time, further capped by the live
    /// edge for unbounded media.
    pub fn upper_limit(&self, live_edge: Option<f64>) -> f64 {
        match live_edge {
            Some(edge) => self.end.value.min(edge),
            None => self.end.value,
        }
    }

    /// Pull `position` into the window.
    pub fn clamp(&self, position: f64, live_edge: Option<f64>) -> f64 {
        let upper = self.upper_limit(live_edge);
        let start = self.start_time();
        if position < start {
            start
        } else if position > upper {
            upper
        } else {
            position
        }
    }
}
