//! Marker collection and proximity tracking.
//!
//! Markers are points on the timeline the host cares about: chapters,
//! advertisement breaks, or anything custom. The collection is kept sorted
//! by time, and a cursor remembers the markers either side of the current
//! position so each position tick only has to look at one marker.
//!
//! When the host supplies no chapters, a set of evenly spaced default
//! chapter markers is generated for navigation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ControllerError, Result};
use crate::player::playback::window::TimeWindow;

/// Number of generated default chapter markers (start, nine interior, end).
pub const DEFAULT_MARKER_COUNT: usize = 11;

/// Skipping back within this many seconds of a chapter start goes to the
/// chapter before it.
pub const CHAPTER_BACK_GRACE: f64 = 2.0;

/// What a marker represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Chapter,
    Advertisement,
    Custom,
}

impl MarkerKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Chapter => "chapter",
            Self::Advertisement => "advertisement",
            Self::Custom => "custom",
        }
    }

    /// Chapters and advertisements replace the generated defaults.
    pub fn is_explicit_chapter(&self) -> bool {
        matches!(self, Self::Chapter | Self::Advertisement)
    }
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MarkerKind {
    type Err = ControllerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chapter" => Ok(Self::Chapter),
            "advertisement" => Ok(Self::Advertisement),
            "custom" => Ok(Self::Custom),
            _ => Err(ControllerError::InvalidMarkerKind {
                kind: s.to_string(),
            }),
        }
    }
}

/// A point of interest on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Position in seconds
    pub time: f64,
    pub kind: MarkerKind,
    /// Host data handed back when the marker is reached
    #[serde(default)]
    pub payload: serde_json::Value,
    /// Optional styling hint for the view layer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

impl Marker {
    pub fn new(time: f64, kind: MarkerKind) -> Self {
        Self {
            time,
            kind,
            payload: serde_json::Value::Null,
            style: None,
        }
    }
}

/// Indices of the markers surrounding the current position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkerCursor {
    /// First marker at or after the position
    pub next: Option<usize>,
    /// Last marker at or before the position
    pub prev: Option<usize>,
}

/// Evenly spaced chapter markers for a window, or none when the window is
/// too short (or unbounded).
pub fn generate_default_markers(window: &TimeWindow, min_duration: f64) -> Vec<Marker> {
    let total = window.total_time();
    if !total.is_finite() || total <= min_duration {
        return Vec::new();
    }

    let start = window.start_time();
    let step = total / (DEFAULT_MARKER_COUNT - 1) as f64;
    (0..DEFAULT_MARKER_COUNT)
        .map(|i| {
            let time = if i == DEFAULT_MARKER_COUNT - 1 {
                window.end_time()
            } else {
                start + step * i as f64
            };
            Marker::new(time, MarkerKind::Chapter)
        })
        .collect()
}

/// Sorted marker collection with a position cursor.
#[derive(Debug, Clone)]
pub struct MarkerEngine {
    markers: Vec<Marker>,
    defaults: Vec<Marker>,
    cursor: MarkerCursor,
    subscribed: bool,
    needs_reset: bool,
    proximity_threshold: f64,
    default_min_duration: f64,
}

impl MarkerEngine {
    pub fn new(proximity_threshold: f64, default_min_duration: f64) -> Self {
        Self {
            markers: Vec::new(),
            defaults: Vec::new(),
            cursor: MarkerCursor::default(),
            subscribed: false,
            needs_reset: false,
            proximity_threshold,
            default_min_duration,
        }
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn default_markers(&self) -> &[Marker] {
        &self.defaults
    }

    pub fn cursor(&self) -> MarkerCursor {
        self.cursor
    }

    pub fn next_marker(&self) -> Option<&Marker> {
        self.cursor.next.and_then(|i| self.markers.get(i))
    }

    pub fn prev_marker(&self) -> Option<&Marker> {
        self.cursor.prev.and_then(|i| self.markers.get(i))
    }

    /// Whether position updates need to be routed here.
    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    pub fn has_explicit_chapters(&self) -> bool {
        self.markers.iter().any(|m| m.kind.is_explicit_chapter())
    }

    /// Insert a marker, replacing any marker already at the same time.
    pub fn add(&mut self, marker: Marker, position: f64) -> Result<()> {
        if !marker.time.is_finite() {
            return Err(ControllerError::InvalidTime { value: marker.time });
        }

        if marker.kind.is_explicit_chapter() && !self.defaults.is_empty() {
            debug!("explicit {} marker replaces default chapters", marker.kind);
            self.defaults.clear();
        }

        match self.markers.iter().position(|m| m.time == marker.time) {
            Some(existing) => self.markers[existing] = marker,
            None => {
                let at = self.markers.partition_point(|m| m.time < marker.time);
                self.markers.insert(at, marker);
            }
        }

        if !self.subscribed {
            debug!("first marker added, subscribing to position updates");
            self.subscribed = true;
        }
        self.needs_reset = false;
        self.recompute_cursor(position);
        Ok(())
    }

    /// Remove every marker at `time`. Returns how many were removed.
    pub fn remove(&mut self, time: f64) -> usize {
        let lo = self.markers.partition_point(|m| m.time < time);
        let hi = lo + self.markers[lo..].iter().take_while(|m| m.time == time).count();
        let removed = hi - lo;
        if removed == 0 {
            return 0;
        }

        self.markers.drain(lo..hi);

        if self.markers.is_empty() {
            debug!("last marker removed, unsubscribing from position updates");
            self.subscribed = false;
            self.cursor = MarkerCursor::default();
            return removed;
        }

        let len = self.markers.len();
        self.cursor.next = self.cursor.next.and_then(|n| {
            if n < lo {
                Some(n)
            } else if n < hi {
                // The marker after the removed one slid into `lo`.
                (lo < len).then_some(lo)
            } else {
                Some(n - removed)
            }
        });
        self.cursor.prev = self.cursor.prev.and_then(|p| {
            if p < lo {
                Some(p)
            } else if p < hi {
                lo.checked_sub(1)
            } else {
                Some(p - removed)
            }
        });
        removed
    }

    /// Drop every explicit marker.
    pub fn clear(&mut self) {
        self.markers.clear();
        self.cursor = MarkerCursor::default();
        self.subscribed = false;
    }

    /// A new media source is loading: clear the markers once its metadata
    /// arrives, unless the host adds markers for it before then.
    pub fn mark_needs_reset(&mut self) {
        self.needs_reset = true;
    }

    /// Metadata for the current source arrived.
    pub fn on_metadata_loaded(&mut self) {
        if self.needs_reset {
            debug!(count = self.markers.len(), "clearing markers from previous source");
            self.clear();
        }
        self.needs_reset = false;
    }

    /// Rebuild the default chapter set for `window`.
    pub fn regenerate_defaults(&mut self, window: &TimeWindow) {
        self.defaults = if self.has_explicit_chapters() {
            Vec::new()
        } else {
            generate_default_markers(window, self.default_min_duration)
        };
    }

    /// Point the cursor at the markers around `position`.
    pub fn recompute_cursor(&mut self, position: f64) {
        let mut cursor = MarkerCursor::default();
        for (i, marker) in self.markers.iter().enumerate() {
            if marker.time <= position {
                cursor.prev = Some(i);
            }
            if cursor.next.is_none() && marker.time >= position {
                cursor.next = Some(i);
            }
            if marker.time > position {
                break;
            }
        }
        self.cursor = cursor;
    }

    /// Check the cursor against a new playback position.
    ///
    /// Returns the markers reached, in ascending time order. Markers bunched
    /// closer together than the tick interval are all reported in one batch.
    /// Nothing fires while simulating.
    pub fn on_position_tick(&mut self, position: f64, simulating: bool) -> Vec<Marker> {
        if simulating || self.markers.is_empty() {
            return Vec::new();
        }

        let threshold = self.proximity_threshold;
        let passed_next = self
            .next_marker()
            .is_some_and(|m| position > m.time + threshold);
        let behind_prev = self
            .prev_marker()
            .is_some_and(|m| position < m.time - threshold);
        if passed_next || behind_prev {
            self.recompute_cursor(position);
        }

        let Some(start) = self.cursor.next else {
            return Vec::new();
        };
        if (self.markers[start].time - position).abs() >= threshold {
            return Vec::new();
        }

        let mut end = start;
        while end < self.markers.len() && self.markers[end].time - position < threshold {
            end += 1;
        }

        let fired = self.markers[start..end].to_vec();
        debug!(count = fired.len(), position, "markers reached");
        self.cursor = MarkerCursor {
            next: (end < self.markers.len()).then_some(end),
            prev: Some(end - 1),
        };
        fired
    }

    /// Chapter times used for navigation: explicit chapters if any, then
    /// advertisement breaks (which also displace the defaults), otherwise
    /// the generated defaults.
    fn chapter_times(&self) -> Vec<f64> {
        let times_of = |keep: fn(&Marker) -> bool| -> Vec<f64> {
            self.markers.iter().filter(|m| keep(m)).map(|m| m.time).collect()
        };
        let chapters = times_of(|m| m.kind == MarkerKind::Chapter);
        if !chapters.is_empty() {
            return chapters;
        }
        let breaks = times_of(|m| m.kind.is_explicit_chapter());
        if !breaks.is_empty() {
            return breaks;
        }
        self.defaults.iter().map(|m| m.time).collect()
    }

    /// First chapter strictly after `position`.
    pub fn next_chapter_after(&self, position: f64) -> Option<f64> {
        self.chapter_times()
            .into_iter()
            .find(|&t| t > position + self.proximity_threshold)
    }

    /// Chapter to go back to from `position`.
    pub fn previous_chapter_before(&self, position: f64) -> Option<f64> {
        self.chapter_times()
            .into_iter()
            .rev()
            .find(|&t| t <= position - CHAPTER_BACK_GRACE)
    }
}
