use crate::gpx_types::{Document, Track};

/// Label used for a track in which no point carries a timestamp.
pub const UNKNOWN_LABEL: &str = "unknown";

impl Track {
    /// The first non-empty point timestamp, in segment then point order.
    pub fn first_timestamp(&self) -> Option<&str> {
        self.points()
            .map(|pt| pt.timestamp.as_str())
            .find(|time| !time.is_empty())
    }

    /// Filesystem-safe label: the first timestamp with `:` replaced by `-`,
    /// or [`UNKNOWN_LABEL`].
    pub fn label(&self) -> String {
        match self.first_timestamp() {
            Some(time) => time.replace(':', "-"),
            None => UNKNOWN_LABEL.to_string(),
        }
    }
}

impl Document {
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Labels of all tracks, in document order.
    pub fn track_labels(&self) -> Vec<String> {
        self.tracks.iter().map(Track::label).collect()
    }
}
