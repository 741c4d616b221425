/// Parsed GPX document: the tracks it contains, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub tracks: Vec<Track>,
}

/// A GPX track (<trk>).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Track {
    pub name: String,
    pub description: String,
    pub segments: Vec<Segment>,
}

impl Track {
    /// Iterate over every point of every segment, in recording order.
    pub fn points(&self) -> impl Iterator<Item = &TrackPoint> {
        self.segments.iter().flat_map(|seg| seg.points.iter())
    }

    pub fn point_count(&self) -> usize {
        self.segments.iter().map(|seg| seg.points.len()).sum()
    }
}

/// A GPX track segment (<trkseg>).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segment {
    pub points: Vec<TrackPoint>,
}

/// A single recorded sample (<trkpt>).
///
/// Coordinates, elevation and time are kept as the text found in the source
/// document so that re-encoding never changes their precision. An empty string
/// means the value was absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackPoint {
    pub latitude: String,
    pub longitude: String,
    pub elevation: String,
    pub timestamp: String,
    pub extensions: Option<Extensions>,
}

impl TrackPoint {
    pub fn new(latitude: impl Into<String>, longitude: impl Into<String>) -> Self {
        Self {
            latitude: latitude.into(),
            longitude: longitude.into(),
            ..Default::default()
        }
    }
}

/// Unparsed content of a point's <extensions> element.
///
/// Holds the markup between the opening and closing tag exactly as it appeared
/// in the input, whatever vendor schema it follows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extensions {
    raw: String,
}

impl Extensions {
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn as_raw(&self) -> &str {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}
