use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};

use crate::error::GpxUtilsError;
use crate::gpx_types::*;
use crate::options::{RedistributeOptions, Spacing};

type Result<T> = std::result::Result<T, GpxUtilsError>;

const NANOS_PER_SECOND: i128 = 1_000_000_000;

/// A closed time interval whose end is strictly later than its begin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    begin: OffsetDateTime,
    end: OffsetDateTime,
}

impl TimeWindow {
    pub fn new(begin: OffsetDateTime, end: OffsetDateTime) -> Result<Self> {
        if end <= begin {
            return Err(GpxUtilsError::InvalidTimeWindow { begin, end });
        }
        Ok(Self { begin, end })
    }

    /// Build a window from two RFC3339 strings.
    pub fn parse(begin: &str, end: &str) -> Result<Self> {
        Self::new(parse_time("begin", begin)?, parse_time("end", end)?)
    }

    pub fn begin(&self) -> OffsetDateTime {
        self.begin
    }

    pub fn end(&self) -> OffsetDateTime {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.begin
    }
}

fn parse_time(field: &'static str, value: &str) -> Result<OffsetDateTime> {
    OffsetDateTime::parse(value.trim(), &Rfc3339).map_err(|source| GpxUtilsError::InvalidTime {
        field,
        value: value.to_string(),
        source,
    })
}

/// Build a copy of `track` whose points carry synthesized timestamps spread
/// over `window`.
///
/// Points are numbered across all segments without restarting, so timestamps
/// strictly increase over the whole track and the first one equals the
/// window's begin. Extension blocks are not carried over.
pub fn redistribute(
    track: &Track,
    window: &TimeWindow,
    opts: &RedistributeOptions,
) -> Result<Track> {
    let offsets = Offsets::new(track.point_count(), window, opts)?;
    let mut index = 0usize;

    let mut segments = Vec::with_capacity(track.segments.len());
    for seg in &track.segments {
        let mut points = Vec::with_capacity(seg.points.len());
        for pt in &seg.points {
            points.push(TrackPoint {
                latitude: pt.latitude.clone(),
                longitude: pt.longitude.clone(),
                elevation: pt.elevation.clone(),
                timestamp: offsets.timestamp(index)?,
                extensions: None,
            });
            index += 1;
        }
        segments.push(Segment { points });
    }

    Ok(Track {
        name: track.name.clone(),
        description: track.description.clone(),
        segments,
    })
}

/// Offset of the i-th point from the window's begin, in nanoseconds.
struct Offsets {
    begin: OffsetDateTime,
    spacing: Spacing,
    span: i128,
    last: i128,
}

impl Offsets {
    fn new(points: usize, window: &TimeWindow, opts: &RedistributeOptions) -> Result<Self> {
        let last = points.saturating_sub(1) as i128;
        let span = match opts.spacing {
            Spacing::Proportional => {
                let span = window.duration().whole_nanoseconds();
                if span < last {
                    return Err(GpxUtilsError::WindowTooShort { points });
                }
                span
            }
            Spacing::Fixed => {
                if opts.step_seconds == 0 {
                    return Err(GpxUtilsError::InvalidStep);
                }
                i128::from(opts.step_seconds) * NANOS_PER_SECOND
            }
        };

        Ok(Self {
            begin: window.begin(),
            spacing: opts.spacing,
            span,
            last,
        })
    }

    fn timestamp(&self, index: usize) -> Result<String> {
        let index = index as i128;
        let nanos = match self.spacing {
            Spacing::Proportional if self.last == 0 => 0,
            Spacing::Proportional => self.span * index / self.last,
            Spacing::Fixed => self.span * index,
        };

        let offset = i64::try_from(nanos).map_err(|_| GpxUtilsError::TimestampOverflow)?;
        let time = self
            .begin
            .checked_add(Duration::nanoseconds(offset))
            .ok_or(GpxUtilsError::TimestampOverflow)?;

        Ok(time.format(&Rfc3339)?)
    }
}
