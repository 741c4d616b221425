use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::GpxUtilsError;
use crate::gpx_types::*;

type Result<T> = std::result::Result<T, GpxUtilsError>;

/// Parse a GPX document into its tracks.
///
/// Parsing is lenient: missing attributes and children become empty strings,
/// and an XML error stops the read without discarding what was already
/// collected. The partially read track, segment and point are kept.
pub fn parse_gpx(input: &[u8]) -> Document {
    let mut reader = Reader::from_reader(input);
    let mut doc = Document::default();

    match read_document(input, &mut reader, &mut doc) {
        Ok(()) => log::debug!("parsed {} track(s)", doc.tracks.len()),
        Err(e) => log::warn!(
            "stopped reading GPX at byte {}: {e}; keeping {} track(s)",
            reader.buffer_position(),
            doc.tracks.len()
        ),
    }

    doc
}

fn read_document<'a>(
    input: &'a [u8],
    reader: &mut Reader<&'a [u8]>,
    doc: &mut Document,
) -> Result<()> {
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"trk" => {
                let mut track = Track::default();
                let result = read_track(input, reader, &mut track);
                doc.tracks.push(track);
                result?;
            }
            Event::Empty(e) if e.local_name().as_ref() == b"trk" => {
                doc.tracks.push(Track::default());
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(())
}

/// Read the children of a <trk> element up to its end tag.
fn read_track<'a>(input: &'a [u8], reader: &mut Reader<&'a [u8]>, track: &mut Track) -> Result<()> {
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"name" => track.name = read_text_owned(reader, &e)?,
                b"desc" => track.description = read_text_owned(reader, &e)?,
                b"trkseg" => {
                    let mut segment = Segment::default();
                    let result = read_segment(input, reader, &mut segment);
                    track.segments.push(segment);
                    result?;
                }
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Event::Empty(e) if e.local_name().as_ref() == b"trkseg" => {
                track.segments.push(Segment::default());
            }
            Event::End(e) if e.local_name().as_ref() == b"trk" => break,
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(())
}

/// Read the points of a <trkseg> element up to its end tag.
fn read_segment<'a>(
    input: &'a [u8],
    reader: &mut Reader<&'a [u8]>,
    segment: &mut Segment,
) -> Result<()> {
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"trkpt" => {
                    let mut point = point_from_attributes(&e);
                    let result = read_point(input, &e, reader, &mut point);
                    segment.points.push(point);
                    result?;
                }
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Event::Empty(e) if e.local_name().as_ref() == b"trkpt" => {
                segment.points.push(point_from_attributes(&e));
            }
            Event::End(e) if e.local_name().as_ref() == b"trkseg" => break,
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(())
}

/// Build a point from the lat/lon attributes of its start tag.
/// Entity references in the values are resolved; a value that cannot be
/// resolved is kept as written. Malformed attributes are ignored.
fn point_from_attributes(e: &BytesStart<'_>) -> TrackPoint {
    let mut point = TrackPoint::default();

    for attr in e.attributes().flatten() {
        let raw = String::from_utf8_lossy(&attr.value);
        let value = match unescape(&raw) {
            Ok(value) => value.into_owned(),
            Err(_) => raw.into_owned(),
        };
        match attr.key.local_name().as_ref() {
            b"lat" => point.latitude = value,
            b"lon" => point.longitude = value,
            _ => {}
        }
    }

    point
}

/// Read the children of a <trkpt> element.
/// Called after receiving Event::Start for the point element.
fn read_point<'a>(
    input: &'a [u8],
    start: &BytesStart<'a>,
    reader: &mut Reader<&'a [u8]>,
    point: &mut TrackPoint,
) -> Result<()> {
    let end_name = start.name().0.to_vec();

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"ele" => point.elevation = read_text_owned(reader, &e)?.trim().to_string(),
                b"time" => point.timestamp = read_text_owned(reader, &e)?.trim().to_string(),
                b"extensions" => {
                    // span between the tags, markup included
                    let span = reader.read_to_end(e.name())?;
                    let raw = input
                        .get(span.start as usize..span.end as usize)
                        .unwrap_or_default();
                    let raw = String::from_utf8_lossy(raw).into_owned();
                    point.extensions = Some(Extensions::from_raw(raw));
                }
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Event::Empty(e) if e.local_name().as_ref() == b"extensions" => {
                point.extensions = Some(Extensions::default());
            }
            Event::End(e) if e.name().0 == end_name.as_slice() => break,
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(())
}

/// Decoded text of a simple element such as <name> or <time>, up to its end
/// tag. CDATA is taken literally, the five predefined entities and character
/// references are resolved, unknown entities are dropped and nested markup
/// is skipped. Invalid UTF-8 is replaced rather than reported.
fn read_text_owned<'a>(reader: &mut Reader<&'a [u8]>, start: &BytesStart<'_>) -> Result<String> {
    let end_name = start.name().0.to_vec();
    let mut text = String::new();

    loop {
        match reader.read_event()? {
            Event::Text(e) => text.push_str(&String::from_utf8_lossy(e.as_ref())),
            Event::CData(e) => text.push_str(&String::from_utf8_lossy(e.as_ref())),
            Event::GeneralRef(e) => {
                if let Ok(Some(ch)) = e.resolve_char_ref() {
                    text.push(ch);
                } else {
                    let name: &[u8] = e.as_ref();
                    match name {
                        b"amp" => text.push('&'),
                        b"lt" => text.push('<'),
                        b"gt" => text.push('>'),
                        b"quot" => text.push('"'),
                        b"apos" => text.push('\''),
                        _ => {}
                    }
                }
            }
            Event::End(e) if e.name().0 == end_name.as_slice() => break,
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}
