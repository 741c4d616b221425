use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::GpxUtilsError;
use crate::gpx_types::*;

type Result<T> = std::result::Result<T, GpxUtilsError>;

/// Content of the `<?xml ...?>` declaration.
macro_rules! xml_decl {
    () => {
        "xml version=\"1.0\" encoding=\"UTF-8\" "
    };
}

/// Content of the root start tag: rubiTrack's GPX 1.1 convention with the
/// cluetrust `gpxdata` namespace used by heart-rate and cadence extensions.
macro_rules! gpx_start {
    () => {
        concat!(
            "gpx xmlns=\"http://www.topografix.com/GPX/1/1\"\n",
            "    version=\"1.1\"\n",
            "    creator=\"rubiTrack - https://www.rubitrack.com\"\n",
            "    xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\"\n",
            "    xmlns:gpxdata=\"http://www.cluetrust.com/XML/GPXDATA/1/0\"\n",
            "    xsi:schemaLocation=\"http://www.topografix.com/GPX/1/1 ",
            "http://www.topografix.com/GPX/1/1/gpx.xsd ",
            "http://www.cluetrust.com/XML/GPXDATA/1/0 ",
            "http://www.cluetrust.com/Schemas/gpxdata10.xsd\"",
        )
    };
}

/// Everything written before the first `<trk>`.
pub const GPX_HEADER: &str = concat!("<?", xml_decl!(), "?>\n<", gpx_start!(), ">\n");

/// Everything written after the last `</trk>`.
pub const GPX_FOOTER: &str = "</gpx>\n";

/// Render one track as a complete GPX document.
pub fn write_track(track: &Track) -> Result<String> {
    let mut w = Writer::new_with_indent(Vec::new(), b' ', 2);

    let decl = BytesDecl::from_start(BytesStart::from_content(xml_decl!(), 3));
    w.write_event(Event::Decl(decl))?;

    let gpx = BytesStart::from_content(gpx_start!(), 3);
    w.write_event(Event::Start(gpx.borrow()))?;
    write_trk(&mut w, track)?;
    w.write_event(Event::End(gpx.to_end()))?;
    w.write_event(Event::Text(BytesText::from_escaped("\n")))?;

    Ok(String::from_utf8(w.into_inner())?)
}

fn write_trk(w: &mut Writer<Vec<u8>>, track: &Track) -> Result<()> {
    let trk = BytesStart::new("trk");
    w.write_event(Event::Start(trk.borrow()))?;
    write_text_element(w, "name", &track.name)?;
    write_text_element(w, "desc", &track.description)?;

    for seg in &track.segments {
        let trkseg = BytesStart::new("trkseg");
        w.write_event(Event::Start(trkseg.borrow()))?;
        for pt in &seg.points {
            write_trkpt(w, pt)?;
        }
        w.write_event(Event::End(trkseg.to_end()))?;
    }

    w.write_event(Event::End(trk.to_end()))?;
    Ok(())
}

fn write_trkpt(w: &mut Writer<Vec<u8>>, pt: &TrackPoint) -> Result<()> {
    let mut trkpt = BytesStart::new("trkpt");
    trkpt.push_attribute(("lat", pt.latitude.as_str()));
    trkpt.push_attribute(("lon", pt.longitude.as_str()));
    w.write_event(Event::Start(trkpt.borrow()))?;

    if !pt.elevation.is_empty() {
        write_text_element(w, "ele", &pt.elevation)?;
    }
    if !pt.timestamp.is_empty() {
        write_text_element(w, "time", &pt.timestamp)?;
    }
    if let Some(ext) = &pt.extensions {
        let extensions = BytesStart::new("extensions");
        w.write_event(Event::Start(extensions.borrow()))?;
        // already markup, written as-is
        w.write_event(Event::Text(BytesText::from_escaped(ext.as_raw())))?;
        w.write_event(Event::End(extensions.to_end()))?;
    }

    w.write_event(Event::End(trkpt.to_end()))?;
    Ok(())
}

/// `<tag>text</tag>` on one line. Only `&`, `<` and `>` are escaped, so quotes
/// in names and descriptions come out as they went in.
fn write_text_element(w: &mut Writer<Vec<u8>>, tag: &str, text: &str) -> Result<()> {
    let start = BytesStart::new(tag);
    w.write_event(Event::Start(start.borrow()))?;
    // an empty text event keeps the end tag on the same line
    w.write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))?;
    w.write_event(Event::End(start.to_end()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_gpx;

    #[test]
    fn test_envelope() {
        let gpx = write_track(&Track::default()).unwrap();
        assert!(gpx.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n<gpx "));
        assert!(gpx.contains("xmlns:gpxdata=\"http://www.cluetrust.com/XML/GPXDATA/1/0\""));
        assert!(gpx.ends_with("  </trk>\n</gpx>\n"));
    }

    #[test]
    fn test_empty_track_layout() {
        let gpx = write_track(&Track::default()).unwrap();
        let body = gpx.strip_prefix(GPX_HEADER).unwrap();
        assert_eq!(
            body,
            "  <trk>\n    <name></name>\n    <desc></desc>\n  </trk>\n</gpx>\n"
        );
    }

    #[test]
    fn test_point_layout() {
        let track = Track {
            name: "Bonn".to_string(),
            description: String::new(),
            segments: vec![
                Segment {
                    points: vec![
                        TrackPoint {
                            elevation: "85.7".to_string(),
                            timestamp: "2011-04-09T06:03:40Z".to_string(),
                            extensions: Some(Extensions::from_raw("<gpxdata:hr>0</gpxdata:hr>")),
                            ..TrackPoint::new("50.83326700", "7.13071600")
                        },
                        TrackPoint::new("50.1", "7.1"),
                    ],
                },
                Segment::default(),
            ],
        };
        let gpx = write_track(&track).unwrap();
        let body = gpx.strip_prefix(GPX_HEADER).unwrap();
        assert_eq!(
            body,
            r#"  <trk>
    <name>Bonn</name>
    <desc></desc>
    <trkseg>
      <trkpt lat="50.83326700" lon="7.13071600">
        <ele>85.7</ele>
        <time>2011-04-09T06:03:40Z</time>
        <extensions><gpxdata:hr>0</gpxdata:hr></extensions>
      </trkpt>
      <trkpt lat="50.1" lon="7.1">
      </trkpt>
    </trkseg>
    <trkseg>
    </trkseg>
  </trk>
</gpx>
"#
        );
    }

    #[test]
    fn test_text_is_escaped() {
        let track = Track {
            name: "Tom & Jerry <3".to_string(),
            ..Default::default()
        };
        let gpx = write_track(&track).unwrap();
        assert!(gpx.contains("<name>Tom &amp; Jerry &lt;3</name>"));
        assert_eq!(parse_gpx(gpx.as_bytes()).tracks[0].name, "Tom & Jerry <3");
    }

    #[test]
    fn test_quotes_in_text_left_alone() {
        let track = Track {
            name: r#"Rock'n'Roll "Tour""#.to_string(),
            description: "it's".to_string(),
            ..Default::default()
        };
        let gpx = write_track(&track).unwrap();
        assert!(gpx.contains(r#"<name>Rock'n'Roll "Tour"</name>"#));
        assert!(gpx.contains("<desc>it's</desc>"));
    }

    #[test]
    fn test_quote_in_single_quoted_attribute() {
        let xml = r#"<gpx><trk><trkseg><trkpt lat='1"2' lon="3"><ele>4</ele></trkpt></trkseg></trk></gpx>"#;
        let track = &parse_gpx(xml.as_bytes()).tracks[0];
        assert_eq!(track.segments[0].points[0].latitude, r#"1"2"#);

        let gpx = write_track(track).unwrap();
        assert!(gpx.contains(r#"<trkpt lat="1&quot;2" lon="3">"#));

        let reparsed = parse_gpx(gpx.as_bytes());
        let points = &reparsed.tracks[0].segments[0].points;
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].latitude, r#"1"2"#);
        assert_eq!(points[0].elevation, "4");
    }

    #[test]
    fn test_extension_markup_not_escaped() {
        let raw = "\n  <ns:x a='1'  b=\"&amp;\">t</ns:x><!-- c -->\n";
        let track = Track {
            segments: vec![Segment {
                points: vec![TrackPoint {
                    extensions: Some(Extensions::from_raw(raw)),
                    ..TrackPoint::new("1", "2")
                }],
            }],
            ..Default::default()
        };
        let gpx = write_track(&track).unwrap();
        assert!(gpx.contains(&format!("<extensions>{raw}</extensions>")));
    }

    #[test]
    fn test_reserialize_is_identical() {
        let track = Track {
            name: "A & B".to_string(),
            description: "loop".to_string(),
            segments: vec![Segment {
                points: vec![TrackPoint {
                    elevation: "12".to_string(),
                    timestamp: "2025-01-01T00:00:00Z".to_string(),
                    extensions: Some(Extensions::from_raw("\n   <hr>120</hr>\n        ")),
                    ..TrackPoint::new("35.0", "139.0")
                }],
            }],
        };
        let first = write_track(&track).unwrap();
        let doc = parse_gpx(first.as_bytes());
        assert_eq!(doc.tracks[0], track);
        assert_eq!(write_track(&doc.tracks[0]).unwrap(), first);
    }
}
