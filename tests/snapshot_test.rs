use gpxutils::options::RedistributeOptions;
use gpxutils::output::{redistribute_tracks, split_tracks, OutputFile};
use gpxutils::parser::parse_gpx;
use gpxutils::redistribute::TimeWindow;
use std::path::Path;

fn load_fixture(path: &str) -> Vec<u8> {
    std::fs::read(format!("tests/fixtures/{path}")).unwrap()
}

/// Compare a generated file against `tests/fixtures/expected/<file_name>`.
/// When `UPDATE_SNAPSHOTS=1` is set, write/overwrite the expected file instead.
fn assert_snapshot(actual: &OutputFile) {
    let path = format!("tests/fixtures/expected/{}", actual.file_name);

    if matches!(std::env::var("UPDATE_SNAPSHOTS").as_deref(), Ok("1")) {
        let dir = Path::new(&path).parent().unwrap();
        std::fs::create_dir_all(dir).unwrap();
        std::fs::write(&path, actual.contents.as_bytes()).unwrap();
        eprintln!("Updated snapshot: {path}");
        return;
    }

    let expected = std::fs::read_to_string(&path)
        .unwrap_or_else(|_| panic!("Expected file not found: {path}. Run with UPDATE_SNAPSHOTS=1 to generate."));

    assert_eq!(
        actual.contents, expected,
        "Snapshot mismatch for {path}.\nRun with UPDATE_SNAPSHOTS=1 to update."
    );
}

#[test]
fn snapshot_split_bonn() {
    let files = split_tracks(&parse_gpx(&load_fixture("bonn.gpx")), "bonn").unwrap();
    assert_eq!(files.len(), 1);
    assert_snapshot(&files[0]);
}

#[test]
fn snapshot_redistribute_bonn() {
    let window = TimeWindow::parse("2024-05-01T08:00:00Z", "2024-05-01T08:03:00Z").unwrap();
    let files = redistribute_tracks(
        &parse_gpx(&load_fixture("bonn.gpx")),
        "bonn",
        &window,
        &RedistributeOptions::default(),
    )
    .unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].file_name, "bonn-00.gpx");
    assert_snapshot(&files[0]);
}

#[test]
fn snapshot_split_output_reparses_to_itself() {
    let expected = load_fixture("expected/2011-04-09T06-03-40Z.gpx");
    let files = split_tracks(&parse_gpx(&expected), "again").unwrap();
    assert_eq!(files[0].contents.as_bytes(), expected.as_slice());
}
