use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::GpxUtilsError;
use crate::gpx_types::Document;
use crate::options::RedistributeOptions;
use crate::query::UNKNOWN_LABEL;
use crate::redistribute::{redistribute, TimeWindow};
use crate::writer::write_track;

/// A serialized track and the file name it should be stored under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputFile {
    pub file_name: String,
    pub contents: String,
}

/// Track labels plus the total, as shown by list mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackListing {
    pub labels: Vec<String>,
    pub total: usize,
}

impl TrackListing {
    pub fn lines(&self) -> Vec<String> {
        let mut lines = self.labels.clone();
        lines.push(format!("Total amount of tracks in file: {}", self.total));
        lines
    }
}

pub fn list_tracks(doc: &Document) -> TrackListing {
    TrackListing {
        labels: doc.track_labels(),
        total: doc.track_count(),
    }
}

/// Input file name without directory and extension.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// `<stem>-NN`, the name used for tracks without a usable label.
pub fn indexed_name(stem: &str, index: usize) -> String {
    format!("{stem}-{index:02}")
}

/// One document per track, named after the track's label when it has one.
pub fn split_tracks(doc: &Document, stem: &str) -> Result<Vec<OutputFile>, GpxUtilsError> {
    doc.tracks
        .iter()
        .enumerate()
        .map(|(i, track)| {
            let label = track.label();
            let name = if label == UNKNOWN_LABEL {
                indexed_name(stem, i)
            } else {
                label
            };
            Ok(OutputFile {
                file_name: format!("{name}.gpx"),
                contents: write_track(track)?,
            })
        })
        .collect()
}

/// One re-timed document per track, named `<stem>-NN.gpx`.
///
/// Every track is processed before anything is returned, so a failure leaves
/// the caller with nothing to write.
pub fn redistribute_tracks(
    doc: &Document,
    stem: &str,
    window: &TimeWindow,
    opts: &RedistributeOptions,
) -> Result<Vec<OutputFile>, GpxUtilsError> {
    doc.tracks
        .iter()
        .enumerate()
        .map(|(i, track)| {
            let retimed = redistribute(track, window, opts)?;
            Ok(OutputFile {
                file_name: format!("{}.gpx", indexed_name(stem, i)),
                contents: write_track(&retimed)?,
            })
        })
        .collect()
}

#[derive(Debug, Default)]
pub struct WriteSummary {
    pub written: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, io::Error)>,
}

/// Write each file into `out_dir`. A failed write is logged and recorded; the
/// remaining files are still attempted.
pub fn write_files(out_dir: &Path, files: &[OutputFile]) -> WriteSummary {
    let mut summary = WriteSummary::default();

    for file in files {
        let path = out_dir.join(&file.file_name);
        match fs::write(&path, &file.contents) {
            Ok(()) => {
                log::debug!("wrote {}", path.display());
                summary.written.push(path);
            }
            Err(e) => {
                log::warn!("could not write {}: {e}", path.display());
                summary.failed.push((path, e));
            }
        }
    }

    summary
}
