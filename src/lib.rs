pub mod error;
pub mod gpx_types;
pub mod options;
pub mod output;
pub mod parser;
pub mod query;
pub mod redistribute;
pub mod writer;

use wasm_bindgen::prelude::*;

use crate::options::RedistributeOptions;
use crate::redistribute::TimeWindow;

/// List track labels and the track count, returned as a JS object.
#[wasm_bindgen(js_name = gpxListTracks)]
pub fn gpx_list_tracks(gpx_string: &str) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let doc = parser::parse_gpx(gpx_string.as_bytes());
    let listing = output::list_tracks(&doc);
    serde_wasm_bindgen::to_value(&listing).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// List track labels and the track count, returned as a JSON string.
#[wasm_bindgen(js_name = gpxListTracksString)]
pub fn gpx_list_tracks_string(gpx_string: &str) -> Result<String, JsValue> {
    console_error_panic_hook::set_once();

    let doc = parser::parse_gpx(gpx_string.as_bytes());
    let listing = output::list_tracks(&doc);
    serde_json::to_string(&listing).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Split a GPX string into one document per track.
#[wasm_bindgen(js_name = gpxSplitTracks)]
pub fn gpx_split_tracks(gpx_string: &str, basename: &str) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let doc = parser::parse_gpx(gpx_string.as_bytes());
    let files = output::split_tracks(&doc, basename)?;
    serde_wasm_bindgen::to_value(&files).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Re-time every track of a GPX string over `[begin, end]` (RFC3339), one
/// document per track.
#[wasm_bindgen(js_name = gpxRedistributeTimestamps)]
pub fn gpx_redistribute_timestamps(
    gpx_string: &str,
    basename: &str,
    begin: &str,
    end: &str,
    options: JsValue,
) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let opts = parse_options(options)?;
    let window = TimeWindow::parse(begin, end)?;
    let doc = parser::parse_gpx(gpx_string.as_bytes());
    let files = output::redistribute_tracks(&doc, basename, &window, &opts)?;
    serde_wasm_bindgen::to_value(&files).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn parse_options(options: JsValue) -> Result<RedistributeOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        Ok(RedistributeOptions::default())
    } else {
        serde_wasm_bindgen::from_value(options).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
