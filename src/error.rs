use time::OffsetDateTime;
use wasm_bindgen::JsValue;

#[derive(Debug)]
pub enum GpxUtilsError {
    Xml(quick_xml::Error),
    Io(std::io::Error),
    Encoding(std::string::FromUtf8Error),
    InvalidTime {
        field: &'static str,
        value: String,
        source: time::error::Parse,
    },
    InvalidTimeWindow {
        begin: OffsetDateTime,
        end: OffsetDateTime,
    },
    WindowTooShort {
        points: usize,
    },
    InvalidStep,
    TimestampOverflow,
    TimeFormat(time::error::Format),
}

impl std::fmt::Display for GpxUtilsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Xml(e) => write!(f, "XML error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Encoding(e) => write!(f, "Output is not valid UTF-8: {e}"),
            Self::InvalidTime {
                field,
                value,
                source,
            } => write!(f, "Invalid {field} time '{value}': {source}"),
            Self::InvalidTimeWindow { begin, end } => {
                write!(f, "End time {end} must be later than begin time {begin}")
            }
            Self::WindowTooShort { points } => write!(
                f,
                "Time window is too short to give {points} points distinct timestamps"
            ),
            Self::InvalidStep => write!(f, "Fixed timestamp step must be at least one second"),
            Self::TimestampOverflow => write!(f, "Timestamp out of range"),
            Self::TimeFormat(e) => write!(f, "Timestamp format error: {e}"),
        }
    }
}

impl std::error::Error for GpxUtilsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Xml(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Encoding(e) => Some(e),
            Self::InvalidTime { source, .. } => Some(source),
            Self::TimeFormat(e) => Some(e),
            _ => None,
        }
    }
}

impl From<quick_xml::Error> for GpxUtilsError {
    fn from(e: quick_xml::Error) -> Self {
        Self::Xml(e)
    }
}

impl From<std::io::Error> for GpxUtilsError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<std::string::FromUtf8Error> for GpxUtilsError {
    fn from(e: std::string::FromUtf8Error) -> Self {
        Self::Encoding(e)
    }
}

impl From<time::error::Format> for GpxUtilsError {
    fn from(e: time::error::Format) -> Self {
        Self::TimeFormat(e)
    }
}

impl From<GpxUtilsError> for JsValue {
    fn from(e: GpxUtilsError) -> Self {
        js_sys::Error::new(&e.to_string()).into()
    }
}
