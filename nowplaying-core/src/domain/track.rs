//! Track payload parsing
//!
//! A successful lookup job returns its result as a JSON document (usually
//! embedded as a string) of the form `{"data": "Artist - Title"}`. The
//! `data` string is what the music field displays.

use serde::Deserialize;
use thiserror::Error;

/// Separator between artist and title in the field text
pub const ARTIST_TITLE_SEPARATOR: &str = " - ";

/// Errors raised while interpreting a result payload
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("payload is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("payload has no \"data\" field")]
    MissingData,
}

#[derive(Debug, Deserialize)]
struct MusicPayload {
    data: Option<serde_json::Value>,
}

/// Extracts the field text from a raw result payload
///
/// Accepts both the plain document and a document that was JSON-encoded a
/// second time as a string. A `null` data value yields an empty string.
pub fn parse_payload(raw: &str) -> Result<String, PayloadError> {
    let mut value: serde_json::Value = serde_json::from_str(raw)?;

    if let serde_json::Value::String(inner) = &value {
        value = serde_json::from_str(inner)?;
    }

    let payload: MusicPayload = serde_json::from_value(value)?;

    match payload.data {
        Some(serde_json::Value::String(text)) => Ok(text),
        Some(serde_json::Value::Null) => Ok(String::new()),
        Some(other) => Ok(other.to_string()),
        None => Err(PayloadError::MissingData),
    }
}

/// A track split out of the field text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub artist: String,
    pub title: String,
}

impl Track {
    /// Splits `Artist - Title` at the first separator
    ///
    /// Returns `None` for empty text or text without a separator.
    pub fn from_field_text(text: &str) -> Option<Self> {
        let (artist, title) = text.split_once(ARTIST_TITLE_SEPARATOR)?;
        let artist = artist.trim();
        let title = title.trim();

        if artist.is_empty() || title.is_empty() {
            return None;
        }

        Some(Self {
            artist: artist.to_string(),
            title: title.to_string(),
        })
    }

    pub fn field_text(&self) -> String {
        format!("{}{}{}", self.artist, ARTIST_TITLE_SEPARATOR, self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_document() {
        let text = parse_payload(r#"{"data":"Artist - Title"}"#).unwrap();
        assert_eq!(text, "Artist - Title");
    }

    #[test]
    fn test_parse_string_encoded_document() {
        let text = parse_payload(r#""{\"data\":\"Artist - Title\"}""#).unwrap();
        assert_eq!(text, "Artist - Title");
    }

    #[test]
    fn test_data_is_kept_verbatim() {
        let text = parse_payload(r#"{"data":"  Artist - Title "}"#).unwrap();
        assert_eq!(text, "  Artist - Title ");
    }

    #[test]
    fn test_null_data_is_empty() {
        assert_eq!(parse_payload(r#"{"data":null}"#).unwrap(), "");
    }

    #[test]
    fn test_missing_data_is_an_error() {
        assert!(matches!(
            parse_payload(r#"{"other":1}"#),
            Err(PayloadError::MissingData)
        ));
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(matches!(
            parse_payload("not json"),
            Err(PayloadError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_track_from_field_text() {
        let track = Track::from_field_text("Boards of Canada - Roygbiv").unwrap();
        assert_eq!(track.artist, "Boards of Canada");
        assert_eq!(track.title, "Roygbiv");
        assert_eq!(track.field_text(), "Boards of Canada - Roygbiv");

        // only the first separator splits
        let track = Track::from_field_text("A - B - C").unwrap();
        assert_eq!(track.title, "B - C");

        assert!(Track::from_field_text("").is_none());
        assert!(Track::from_field_text("No separator").is_none());
    }
}
