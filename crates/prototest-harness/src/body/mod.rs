//! Media-type-aware body comparison.
//!
//! Expected bodies come from fixtures written by hand, actual bodies from a
//! serializer, so formatting freedom of the media type (key order, number
//! spelling, attribute order, whitespace between elements) must not count as
//! a difference.

mod form;
mod json;
mod xml;

/// How a body is compared, picked from its media type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Json,
    Xml,
    Form,
    Bytes,
}

impl BodyKind {
    /// `*json*` and `*xml*` by substring, form-urlencoded exactly, anything else as bytes.
    #[must_use]
    pub fn from_media_type(media_type: Option<&str>) -> Self {
        let Some(media_type) = media_type else {
            return Self::Bytes;
        };
        let essence = media_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        if essence.contains("json") {
            Self::Json
        } else if essence.contains("xml") {
            Self::Xml
        } else if essence == "application/x-www-form-urlencoded" {
            Self::Form
        } else {
            Self::Bytes
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BodyError {
    #[error("{side} body is not valid {kind}: {message}")]
    Malformed {
        kind: &'static str,
        side: &'static str,
        message: String,
    },
    #[error("at {path}: expected {expected}, got {actual}")]
    Differs {
        path: String,
        expected: String,
        actual: String,
    },
}

impl BodyError {
    pub(crate) fn differs(
        path: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::Differs {
            path: path.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

/// Compare two bodies under the rules of `media_type`.
///
/// # Errors
///
/// Returns the first difference found, or [`BodyError::Malformed`] when a
/// side does not parse as the media type.
pub fn compare(media_type: Option<&str>, expected: &[u8], actual: &[u8]) -> Result<(), BodyError> {
    match BodyKind::from_media_type(media_type) {
        BodyKind::Json => json::compare(expected, actual),
        BodyKind::Xml => xml::compare(expected, actual),
        BodyKind::Form => form::compare(expected, actual),
        BodyKind::Bytes => compare_bytes(expected, actual),
    }
}

fn compare_bytes(expected: &[u8], actual: &[u8]) -> Result<(), BodyError> {
    if expected == actual {
        return Ok(());
    }
    let offset = expected
        .iter()
        .zip(actual)
        .position(|(e, a)| e != a)
        .unwrap_or_else(|| expected.len().min(actual.len()));
    Err(BodyError::differs(
        format!("byte {offset}"),
        preview(&expected[offset..]),
        preview(&actual[offset..]),
    ))
}

fn preview(bytes: &[u8]) -> String {
    const MAX: usize = 32;
    if bytes.is_empty() {
        return "<end of body>".to_string();
    }
    let text = String::from_utf8_lossy(&bytes[..bytes.len().min(MAX)]);
    if bytes.len() > MAX {
        format!("{text:?}...")
    } else {
        format!("{text:?}")
    }
}
