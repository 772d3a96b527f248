//! DJI WPML mission archives.
//!
//! An archive is a zip file with a mission template, a wayline document
//! and optionally the editing session that produced the mission:
//!
//! ```text
//! wpmz/template.kml
//! wpmz/waylines.wpml
//! wpmz/res/session.json
//! ```

use std::io;

mod export;
pub use export::*;
mod import;
pub use import::*;

#[cfg(test)]
mod tests;

pub const TEMPLATE_ENTRY: &str = "wpmz/template.kml";
pub const WAYLINES_ENTRY: &str = "wpmz/waylines.wpml";
pub const SESSION_ENTRY: &str = "wpmz/res/session.json";

pub const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";
pub const WPML_NAMESPACE: &str = "http://www.dji.com/wpmz/1.0.2";

/// Maximum length of a sanitized mission name.
pub const MAX_NAME_LEN: usize = 100;

/// Restricts a user-supplied mission name to `[A-Za-z0-9_-]`,
/// replacing other characters with `_`.
///
/// Surrounding whitespace is dropped first.
pub fn sanitize_name(name: &str) -> Result<String, Error> {
    let sanitized: String = name
        .trim()
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() || ch == '-' { ch } else { '_' })
        .take(MAX_NAME_LEN)
        .collect();
    if sanitized.is_empty() {
        return Err(Error::EmptyName);
    }
    Ok(sanitized)
}

/// The archive file name for a user-supplied mission name.
pub fn archive_file_name(name: &str) -> Result<String, Error> {
    Ok(format!("{}.kmz", sanitize_name(name)?))
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("XML escape error: {0}")]
    XmlEscape(#[from] quick_xml::escape::EscapeError),
    #[error("Session serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Archive contains no .wpml or .kml document")]
    MissingDocument,
    #[error("No point placemarks found in {0}")]
    NoPointData(String),
    #[error("Mission name is empty")]
    EmptyName,
}
