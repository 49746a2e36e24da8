//! Error types for the luminar core.
//!
//! Errors only surface at the edges of the system: ingesting structured
//! field data, looking up palettes by name, and writing snapshots. A frame
//! update never fails; anomalies inside it degrade to a particle respawn.

use thiserror::Error;

/// Errors produced while loading fields or resolving configuration.
#[derive(Debug, Error)]
pub enum FlowError {
    /// A field transform was requested for an empty sample set.
    #[error("field is empty: at least one sample is required")]
    EmptyField,

    /// A structured record carried a NaN or infinite component.
    #[error("field sample {index} has a non-finite component")]
    NonFiniteDatum { index: usize },

    /// A palette key did not match any entry in the catalog.
    #[error("unknown palette: {0}")]
    UnknownPalette(String),

    /// Structured field input was not valid JSON for a sample array.
    #[error("invalid field JSON: {0}")]
    InvalidJson(String),

    /// Snapshot width or height was zero or overflowed.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// Reading a field file or writing a snapshot failed.
    #[error("i/o error: {0}")]
    Io(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_field_displays_readable_message() {
        let msg = format!("{}", FlowError::EmptyField);
        assert!(msg.contains("empty"), "got: {msg}");
    }

    #[test]
    fn non_finite_datum_includes_index() {
        let msg = format!("{}", FlowError::NonFiniteDatum { index: 17 });
        assert!(msg.contains("17"), "missing index in: {msg}");
    }

    #[test]
    fn unknown_palette_includes_key() {
        let msg = format!("{}", FlowError::UnknownPalette("mauve".into()));
        assert!(msg.contains("mauve"), "missing key in: {msg}");
    }

    #[test]
    fn invalid_json_includes_message() {
        let msg = format!("{}", FlowError::InvalidJson("expected array".into()));
        assert!(msg.contains("expected array"), "missing message in: {msg}");
    }

    #[test]
    fn io_includes_message() {
        let msg = format!("{}", FlowError::Io("disk full".into()));
        assert!(msg.contains("disk full"), "missing message in: {msg}");
    }

    #[test]
    fn flow_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FlowError>();
    }

    #[test]
    fn flow_error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<FlowError>();
    }
}
