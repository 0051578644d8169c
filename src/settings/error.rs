//! Settings error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while validating or persisting settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A value is outside its allowed range.
    #[error("{field} must be between {min} and {max} minutes (got {value})")]
    OutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    /// No configuration directory could be determined.
    #[error("could not determine a configuration directory; set FOCUSTOOLS_SETTINGS")]
    NoConfigDir,

    /// Reading or writing the settings file failed.
    #[error("settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid JSON.
    #[error("settings file {path} is malformed: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl SettingsError {
    /// Returns true if the error is a range validation failure.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::OutOfRange { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_display() {
        let err = SettingsError::OutOfRange {
            field: "workMinutes",
            value: 90,
            min: 1,
            max: 60,
        };
        let message = err.to_string();
        assert!(message.contains("workMinutes"));
        assert!(message.contains("90"));
        assert!(err.is_validation());
    }

    #[test]
    fn test_io_is_not_validation() {
        let err = SettingsError::Io {
            path: PathBuf::from("/x"),
            source: std::io::Error::other("boom"),
        };
        assert!(!err.is_validation());
        assert!(err.to_string().contains("/x"));
    }
}
