//! Core error types for diagram detection
//!
//! Detection itself never fails — every recoverable problem is absorbed
//! at the dispatch boundary and converted into the sentinel empty
//! analysis. These errors exist for the fallible edges of the crate: file
//! reads and host-facing configuration.

use thiserror::Error;

/// Errors raised by the fallible edges of the detection subsystem
#[derive(Error, Debug)]
pub enum DetectError {
    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("Unreadable content: {message}")]
    UnreadableContent { message: String },

    #[error("Unsupported extension: {extension}")]
    UnsupportedExtension { extension: String },
}

impl DetectError {
    /// Create a new unreadable-content error
    pub fn unreadable_content(message: String) -> Self {
        Self::UnreadableContent { message }
    }

    /// Create a new unsupported-extension error
    pub fn unsupported_extension(extension: String) -> Self {
        Self::UnsupportedExtension { extension }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreadable_content_error() {
        let error = DetectError::unreadable_content("truncated payload".to_string());
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Unreadable content"));
        assert!(error_msg.contains("truncated payload"));
    }

    #[test]
    fn test_unsupported_extension_error() {
        let error = DetectError::unsupported_extension("bmp".to_string());
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Unsupported extension"));
        assert!(error_msg.contains("bmp"));
    }

    #[test]
    fn test_io_error_conversion() {
        use std::io;
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: DetectError = io_err.into();
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("IO error"));
        assert!(error_msg.contains("File not found"));
    }
}
