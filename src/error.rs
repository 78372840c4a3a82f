//! Error types for voxnote.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoxnoteError {
    // Configuration errors
    #[error("Failed to parse configuration: {message}")]
    ConfigParse { message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Capture errors
    #[error("Audio device not found: {device}")]
    DeviceNotFound { device: String },

    #[error("Failed to open audio stream: {message}")]
    StreamOpen { message: String },

    // Recognition errors
    #[error("Failed to load model '{model}': {message}")]
    ModelLoad { model: String, message: String },

    #[error("Recognition failed: {message}")]
    Recognition { message: String },

    // Flush errors
    #[error("Failed to write transcript to {}: {source}", .path.display())]
    FlushWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, VoxnoteError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_device_not_found_display() {
        let error = VoxnoteError::DeviceNotFound {
            device: "hw:9".to_string(),
        };
        assert_eq!(error.to_string(), "Audio device not found: hw:9");
    }

    #[test]
    fn test_stream_open_display() {
        let error = VoxnoteError::StreamOpen {
            message: "device busy".to_string(),
        };
        assert_eq!(error.to_string(), "Failed to open audio stream: device busy");
    }

    #[test]
    fn test_model_load_display() {
        let error = VoxnoteError::ModelLoad {
            model: "en-us".to_string(),
            message: "no model directory found".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to load model 'en-us': no model directory found"
        );
    }

    #[test]
    fn test_recognition_display() {
        let error = VoxnoteError::Recognition {
            message: "recognizer entered failed state".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Recognition failed: recognizer entered failed state"
        );
    }

    #[test]
    fn test_flush_write_display_includes_path() {
        let error = VoxnoteError::FlushWrite {
            path: PathBuf::from("/tmp/out.txt"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(
            error.to_string(),
            "Failed to write transcript to /tmp/out.txt: denied"
        );
    }

    #[test]
    fn test_config_parse_display() {
        let error = VoxnoteError::ConfigParse {
            message: "invalid TOML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration: invalid TOML syntax"
        );
    }

    #[test]
    fn test_other_display() {
        let error = VoxnoteError::Other("unexpected error".to_string());
        assert_eq!(error.to_string(), "unexpected error");
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: VoxnoteError = io_error.into();
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_toml_error() {
        let toml_str = "invalid = toml = syntax";
        let toml_error = toml::from_str::<toml::Value>(toml_str).unwrap_err();
        let error: VoxnoteError = toml_error.into();
        assert!(error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_error_source_chain_flush_write() {
        let error = VoxnoteError::FlushWrite {
            path: PathBuf::from("/tmp/out.txt"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let error_trait: &dyn std::error::Error = &error;
        assert!(error_trait.source().is_some());
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<VoxnoteError>();
        assert_sync::<VoxnoteError>();
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(returns_result().unwrap(), 42);
    }
}
