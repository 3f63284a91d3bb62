//! Error types and handling for Blueprint
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for Blueprint operations
#[derive(Error, Diagnostic, Debug)]
pub enum BlueprintError {
    // Argument errors
    #[error("Invalid arguments: {message}")]
    #[diagnostic(code(blueprint::args::invalid))]
    InvalidArguments { message: String },

    // Source tree errors
    #[error("Blueprint source tree not found at: {path}")]
    #[diagnostic(
        code(blueprint::source::not_found),
        help(
            "Point --source (or BLUEPRINT_SOURCE_DIR) at a checkout containing commands/bp/ and blueprint/"
        )
    )]
    SourceTreeNotFound { path: String },

    // Runtime resolution errors
    #[error("Could not determine home directory")]
    #[diagnostic(
        code(blueprint::runtime::no_home),
        help("Set HOME (or pass --config-dir) so the global install location can be resolved")
    )]
    HomeDirNotFound,

    // Settings errors
    #[error("Failed to parse settings file: {path}")]
    #[diagnostic(
        code(blueprint::settings::parse_failed),
        help("The file was left untouched. Fix the JSON syntax manually and rerun.")
    )]
    SettingsParseFailed { path: String, reason: String },

    // Installation errors
    #[error("Installation incomplete! Failed: {failed}")]
    #[diagnostic(
        code(blueprint::install::incomplete),
        help("Check directory permissions and rerun the install")
    )]
    InstallIncomplete { failed: String },

    // File system errors
    #[error("Failed to read file: {path}")]
    #[diagnostic(code(blueprint::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}")]
    #[diagnostic(code(blueprint::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("Failed to create directory: {path}")]
    #[diagnostic(code(blueprint::fs::create_dir_failed))]
    DirCreateFailed { path: String, reason: String },

    #[error("Failed to remove: {path}")]
    #[diagnostic(code(blueprint::fs::remove_failed))]
    RemoveFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(blueprint::fs::io_error))]
    IoError { message: String },
}

/// Build a `FileReadFailed` from a path-ish value and an underlying error
pub fn file_read_failed(path: impl Into<String>, reason: impl Into<String>) -> BlueprintError {
    BlueprintError::FileReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Build a `FileWriteFailed` from a path-ish value and an underlying error
pub fn file_write_failed(path: impl Into<String>, reason: impl Into<String>) -> BlueprintError {
    BlueprintError::FileWriteFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

pub fn dir_create_failed(path: impl Into<String>, reason: impl Into<String>) -> BlueprintError {
    BlueprintError::DirCreateFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

pub fn remove_failed(path: impl Into<String>, reason: impl Into<String>) -> BlueprintError {
    BlueprintError::RemoveFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

impl From<std::io::Error> for BlueprintError {
    fn from(err: std::io::Error) -> Self {
        BlueprintError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for BlueprintError {
    fn from(err: serde_json::Error) -> Self {
        BlueprintError::SettingsParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for BlueprintError {
    fn from(err: inquire::InquireError) -> Self {
        BlueprintError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, BlueprintError>;

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_error_contains {
        ($test_name:ident, $err:expr, $($contains:expr),+ $(,)?) => {
            #[test]
            fn $test_name() {
                let err = $err;
                let error_string = err.to_string();
                $(
                    assert!(error_string.contains($contains),
                        "Error message should contain '{}', got: {}",
                        $contains,
                        error_string
                    );
                )+
            }
        };
    }

    #[test]
    fn test_error_display() {
        let err = BlueprintError::SourceTreeNotFound {
            path: "/tmp/nowhere".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Blueprint source tree not found at: /tmp/nowhere"
        );
    }

    #[test]
    fn test_error_code() {
        use miette::Diagnostic;
        let err = BlueprintError::HomeDirNotFound;
        assert_eq!(
            err.code().map(|c| c.to_string()),
            Some("blueprint::runtime::no_home".to_string())
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BlueprintError = io_err.into();
        assert!(matches!(err, BlueprintError::IoError { .. }));
    }

    #[test]
    fn test_json_error_conversion() {
        let parse_result: std::result::Result<serde_json::Value, _> =
            serde_json::from_str("not json");
        let err: BlueprintError = parse_result.unwrap_err().into();
        assert!(matches!(err, BlueprintError::SettingsParseFailed { .. }));
    }

    #[test]
    fn test_file_read_failed_helper() {
        let err = file_read_failed("/path/to/file.md", "permission denied");
        assert!(matches!(err, BlueprintError::FileReadFailed { .. }));
        assert!(err.to_string().contains("Failed to read file"));
    }

    #[test]
    fn test_file_write_failed_helper() {
        let err = file_write_failed("/path/to/file.md", "disk full");
        assert!(matches!(err, BlueprintError::FileWriteFailed { .. }));
        assert!(err.to_string().contains("Failed to write file"));
    }

    test_error_contains!(
        test_install_incomplete_error,
        BlueprintError::InstallIncomplete {
            failed: "commands/bp, agents".to_string()
        },
        "Installation incomplete",
        "commands/bp",
    );

    test_error_contains!(
        test_home_dir_error,
        BlueprintError::HomeDirNotFound,
        "home directory",
    );
}
