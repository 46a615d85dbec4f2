//! Error types for the apktool-mcp server

use rmcp::ErrorData as McpError;
use thiserror::Error;

/// Main error type for the apktool-mcp server
#[derive(Error, Debug)]
pub enum ApktoolError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Executable not found: {0}")]
    CommandNotFound(String),

    #[error("Failed to spawn command: {0}")]
    SpawnFailed(String),

    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Command timed out after {seconds}s: {command}")]
    CommandTimeout { seconds: u64, command: String },

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ApktoolError>;

/// Handler faults cross the dispatch boundary exactly once, here, so the
/// client always receives a structured outcome.
impl From<ApktoolError> for McpError {
    fn from(err: ApktoolError) -> Self {
        match err {
            ApktoolError::FileNotFound(_) => McpError::invalid_params(err.to_string(), None),
            ApktoolError::ResourceNotFound(_) => {
                McpError::resource_not_found(err.to_string(), None)
            }
            _ => McpError::internal_error(err.to_string(), None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_not_found_maps_to_invalid_params() {
        let mcp: McpError = ApktoolError::FileNotFound("/tmp/missing.apk".to_string()).into();
        assert!(mcp.message.contains("/tmp/missing.apk"));
        assert_eq!(mcp.code, rmcp::model::ErrorCode::INVALID_PARAMS);
    }

    #[test]
    fn test_command_failed_maps_to_internal_error() {
        let mcp: McpError = ApktoolError::CommandFailed("apktool d x.apk".to_string()).into();
        assert_eq!(mcp.code, rmcp::model::ErrorCode::INTERNAL_ERROR);
    }

    #[test]
    fn test_timeout_message_names_command() {
        let err = ApktoolError::CommandTimeout {
            seconds: 600,
            command: "apktool b proj".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("600"));
        assert!(msg.contains("apktool b proj"));
    }
}
