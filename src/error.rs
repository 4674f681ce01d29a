//! Error types for nivaro.

/// Result type alias for nivaro operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for nivaro.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Explicitly requested configuration file does not exist.
    #[error("config file not found: {path}")]
    ConfigNotFound {
        /// Path to the missing config file.
        path: std::path::PathBuf,
    },

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// Failed to open the upstream frame results.
    #[error("failed to open frame results '{path}'")]
    FrameSourceOpen {
        /// Path to the frame results file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A frame result could not be read or decoded.
    #[error("invalid frame result at line {line}")]
    FrameParse {
        /// 1-based line number in the frame results stream.
        line: usize,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to read a CSV input file.
    #[error("failed to read CSV file '{path}'")]
    CsvRead {
        /// Path to the CSV file.
        path: std::path::PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// Failed to write a CSV output file.
    #[error("failed to write CSV file '{path}'")]
    CsvWrite {
        /// Path to the CSV file.
        path: std::path::PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// A required column is missing from a CSV input file.
    #[error("missing column '{column}' in '{path}'")]
    MissingColumn {
        /// Path to the CSV file.
        path: std::path::PathBuf,
        /// Name of the missing column.
        column: String,
    },

    /// A CSV cell could not be parsed.
    #[error("invalid value '{value}' for column '{column}' in '{path}' (line {line})")]
    InvalidValue {
        /// Path to the CSV file.
        path: std::path::PathBuf,
        /// Column name.
        column: String,
        /// Offending raw value.
        value: String,
        /// 1-based line number.
        line: u64,
    },

    /// Failed to create output directory.
    #[error("failed to create output directory '{path}'")]
    OutputDirCreateFailed {
        /// Path to the output directory.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write an output file.
    #[error("failed to write output file '{path}'")]
    OutputWrite {
        /// Path to the output file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write JSON output file.
    #[error("failed to write JSON output file '{path}'")]
    JsonWrite {
        /// Path to the JSON file.
        path: std::path::PathBuf,
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },

    /// Report build was called without any detection rows.
    #[error("no detection rows supplied")]
    EmptyInput,
}
