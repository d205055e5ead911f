//! Upload validators for the tutorial missions
//!
//! Two validators, no shared state:
//! - [`TarballValidator`] checks an uploaded `.tar.gz` against the
//!   tar-creation mission (wrapper directory structure, required files
//!   byte-for-byte).
//! - [`FileContentValidator`] checks a single uploaded file against the
//!   expected bytes extracted from the reference archive.

mod file_content;
mod tarball;

pub use file_content::FileContentValidator;
pub use tarball::TarballValidator;

use thiserror::Error;

/// Result of validating an upload
pub type ValidationResult = std::result::Result<(), ValidationError>;

/// Why an upload failed validation
///
/// Every variant is recoverable by resubmitting; the message is shown to
/// the user as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Malformed gzip or tar stream
    #[error("This is not a valid gzipped tarball")]
    NotAValidArchive,

    /// No top-level directory entry found
    #[error("No wrapper directory is present")]
    MissingWrapperDirectory,

    /// Top-level directory present but misnamed
    #[error("Wrapper directory name is incorrect: found {found}")]
    WrongWrapperDirectoryName { found: String },

    /// A required file is absent from the wrapper directory
    #[error("Expected file {path} is missing")]
    MissingExpectedFile { path: String },

    /// Required file present but its content differs
    #[error("{path} has incorrect contents")]
    IncorrectFileContents { path: String },

    /// Single-file byte comparison failed
    #[error("The uploaded file does not match the expected contents")]
    ContentMismatch,
}
