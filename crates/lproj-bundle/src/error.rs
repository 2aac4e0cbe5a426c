use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BundleError {
    /// Failed to read a bundle directory or table file.
    #[error("Failed to read bundle resource: {0}")]
    Io(#[from] std::io::Error),
    /// A `.strings` file is not valid UTF-8, or UTF-16 with a byte order mark.
    #[error("Invalid encoding in strings table '{}': {message}", .path.display())]
    Encoding {
        /// Location of the table inside the bundle.
        path: PathBuf,
        message: String,
    },
    /// A `.strings` file could not be parsed.
    #[error("Invalid strings table '{}': {source}", .path.display())]
    Strings {
        path: PathBuf,
        #[source]
        source: langcodec::Error,
    },
    /// A `.stringsdict` or `Info.plist` file is not a valid property list.
    #[error("Invalid property list '{}': {source}", .path.display())]
    Plist {
        path: PathBuf,
        #[source]
        source: plist::Error,
    },
    /// A `.stringsdict` file parsed but does not have the expected shape.
    #[error("Invalid stringsdict '{}': {reason}", .path.display())]
    Stringsdict { path: PathBuf, reason: String },
}
