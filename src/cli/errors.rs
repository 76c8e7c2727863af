use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Output file name must end with .{expected}: {path}")]
    InvalidExtension { expected: &'static str, path: String },

    #[error(transparent)]
    Lib(#[from] geostretch::Error),
}
