use thiserror::Error;

/// Failures at the parser/printer boundary. Unrecognized call shapes are never errors;
/// the passes leave them untouched.
#[derive(Error, Debug)]
pub enum CodemodError {
    #[error("Parse error at {lo}..{hi}: {message}")]
    Parse { message: String, lo: u32, hi: u32 },

    #[error("Emit error: {0}")]
    Emit(#[from] std::io::Error),

    #[error("Printer produced invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Invalid transform config: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CodemodError>;
