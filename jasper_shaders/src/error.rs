//! Error types for the Jasper shader pipeline
//!
//! This module defines the error types used throughout the pipeline,
//! including configuration, compilation, reflection, and cache I/O.

use std::fmt;

/// Result type for Jasper shader pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Jasper shader pipeline errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Invalid pipeline configuration (unsupported target environment,
    /// unrecognized shader file extension, unusable cache directory)
    Config(String),

    /// The external compiler rejected a shader source; carries the
    /// compiler's diagnostic verbatim
    Compile(String),

    /// SPIR-V introspection failed on compiled bytecode
    Reflection(String),

    /// Corrupt cache artifact (bytecode file size not a word multiple)
    Cache(String),

    /// Filesystem failure (unreadable source, unwritable cache)
    Io(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Compile(msg) => write!(f, "Shader compilation failed: {}", msg),
            Error::Reflection(msg) => write!(f, "Shader reflection failed: {}", msg),
            Error::Cache(msg) => write!(f, "Shader cache corrupt: {}", msg),
            Error::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Build an [`Error`] of the given variant and log it as an ERROR
///
/// # Example
///
/// ```no_run
/// # use jasper_shaders::jasper_err;
/// # fn demo() -> jasper_shaders::Result<Vec<u32>> {
/// std::fs::read("shader.spv")
///     .map_err(|e| jasper_err!(Io, "jasper::demo", "Failed to read bytecode: {}", e))?;
/// # unreachable!()
/// # }
/// ```
#[macro_export]
macro_rules! jasper_err {
    ($variant:ident, $source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::jasper_error!($source, "{}", message);
        $crate::Error::$variant(message)
    }};
}

/// Return early with an [`Error`] of the given variant, logging it first
///
/// # Example
///
/// ```no_run
/// # use jasper_shaders::jasper_bail;
/// # fn demo(size: usize) -> jasper_shaders::Result<()> {
/// if size % 4 != 0 {
///     jasper_bail!(Cache, "jasper::demo", "Bytecode size {} is not a word multiple", size);
/// }
/// # Ok(())
/// # }
/// ```
#[macro_export]
macro_rules! jasper_bail {
    ($variant:ident, $source:expr, $($arg:tt)*) => {
        return Err($crate::jasper_err!($variant, $source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
