//! Error types for rapp-core
//!
//! A single error type is shared by every crate in the workspace so that
//! each failure keeps the stable negative status code exported through the
//! C ABI. The first failing check in the fixed argument order wins; no
//! kernel is ever invoked after a check fails.
//!
//! # See also
//!
//! `rapp_error.h` / `rapp_error.c` (status codes and `rapp_error()` strings)

use thiserror::Error;

/// RAPP error type
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
    /// Pixel buffer missing or empty
    #[error("Pixel buffer pointer is NULL")]
    BufNull,

    /// Pixel buffer start is not a multiple of the alignment
    #[error("Invalid pixel buffer alignment")]
    BufAlign,

    /// Binary pixel buffer bit offset is outside [0,7]
    #[error("Invalid pixel buffer bit offset")]
    BufOffset,

    /// Row dimension is not a multiple of the alignment
    #[error("Invalid buffer dimension alignment")]
    DimAlign,

    /// Width or height is zero, or the row does not fit in the row dimension
    #[error("Invalid image size")]
    ImgSize,

    /// Required parameter (e.g. a work buffer) is missing
    #[error("Parameter is NULL")]
    ParmNull,

    /// Parameter value is outside the permitted range
    #[error("Parameter is out-of-range")]
    ParmRange,

    /// Library used before initialization
    #[error("Missing call to rapp_initialize()")]
    Uninitialized,

    /// Buffers alias within the access window of the operation
    #[error("Buffer parameters overlap")]
    Overlap,

    /// Slice too short for the access window implied by its geometry
    #[error("Pixel buffer is too small for the access window")]
    BufSize,
}

impl Error {
    /// Every error, in status-code order.
    pub const ALL: [Error; 10] = [
        Error::BufNull,
        Error::BufAlign,
        Error::BufOffset,
        Error::DimAlign,
        Error::ImgSize,
        Error::ParmNull,
        Error::ParmRange,
        Error::Uninitialized,
        Error::Overlap,
        Error::BufSize,
    ];

    /// Stable negative status code.
    pub fn code(self) -> i32 {
        match self {
            Error::BufNull => -1,
            Error::BufAlign => -2,
            Error::BufOffset => -3,
            Error::DimAlign => -4,
            Error::ImgSize => -5,
            Error::ParmNull => -6,
            Error::ParmRange => -7,
            Error::Uninitialized => -8,
            Error::Overlap => -9,
            Error::BufSize => -10,
        }
    }

    /// Map a status code back to an error. Returns `None` for 0 and for
    /// unknown codes.
    pub fn from_code(code: i32) -> Option<Error> {
        Error::ALL.into_iter().find(|e| e.code() == code)
    }
}

/// Result type for RAPP operations
pub type Result<T> = std::result::Result<T, Error>;

/// Convert a result into the status code returned through the C ABI.
pub fn status(result: Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => e.code(),
    }
}

/// Static description of a status code.
///
/// Returns `"No error"` for 0 and `"Invalid error code"` for anything the
/// library never produces.
pub fn error_string(code: i32) -> &'static str {
    const NO_ERROR: &str = "No error";
    const INVALID: &str = "Invalid error code";
    const MESSAGES: [&str; 10] = [
        "Pixel buffer pointer is NULL",
        "Invalid pixel buffer alignment",
        "Invalid pixel buffer bit offset",
        "Invalid buffer dimension alignment",
        "Invalid image size",
        "Parameter is NULL",
        "Parameter is out-of-range",
        "Missing call to rapp_initialize()",
        "Buffer parameters overlap",
        "Pixel buffer is too small for the access window",
    ];

    match code {
        0 => NO_ERROR,
        c if (-10..0).contains(&c) => MESSAGES[(-c - 1) as usize],
        _ => INVALID,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        let codes: Vec<i32> = Error::ALL.iter().map(|e| e.code()).collect();
        assert_eq!(codes, vec![-1, -2, -3, -4, -5, -6, -7, -8, -9, -10]);
    }

    #[test]
    fn test_from_code_round_trip() {
        for e in Error::ALL {
            assert_eq!(Error::from_code(e.code()), Some(e));
        }
        assert_eq!(Error::from_code(0), None);
        assert_eq!(Error::from_code(-11), None);
    }

    #[test]
    fn test_error_string_matches_display() {
        for e in Error::ALL {
            assert_eq!(error_string(e.code()), e.to_string());
        }
        assert_eq!(error_string(0), "No error");
        assert_eq!(error_string(1), "Invalid error code");
        assert_eq!(error_string(-42), "Invalid error code");
    }

    #[test]
    fn test_status() {
        assert_eq!(status(Ok(())), 0);
        assert_eq!(status(Err(Error::Overlap)), -9);
    }
}
