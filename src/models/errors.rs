//! Centralized Error Handling Module
//!
//! Setiap kegagalan memiliki kode error yang unik supaya log batch mudah
//! ditelusuri.
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - CFG_xxx: Configuration errors
//! - REF_xxx: Reference data errors
//! - MUT_xxx: Mutator contract violations
//! - DATA_xxx: Record/NIK errors
//! - IO_xxx: File input/output errors

use std::fmt;

/// Application-wide error type
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new AppError
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create AppError with source error
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Configuration Errors (1xx)
    // ============================================
    /// Invalid configuration value (out of range, unparsable)
    ConfigInvalidValue,

    // ============================================
    // Reference Data Errors (2xx)
    // ============================================
    /// Code not present in a reference table (e.g. unknown province)
    InvalidReferenceCode,

    // ============================================
    // Mutator Errors (3xx)
    // ============================================
    /// Mutator invoked on input it cannot handle (programming error)
    MutationContract,

    // ============================================
    // Data Errors (4xx)
    // ============================================
    /// NIK is not 16 digits
    InvalidNik,
    /// Date components do not form a calendar date
    InvalidDate,
    /// Input CSV is malformed
    MalformedCsv,

    // ============================================
    // IO Errors (5xx)
    // ============================================
    /// Read/write failure
    IoFailure,
    /// JSON encode failure
    Serialization,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConfigInvalidValue => "CFG_INVALID_VALUE",
            Self::InvalidReferenceCode => "REF_INVALID_CODE",
            Self::MutationContract => "MUT_CONTRACT_VIOLATION",
            Self::InvalidNik => "DATA_INVALID_NIK",
            Self::InvalidDate => "DATA_INVALID_DATE",
            Self::MalformedCsv => "DATA_MALFORMED_CSV",
            Self::IoFailure => "IO_FAILURE",
            Self::Serialization => "IO_SERIALIZATION",
        }
    }

    /// Programming-contract violations abort the batch instead of being
    /// reported per record.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::MutationContract | Self::InvalidReferenceCode)
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    /// Invalid configuration value
    pub fn invalid_config(key: &str, msg: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ConfigInvalidValue,
            format!("{}: {}", key, msg.into()),
        )
    }

    /// Unknown province (or other reference) code
    pub fn invalid_reference(table: &str, code: &str) -> Self {
        Self::new(
            ErrorCode::InvalidReferenceCode,
            format!("Unknown {} code: '{}'", table, code),
        )
    }

    /// Mutator contract violation
    pub fn mutation_contract(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::MutationContract, msg)
    }

    /// Malformed NIK
    pub fn invalid_nik(nik: &str) -> Self {
        Self::new(
            ErrorCode::InvalidNik,
            format!("NIK must be exactly 16 digits, got '{}'", nik),
        )
    }

    /// Impossible calendar date
    pub fn invalid_date(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidDate, msg)
    }

    /// Malformed CSV input
    pub fn malformed_csv(line: usize, msg: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::MalformedCsv,
            format!("line {}: {}", line, msg.into()),
        )
    }
}

// ============================================
// Result type alias
// ============================================

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorCode::IoFailure, "IO error", err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorCode::Serialization, "JSON encode error", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = AppError::invalid_reference("province", "99");
        assert_eq!(err.code, ErrorCode::InvalidReferenceCode);
        assert_eq!(err.code_str(), "REF_INVALID_CODE");
        assert!(err.to_string().contains("'99'"));
    }

    #[test]
    fn test_contract_violation() {
        assert!(ErrorCode::MutationContract.is_contract_violation());
        assert!(ErrorCode::InvalidReferenceCode.is_contract_violation());
        assert!(!ErrorCode::IoFailure.is_contract_violation());
    }

    #[test]
    fn test_io_conversion_keeps_source() {
        use std::error::Error;

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: AppError = io.into();
        assert_eq!(err.code, ErrorCode::IoFailure);
        assert!(err.source().is_some());
    }
}
