//! Reporting error codes following a structured numbering system
//!
//! Error code ranges:
//! - RPT0001-RPT0099: Serialization errors (definition text)
//! - RPT0100-RPT0199: Evaluation errors (queries, parameters)
//! - RPT0200-RPT0299: Data source errors
//! - RPT0300-RPT0399: System errors (I/O, configuration)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Error code identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(u16);

impl ErrorCode {
    /// Create a new error code
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Get the numeric code
    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Get error information for this code
    pub fn info(&self) -> &'static ErrorInfo {
        ERROR_INFO.get(&self.0).unwrap_or(&UNKNOWN_ERROR)
    }

    pub const fn is_serialization_error(&self) -> bool {
        self.0 >= 1 && self.0 < 100
    }

    pub const fn is_evaluation_error(&self) -> bool {
        self.0 >= 100 && self.0 < 200
    }

    pub const fn is_data_source_error(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    pub const fn is_system_error(&self) -> bool {
        self.0 >= 300 && self.0 < 400
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RPT{:04}", self.0)
    }
}

/// Information about an error code
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Short description of the error
    pub description: &'static str,
    /// Detailed help text
    pub help: Option<&'static str>,
}

impl ErrorInfo {
    const fn new(description: &'static str) -> Self {
        Self {
            description,
            help: None,
        }
    }

    const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

static UNKNOWN_ERROR: ErrorInfo = ErrorInfo::new("Unknown error");

static ERROR_INFO: LazyLock<HashMap<u16, ErrorInfo>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Serialization errors (0001-0099)
    map.insert(1, ErrorInfo::new("Malformed definition text"));
    map.insert(2, ErrorInfo::new("Unknown definition type")
        .with_help("Register a converter for the type tag or check its spelling"));
    map.insert(3, ErrorInfo::new("Missing field"));
    map.insert(4, ErrorInfo::new("Invalid field value"));
    map.insert(5, ErrorInfo::new("Unresolved reference"));
    map.insert(6, ErrorInfo::new("Circular reference")
        .with_help("Definitions may share sub-definitions but must not contain themselves"));
    map.insert(7, ErrorInfo::new("Unexpected definition family"));
    map.insert(8, ErrorInfo::new("Definition not found"));
    map.insert(9, ErrorInfo::new("Duplicate definition UUID")
        .with_help("Give each distinct definition its own UUID; clear the UUID of an edited copy"));

    // Evaluation errors (0100-0199)
    map.insert(100, ErrorInfo::new("Evaluation failed"));
    map.insert(101, ErrorInfo::new("No evaluator registered for query"));
    map.insert(102, ErrorInfo::new("Invalid parameter value"));

    // Data source errors (0200-0299)
    map.insert(200, ErrorInfo::new("Data source unavailable"));
    map.insert(201, ErrorInfo::new("Retrieve failed"));

    // System errors (0300-0399)
    map.insert(300, ErrorInfo::new("Internal error"));
    map.insert(301, ErrorInfo::new("I/O error"));
    map.insert(302, ErrorInfo::new("Configuration error"));

    map
});

// Serialization errors
pub const RPT0001: ErrorCode = ErrorCode::new(1);
pub const RPT0002: ErrorCode = ErrorCode::new(2);
pub const RPT0003: ErrorCode = ErrorCode::new(3);
pub const RPT0004: ErrorCode = ErrorCode::new(4);
pub const RPT0005: ErrorCode = ErrorCode::new(5);
pub const RPT0006: ErrorCode = ErrorCode::new(6);
pub const RPT0007: ErrorCode = ErrorCode::new(7);
pub const RPT0008: ErrorCode = ErrorCode::new(8);
pub const RPT0009: ErrorCode = ErrorCode::new(9);

// Evaluation errors
pub const RPT0100: ErrorCode = ErrorCode::new(100);
pub const RPT0101: ErrorCode = ErrorCode::new(101);
pub const RPT0102: ErrorCode = ErrorCode::new(102);

// Data source errors
pub const RPT0200: ErrorCode = ErrorCode::new(200);
pub const RPT0201: ErrorCode = ErrorCode::new(201);

// System errors
pub const RPT0300: ErrorCode = ErrorCode::new(300);
pub const RPT0301: ErrorCode = ErrorCode::new(301);
pub const RPT0302: ErrorCode = ErrorCode::new(302);
