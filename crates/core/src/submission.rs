//! Outbound analysis request and the checks run before it is sent.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Minimum accepted code length in characters.
pub const MIN_CODE_LENGTH: usize = 10;

/// Maximum accepted code length in characters.
pub const MAX_CODE_LENGTH: usize = 10_000;

pub const EMPTY_CODE_MESSAGE: &str = "El código está vacío";
pub const CODE_TOO_SHORT_MESSAGE: &str = "El código es demasiado corto";
pub const CODE_TOO_LONG_MESSAGE: &str =
    "El código es demasiado largo (máximo 10,000 caracteres)";

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Language of the submitted source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeType {
    Python,
    #[default]
    Pseudocode,
}

impl CodeType {
    pub fn as_str(self) -> &'static str {
        match self {
            CodeType::Python => "python",
            CodeType::Pseudocode => "pseudocode",
        }
    }
}

/// JSON body of `POST /analyze`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub code: String,
    #[serde(default)]
    pub code_type: CodeType,
    #[serde(default)]
    pub algorithm_name: String,
}

impl AnalysisRequest {
    pub fn new(code: impl Into<String>, code_type: CodeType) -> Self {
        Self {
            code: code.into(),
            code_type,
            algorithm_name: String::new(),
        }
    }

    /// Reject code that is empty, shorter than [`MIN_CODE_LENGTH`] or
    /// longer than [`MAX_CODE_LENGTH`] characters.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_code(&self.code)
    }
}

/// Validate submitted source before any network call is made.
pub fn validate_code(code: &str) -> Result<(), CoreError> {
    if code.trim().is_empty() {
        return Err(CoreError::Validation(EMPTY_CODE_MESSAGE.to_string()));
    }

    let length = code.chars().count();
    if length < MIN_CODE_LENGTH {
        return Err(CoreError::Validation(CODE_TOO_SHORT_MESSAGE.to_string()));
    }
    if length > MAX_CODE_LENGTH {
        return Err(CoreError::Validation(CODE_TOO_LONG_MESSAGE.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Editor statistics
// ---------------------------------------------------------------------------

/// Size counters shown next to the code editor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CodeStats {
    /// Lines containing at least one non-whitespace character.
    pub lines: usize,
    pub characters: usize,
    pub words: usize,
}

impl CodeStats {
    pub fn of(code: &str) -> Self {
        Self {
            lines: code.lines().filter(|l| !l.trim().is_empty()).count(),
            characters: code.chars().count(),
            words: code.split_whitespace().count(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
