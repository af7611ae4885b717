//! Analysis payload returned by the complexity backend.
//!
//! Every field is optional and decoded leniently: a value whose JSON shape
//! does not fit the expected type decodes as `None` instead of failing the
//! whole payload. Lists additionally drop individual elements that do not
//! decode, so one bad line record never hides the rest of the table.

use std::fmt;

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Lenient field decoders
// ---------------------------------------------------------------------------

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        )),
        _ => Ok(None),
    }
}

/// Free-text fields the backend sometimes emits as bare numbers.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// Returns the string only when it is present and non-empty.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// Top-level payload
// ---------------------------------------------------------------------------

/// Full response body of `POST /analyze`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub complexity: Option<Complexity>,
    #[serde(default, deserialize_with = "lenient_list", skip_serializing_if = "Option::is_none")]
    pub line_analysis: Option<Vec<LineRecord>>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrenceInfo>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationReport>,
    #[serde(default, deserialize_with = "lenient_list", skip_serializing_if = "Option::is_none")]
    pub patterns: Option<Vec<PatternMatch>>,
    #[serde(default, deserialize_with = "lenient_list", skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub mermaid_code: Option<String>,
}

impl AnalysisResult {
    /// Line records in payload order, empty when absent.
    pub fn lines(&self) -> &[LineRecord] {
        self.line_analysis.as_deref().unwrap_or_default()
    }

    /// Generated file paths in payload order, empty when absent.
    pub fn file_paths(&self) -> &[String] {
        self.files.as_deref().unwrap_or_default()
    }
}

/// Asymptotic bounds of the analysed algorithm.
///
/// The same shape is reused for the automatic and the external notations
/// inside [`ValidationReport`], where `explanation` is simply unused.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Complexity {
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub big_o: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub omega: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub theta: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// The three notations compared and charted throughout the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notation {
    BigO,
    Omega,
    Theta,
}

impl Notation {
    pub const ALL: [Notation; 3] = [Notation::BigO, Notation::Omega, Notation::Theta];

    pub fn label(self) -> &'static str {
        match self {
            Notation::BigO => "Big-O",
            Notation::Omega => "Omega",
            Notation::Theta => "Theta",
        }
    }

    /// The raw value of this notation inside a [`Complexity`].
    pub fn pick(self, complexity: &Complexity) -> Option<&str> {
        let value = match self {
            Notation::BigO => &complexity.big_o,
            Notation::Omega => &complexity.omega,
            Notation::Theta => &complexity.theta,
        };
        non_empty(value)
    }
}

// ---------------------------------------------------------------------------
// Line analysis
// ---------------------------------------------------------------------------

/// Cost record for one source line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineRecord {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<LineKind>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub exec_count: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub time_cost: Option<String>,
}

impl LineRecord {
    /// 1-based line number, falling back to the record's position
    /// (`index` is 0-based) when the backend omitted it or sent zero.
    pub fn number(&self, index: usize) -> u64 {
        self.line.filter(|n| *n > 0).unwrap_or(index as u64 + 1)
    }

    pub fn exec_count(&self) -> &str {
        non_empty(&self.exec_count).unwrap_or("1")
    }

    pub fn time_cost(&self) -> &str {
        non_empty(&self.time_cost).unwrap_or("O(1)")
    }
}

/// Statement category assigned to a line by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LineKind {
    ForLoop,
    WhileLoop,
    IfStatement,
    Assignment,
    Read,
    Write,
    Other,
    /// A tag outside the known set, kept verbatim.
    Unrecognized(String),
}

impl LineKind {
    pub fn as_tag(&self) -> &str {
        match self {
            LineKind::ForLoop => "for_loop",
            LineKind::WhileLoop => "while_loop",
            LineKind::IfStatement => "if_statement",
            LineKind::Assignment => "assignment",
            LineKind::Read => "read",
            LineKind::Write => "write",
            LineKind::Other => "other",
            LineKind::Unrecognized(tag) => tag,
        }
    }

    /// Human-readable label shown in the line table.
    pub fn label(&self) -> &str {
        match self {
            LineKind::ForLoop => "For Loop",
            LineKind::WhileLoop => "While Loop",
            LineKind::IfStatement => "Condicional",
            LineKind::Assignment => "Asignación",
            LineKind::Read => "Lectura",
            LineKind::Write => "Escritura",
            LineKind::Other => "Otro",
            LineKind::Unrecognized(tag) => tag,
        }
    }
}

impl From<String> for LineKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "for_loop" => LineKind::ForLoop,
            "while_loop" => LineKind::WhileLoop,
            "if_statement" => LineKind::IfStatement,
            "assignment" => LineKind::Assignment,
            "read" => LineKind::Read,
            "write" => LineKind::Write,
            "other" => LineKind::Other,
            _ => LineKind::Unrecognized(tag),
        }
    }
}

impl From<LineKind> for String {
    fn from(kind: LineKind) -> Self {
        kind.as_tag().to_string()
    }
}

// ---------------------------------------------------------------------------
// Recurrence
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceInfo {
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub equation: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub simplified: Option<String>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// External validation of the automatically computed complexity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub overall_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub mathematical_rigor: Option<Rigor>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub auto_analysis: Option<AutoAnalysis>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub complexity_details: Option<ComplexityDetails>,
    #[serde(default, deserialize_with = "lenient_list", skip_serializing_if = "Option::is_none")]
    pub critical_errors: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_list", skip_serializing_if = "Option::is_none")]
    pub warnings: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_list", skip_serializing_if = "Option::is_none")]
    pub corrections: Option<Vec<String>>,
}

impl ValidationReport {
    /// Notations computed by the backend's own analysis.
    pub fn automatic(&self) -> Option<&Complexity> {
        self.auto_analysis.as_ref()?.complexity.as_ref()
    }

    /// Reference notations supplied by the external validator.
    pub fn external(&self) -> Option<&Complexity> {
        self.complexity_details.as_ref()?.gemini_complexities.as_ref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AutoAnalysis {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub complexity: Option<Complexity>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplexityDetails {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub gemini_complexities: Option<Complexity>,
}

/// Qualitative confidence of the external validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Rigor {
    High,
    Medium,
    Low,
    Other(String),
}

impl Rigor {
    pub fn as_str(&self) -> &str {
        match self {
            Rigor::High => "HIGH",
            Rigor::Medium => "MEDIUM",
            Rigor::Low => "LOW",
            Rigor::Other(label) => label,
        }
    }

    /// Display color from the fixed three-level palette.
    pub fn color(&self) -> &'static str {
        match self {
            Rigor::High => "#10b981",
            Rigor::Medium => "#fbbf24",
            Rigor::Low => "#ef4444",
            Rigor::Other(_) => "#64748b",
        }
    }
}

impl From<String> for Rigor {
    fn from(label: String) -> Self {
        match label.as_str() {
            "HIGH" => Rigor::High,
            "MEDIUM" => Rigor::Medium,
            "LOW" => Rigor::Low,
            _ => Rigor::Other(label),
        }
    }
}

impl From<Rigor> for String {
    fn from(rigor: Rigor) -> Self {
        rigor.as_str().to_string()
    }
}

impl fmt::Display for Rigor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

/// An algorithmic pattern the backend recognised in the submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternMatch {
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub confidence: Option<String>,
}
