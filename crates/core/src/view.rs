//! Resolved view models for the report.
//!
//! [`ReportView::from_result`] applies every default of the payload in one
//! place. Renderers consume these views and never inspect raw optional
//! fields. Area-level absence survives as `None` or an empty list so the
//! renderer can pick the matching placeholder.

use serde::Serialize;

use crate::compare::{compare, Verdict};
use crate::equation::{constants, full_equation, Constant};
use crate::model::{non_empty, AnalysisResult, Complexity, Notation, PatternMatch, Rigor};

/// Placeholder for any absent notation or label.
pub const NOT_AVAILABLE: &str = "N/A";

/// Display name for a pattern with neither name nor description.
pub const UNKNOWN_PATTERN: &str = "Patrón desconocido";

/// Label for a line record without a category tag.
pub const UNKNOWN_KIND: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportView {
    /// `None` when the payload carried no `complexity` object at all.
    pub complexity: Option<ComplexityView>,
    pub lines: Vec<LineRow>,
    pub recurrence: Option<RecurrenceView>,
    pub validation: Option<ValidationView>,
    pub patterns: Vec<PatternView>,
    pub files: Vec<FileView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplexityView {
    pub big_o: String,
    pub omega: String,
    pub theta: String,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineRow {
    pub line: u64,
    /// Original source text, unescaped.
    pub code: String,
    pub kind: String,
    pub exec_count: String,
    pub time_cost: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecurrenceView {
    pub full_equation: String,
    pub simplified: String,
    pub constants: Vec<Constant>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationView {
    pub score: f64,
    pub rigor: Rigor,
    pub comparisons: Vec<ComparisonRow>,
    pub critical_errors: Vec<String>,
    pub warnings: Vec<String>,
    pub corrections: Vec<String>,
}

impl ValidationView {
    /// Score with one decimal place, e.g. `87.5`.
    pub fn score_label(&self) -> String {
        format!("{:.1}", self.score)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonRow {
    pub notation: &'static str,
    pub automatic: String,
    pub external: String,
    pub verdict: Verdict,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternView {
    pub name: String,
    /// Only set when it differs from `name`.
    pub description: Option<String>,
    pub confidence: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileView {
    pub path: String,
    pub name: String,
    /// Upper-cased extension, e.g. `SVG`.
    pub extension: String,
}

impl ReportView {
    pub fn from_result(result: &AnalysisResult) -> Self {
        Self {
            complexity: result.complexity.as_ref().map(ComplexityView::from_complexity),
            lines: line_rows(result),
            recurrence: recurrence_view(result),
            validation: result.validation.as_ref().map(|v| ValidationView {
                score: v.overall_score.unwrap_or(0.0),
                rigor: v.mathematical_rigor.clone().unwrap_or(Rigor::Low),
                comparisons: comparison_rows(v.automatic(), v.external()),
                critical_errors: v.critical_errors.clone().unwrap_or_default(),
                warnings: v.warnings.clone().unwrap_or_default(),
                corrections: v.corrections.clone().unwrap_or_default(),
            }),
            patterns: result
                .patterns
                .iter()
                .flatten()
                .map(PatternView::from_match)
                .collect(),
            files: result
                .file_paths()
                .iter()
                .map(|path| FileView::from_path(path))
                .collect(),
        }
    }
}

impl ComplexityView {
    fn from_complexity(complexity: &Complexity) -> Self {
        let notation =
            |n: Notation| n.pick(complexity).unwrap_or(NOT_AVAILABLE).to_string();
        Self {
            big_o: notation(Notation::BigO),
            omega: notation(Notation::Omega),
            theta: notation(Notation::Theta),
            explanation: non_empty(&complexity.explanation).map(str::to_string),
        }
    }
}

fn line_rows(result: &AnalysisResult) -> Vec<LineRow> {
    result
        .lines()
        .iter()
        .enumerate()
        .map(|(index, record)| LineRow {
            line: record.number(index),
            code: record.raw.clone().unwrap_or_default(),
            kind: record
                .kind
                .as_ref()
                .map_or(UNKNOWN_KIND, |kind| kind.label())
                .to_string(),
            exec_count: record.exec_count().to_string(),
            time_cost: record.time_cost().to_string(),
        })
        .collect()
}

fn recurrence_view(result: &AnalysisResult) -> Option<RecurrenceView> {
    let recurrence = result.recurrence.as_ref()?;
    let equation = non_empty(&recurrence.equation)?;

    Some(RecurrenceView {
        full_equation: full_equation(result.lines()),
        simplified: non_empty(&recurrence.simplified)
            .unwrap_or(equation)
            .to_string(),
        constants: constants(result.lines()),
    })
}

fn comparison_rows(
    automatic: Option<&Complexity>,
    external: Option<&Complexity>,
) -> Vec<ComparisonRow> {
    Notation::ALL
        .into_iter()
        .map(|notation| {
            let auto_value = automatic.and_then(|c| notation.pick(c));
            let external_value = external
                .and_then(|c| notation.pick(c))
                .unwrap_or(NOT_AVAILABLE);

            ComparisonRow {
                notation: notation.label(),
                automatic: auto_value.unwrap_or(NOT_AVAILABLE).to_string(),
                external: external_value.to_string(),
                verdict: compare(auto_value, Some(external_value)),
            }
        })
        .collect()
}

impl PatternView {
    fn from_match(pattern: &PatternMatch) -> Self {
        let description = non_empty(&pattern.description);
        let name = non_empty(&pattern.name)
            .or(description)
            .unwrap_or(UNKNOWN_PATTERN)
            .to_string();

        Self {
            description: description
                .filter(|d| *d != name)
                .map(str::to_string),
            name,
            confidence: non_empty(&pattern.confidence)
                .unwrap_or(NOT_AVAILABLE)
                .to_string(),
        }
    }
}

impl FileView {
    pub fn from_path(path: &str) -> Self {
        let name = path.rsplit('/').next().unwrap_or(path);
        let extension = name.rsplit('.').next().unwrap_or(name);

        Self {
            path: path.to_string(),
            name: name.to_string(),
            extension: extension.to_uppercase(),
        }
    }
}
